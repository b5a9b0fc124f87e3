// rest/mod.rs — Public HTTP API server.
//
// Axum HTTP server bridging the two pipeline operations to REST.
//
// Endpoints:
//   POST /webscrape        — capture a URL, return the capture summary
//   POST /clone-website    — reconstruct a stored capture
//   GET  /captures         — list stored capture summaries
//   GET  /health
//   GET  /public/screenshots/{file}   (static artifacts)

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

use crate::AppContext;

pub async fn start_http_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("HTTP API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let screenshots = ServeDir::new(ctx.config.screenshots_dir());
    Router::new()
        .route("/webscrape", post(routes::webscrape))
        .route("/clone-website", post(routes::clone_website))
        .route("/captures", get(routes::list_captures))
        .route("/health", get(routes::health))
        .nest_service("/public/screenshots", screenshots)
        // Permissive CORS: the dev frontend runs on its own origin.
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
