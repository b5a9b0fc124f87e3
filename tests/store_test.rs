// Capture store unit tests — identity, idempotence, and eviction.

use chrono::Utc;
use reweave::capture::{AssetInventory, Capture};
use reweave::store::{CaptureStore, StoreError};

fn make_capture(url: &str) -> Capture {
    Capture {
        id: String::new(),
        source_url: url.to_string(),
        title: "A Page".to_string(),
        raw_html: "<html><body>content</body></html>".to_string(),
        asset_inventory: AssetInventory {
            images: 1,
            stylesheets: 2,
            scripts: 3,
            links: 4,
        },
        screenshot_path: None,
        captured_at: Utc::now(),
    }
}

#[tokio::test]
async fn put_then_get_roundtrips() {
    let store = CaptureStore::new(8);
    let id = store.put(make_capture("https://example.com/")).await;

    let got = store.get(&id).await.unwrap();
    assert_eq!(got.id, id);
    assert_eq!(got.source_url, "https://example.com/");
    assert_eq!(got.title, "A Page");
    assert_eq!(got.asset_inventory.scripts, 3);
}

#[tokio::test]
async fn repeated_get_returns_identical_data() {
    let store = CaptureStore::new(8);
    let id = store.put(make_capture("https://example.com/")).await;

    let first = store.get(&id).await.unwrap();
    let second = store.get(&id).await.unwrap();
    // Byte-identical: both reads resolve to the same immutable record.
    assert_eq!(
        serde_json::to_vec(&*first).unwrap(),
        serde_json::to_vec(&*second).unwrap()
    );
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let store = CaptureStore::new(8);
    store.put(make_capture("https://example.com/")).await;

    let err = store.get("no-such-id").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert!(err.to_string().contains("no-such-id"));
}

#[tokio::test]
async fn repeated_captures_of_one_url_get_distinct_ids() {
    let store = CaptureStore::new(8);
    let a = store.put(make_capture("https://example.com/")).await;
    let b = store.put(make_capture("https://example.com/")).await;

    assert_ne!(a, b);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn eviction_drops_oldest_first() {
    let store = CaptureStore::new(2);
    let first = store.put(make_capture("https://one.example/")).await;
    let second = store.put(make_capture("https://two.example/")).await;
    let third = store.put(make_capture("https://three.example/")).await;

    assert_eq!(store.len().await, 2);
    assert!(matches!(
        store.get(&first).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(store.get(&second).await.is_ok());
    assert!(store.get(&third).await.is_ok());
}

#[tokio::test]
async fn concurrent_puts_never_collide() {
    let store = std::sync::Arc::new(CaptureStore::new(64));

    let mut handles = Vec::new();
    for i in 0..32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .put(make_capture(&format!("https://example.com/{i}")))
                .await
        }));
    }

    let mut ids = std::collections::HashSet::new();
    for h in handles {
        ids.insert(h.await.unwrap());
    }
    assert_eq!(ids.len(), 32);
    assert_eq!(store.len().await, 32);
}

#[tokio::test]
async fn list_returns_oldest_first() {
    let store = CaptureStore::new(8);
    store.put(make_capture("https://one.example/")).await;
    store.put(make_capture("https://two.example/")).await;

    let all = store.list().await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].source_url, "https://one.example/");
    assert_eq!(all[1].source_url, "https://two.example/");
}
