// Capture-stage tests: URL validation and DOM extraction.
//
// The full browser path needs a Chromium binary and a network — everything
// up to that boundary is covered here.

use proptest::prelude::*;
use reweave::capture::engine::validate_url;
use reweave::capture::extract::{count_assets, extract_title};
use reweave::capture::{CaptureConfig, CaptureEngine, CaptureError};
use tempfile::TempDir;

#[test]
fn free_text_input_fails_immediately() {
    let err = validate_url("not a url").unwrap_err();
    assert!(matches!(err, CaptureError::InvalidUrl(_)));
    assert!(err.to_string().contains("not a url"));
}

#[test]
fn scheme_relative_and_bare_hosts_rejected() {
    for bad in ["example.com", "//example.com", "www.example.com/page"] {
        assert!(matches!(
            validate_url(bad),
            Err(CaptureError::InvalidUrl(_))
        ));
    }
}

#[tokio::test]
async fn invalid_url_fails_before_any_network_activity() {
    let dir = TempDir::new().unwrap();
    let engine = CaptureEngine::new(CaptureConfig::default(), dir.path().to_path_buf()).unwrap();

    // No resolvable host, no listener — if validation didn't short-circuit,
    // this would error differently (or hang against the preflight timeout).
    let err = engine.capture("definitely not a url").await.unwrap_err();
    assert!(matches!(err, CaptureError::InvalidUrl(_)));
}

proptest! {
    /// validate_url never panics, and anything it accepts is an absolute
    /// http(s) URL with a host.
    #[test]
    fn validate_url_total_and_sound(input in ".{0,200}") {
        if let Ok(url) = validate_url(&input) {
            prop_assert!(url.scheme() == "http" || url.scheme() == "https");
            prop_assert!(url.host_str().is_some());
        }
    }

    /// Strings with no scheme separator are never accepted.
    #[test]
    fn schemeless_strings_rejected(input in "[a-z0-9 ./-]{0,80}") {
        prop_assert!(validate_url(&input).is_err());
    }
}

// ─── Extraction over a realistic document ─────────────────────────────────────

const EXAMPLE_DOM: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Example Domain</title>
    <meta charset="utf-8" />
    <style>body { font-family: sans-serif; }</style>
</head>
<body>
<div>
    <h1>Example Domain</h1>
    <p>This domain is for use in illustrative examples in documents.</p>
    <p><a href="https://www.iana.org/domains/example">More information...</a></p>
</div>
</body>
</html>"#;

#[test]
fn example_domain_extraction_matches_expectations() {
    assert_eq!(extract_title(EXAMPLE_DOM), "Example Domain");

    let counts = count_assets(EXAMPLE_DOM);
    assert_eq!(counts.images, 0);
    assert_eq!(counts.stylesheets, 0);
    assert_eq!(counts.scripts, 0);
    assert_eq!(counts.links, 1);
}

#[test]
fn asset_counts_are_never_negative_and_title_is_a_string() {
    // u32 counts cannot go negative; assert the zero floor on an empty doc
    // and that an untitled page yields an empty (not missing) title.
    let counts = count_assets("");
    assert_eq!(
        (counts.images, counts.stylesheets, counts.scripts, counts.links),
        (0, 0, 0, 0)
    );
    assert_eq!(extract_title(""), "");
}
