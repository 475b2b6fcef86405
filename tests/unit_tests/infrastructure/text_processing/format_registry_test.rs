use std::sync::Arc;

use nural_extractor::application::ports::FormatRouter;
use nural_extractor::domain::FormatFamily;
use nural_extractor::infrastructure::text_processing::{
    FormatRegistry, HtmlAdapter, MockFormatExtractor, PlainTextAdapter,
};

fn registry() -> FormatRegistry {
    FormatRegistry::new(vec![
        Arc::new(PlainTextAdapter),
        Arc::new(HtmlAdapter::default()),
        Arc::new(MockFormatExtractor::new(FormatFamily::Spreadsheet)),
    ])
}

#[test]
fn given_registered_mime_when_routing_then_returns_matching_extractor() {
    let extractor = registry().route("index", "text/html").unwrap();

    assert_eq!(extractor.family(), FormatFamily::Html);
}

#[test]
fn given_generic_mime_when_routing_then_uses_extension() {
    let extractor = registry()
        .route("prices.csv", "application/octet-stream")
        .unwrap();

    assert_eq!(extractor.family(), FormatFamily::Spreadsheet);
}

#[test]
fn given_unknown_format_when_routing_then_unsupported_error_names_file() {
    let error = registry()
        .route("data.xyz", "application/octet-stream")
        .err()
        .unwrap();

    assert_eq!(error.file_name, "data.xyz");
    assert_eq!(
        error.to_string(),
        "unsupported file format: data.xyz (application/octet-stream)"
    );
}

#[test]
fn given_known_but_unregistered_family_when_routing_then_unsupported() {
    assert!(registry().route("photo.png", "image/png").is_err());
}

#[test]
fn given_registry_when_listing_families_then_returns_registered_ones() {
    assert_eq!(
        registry().supported_families(),
        vec![
            FormatFamily::Html,
            FormatFamily::PlainText,
            FormatFamily::Spreadsheet
        ]
    );
}
