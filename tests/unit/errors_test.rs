//! Unit tests for the error type Display implementations.

use markwarden::types::errors::{CacheError, CategorizationError, StoreError};

#[test]
fn test_categorization_error_display() {
    let err = CategorizationError::ParseFailure("not json".to_string());
    assert!(err.to_string().contains("not json"));

    let err = CategorizationError::ApiError {
        message: "HTTP 503".to_string(),
        retryable: true,
    };
    let rendered = err.to_string();
    assert!(rendered.contains("HTTP 503"));
    assert!(rendered.contains("retryable=true"));

    let err = CategorizationError::InvalidApiKey("API key is empty".to_string());
    assert!(err.to_string().contains("Invalid API key"));

    let err = CategorizationError::NetworkUnavailable("dns failure".to_string());
    assert!(err.to_string().contains("dns failure"));

    assert_eq!(
        CategorizationError::NoBookmarks.to_string(),
        "No bookmarks supplied"
    );
}

#[test]
fn test_cache_error_display() {
    let err = CacheError::Corrupted("bad payload".to_string());
    assert!(err.to_string().contains("bad payload"));

    let err = CacheError::DatabaseError("disk full".to_string());
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn test_store_error_display() {
    let err = StoreError::Unavailable("host gone".to_string());
    assert!(err.to_string().contains("host gone"));
}

#[test]
fn test_errors_are_std_error() {
    fn assert_error<E: std::error::Error>(_: E) {}
    assert_error(CategorizationError::NoBookmarks);
    assert_error(CacheError::Corrupted(String::new()));
    assert_error(StoreError::Unavailable(String::new()));
}
