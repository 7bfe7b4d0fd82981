use std::fmt;

// === CategorizationError ===

/// Errors raised by the categorization pipeline.
///
/// None of these abort an overall run: batch-level failures are recovered by
/// substituting rule-based categorization, and preflight failures degrade the
/// whole run the same way. The only variant crossing the engine boundary as a
/// hard error is `NoBookmarks`.
#[derive(Debug, Clone)]
pub enum CategorizationError {
    /// Extracted text is not recoverable JSON after all repair tiers.
    ParseFailure(String),
    /// Transport/HTTP/provider failure for one batch request.
    ApiError { message: String, retryable: bool },
    /// The configured API key is missing or malformed; detected before any
    /// network call.
    InvalidApiKey(String),
    /// The provider endpoint is unreachable; detected by the preflight check.
    NetworkUnavailable(String),
    /// The run was invoked with zero bookmarks.
    NoBookmarks,
}

impl fmt::Display for CategorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategorizationError::ParseFailure(msg) => {
                write!(f, "Unrecoverable model output: {}", msg)
            }
            CategorizationError::ApiError { message, retryable } => {
                write!(f, "Provider API error (retryable={}): {}", retryable, message)
            }
            CategorizationError::InvalidApiKey(msg) => write!(f, "Invalid API key: {}", msg),
            CategorizationError::NetworkUnavailable(msg) => {
                write!(f, "Network unavailable: {}", msg)
            }
            CategorizationError::NoBookmarks => write!(f, "No bookmarks supplied"),
        }
    }
}

impl std::error::Error for CategorizationError {}

// === CacheError ===

/// Errors related to the persisted validity/aggregate cache.
///
/// `Corrupted` is only informational — corrupted persisted state is read back
/// as an empty cache, never surfaced as a scan failure.
#[derive(Debug)]
pub enum CacheError {
    /// Persisted cache state could not be decoded.
    Corrupted(String),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Corrupted(msg) => write!(f, "Cache state corrupted: {}", msg),
            CacheError::DatabaseError(msg) => write!(f, "Cache database error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

// === StoreError ===

/// Errors raised by a bookmark store adapter.
#[derive(Debug)]
pub enum StoreError {
    /// The backing bookmark store could not be read.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "Bookmark store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
