use serde::{Deserialize, Serialize};

use crate::types::bookmark::Bookmark;

/// Cached verdict for a single URL, keyed by the raw URL string.
///
/// `timestamp` is epoch milliseconds; records older than the cache TTL are
/// considered stale and re-probed on the next scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityRecord {
    pub valid: bool,
    pub error: Option<String>,
    pub timestamp: i64,
}

/// A group of bookmarks sharing one comparison key (normalized URL or
/// lower-cased title). Only emitted when `count > 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub key: String,
    pub bookmarks: Vec<Bookmark>,
    pub count: usize,
}

/// Result of a duplicate scan.
///
/// The counts are extra copies beyond the first (`count - 1` per group),
/// not total group members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub url_groups: Vec<DuplicateGroup>,
    pub title_groups: Vec<DuplicateGroup>,
    pub url_duplicate_count: usize,
    pub title_duplicate_count: usize,
}

/// How a folder qualifies as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyFolderKind {
    /// Zero children.
    Empty,
    /// Has children, but no transitive descendant is a bookmark.
    NestedEmpty,
}

/// A folder flagged by the empty-folder scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyFolderRecord {
    pub id: String,
    pub title: String,
    pub parent_id: Option<String>,
    pub kind: EmptyFolderKind,
}

/// Cache hit/miss counters for a dead-link scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Result of a dead-link scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadLinkReport {
    pub valid: usize,
    pub invalid: usize,
    pub invalid_bookmarks: Vec<Bookmark>,
    pub cache_stats: CacheStats,
}
