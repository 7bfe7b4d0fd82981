use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reserved bucket for bookmarks that could not be assigned a better category.
pub const OTHER_CATEGORY: &str = "Other";

/// Hard upper bound on the number of output categories per run.
pub const MAX_CATEGORIES: usize = 30;

/// Categories kept untouched when the validator folds an oversized result.
pub const KEEP_TOP_CATEGORIES: usize = 25;

/// A `{title, url}` pair as it appears inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRef {
    pub title: String,
    pub url: String,
}

/// Mapping from category name to its member bookmarks.
///
/// Invariant after validation and alignment: every input URL appears in
/// exactly one category (categorization is a partition, not a cover).
pub type CategoryMap = BTreeMap<String, Vec<BookmarkRef>>;

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenAi,
    Custom,
}

/// Read-only settings supplied by the surrounding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizationSettings {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
    pub custom_api_url: Option<String>,
    pub batch_size: usize,
}

impl Default for CategorizationSettings {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            api_key: String::new(),
            model: "gemini-2.0-flash".to_string(),
            custom_api_url: None,
            batch_size: 50,
        }
    }
}

/// Terminal state of a categorization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Cancelled,
}

/// Progress snapshot emitted after every batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub batches_completed: usize,
    pub batches_total: usize,
    pub last_batch_category_count: usize,
}

/// Final result of a categorization run.
///
/// `degraded_batches` counts batches that fell back to rule-based
/// categorization after an API or parse failure; the partition is still
/// complete in that case, just of lower quality.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub categories: CategoryMap,
    pub status: RunStatus,
    pub batches_total: usize,
    pub batches_completed: usize,
    pub degraded_batches: usize,
}
