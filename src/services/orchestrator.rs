//! Batch categorization orchestrator for MarkWarden.
//!
//! Splits a bookmark collection into fixed-size batches, drives each batch
//! through the categorization client and validator, merges results, reports
//! progress, honors cooperative cancellation, and degrades to rule-based
//! categorization on batch failure. A single batch failure degrades quality;
//! it never aborts the run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::warn;

use crate::services::llm_client::CategorizationClient;
use crate::services::precategorize;
use crate::services::validator::validate_categories;
use crate::types::bookmark::Bookmark;
use crate::types::category::{
    BatchProgress, BookmarkRef, CategorizationSettings, CategoryMap, RunOutcome, RunStatus,
    OTHER_CATEGORY,
};
use crate::types::errors::CategorizationError;

/// Per-run options. All run state is local to one `run` call; nothing
/// survives between runs.
pub struct RunOptions {
    /// Bookmarks per batch; values below 1 are treated as 1.
    pub batch_size: usize,
    /// Cooperative cancel signal, checked at batch boundaries only. The
    /// in-flight batch is allowed to complete and its result is merged, so an
    /// already-paid provider call is never discarded.
    pub cancel: Arc<AtomicBool>,
    /// Invoked after every merged batch.
    pub on_progress: Option<Box<dyn FnMut(BatchProgress) + Send>>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            batch_size: 50,
            cancel: Arc::new(AtomicBool::new(false)),
            on_progress: None,
        }
    }
}

/// Orchestrates a full categorization run over a client implementation.
pub struct BatchCategorizationOrchestrator<C: CategorizationClient> {
    client: C,
}

impl<C: CategorizationClient> BatchCategorizationOrchestrator<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Runs categorization over the whole collection.
    ///
    /// The only hard failure is an empty input. Preflight failures (invalid
    /// key, unreachable network) degrade the entire run to rule-based
    /// categorization, since no batch could succeed.
    pub async fn run(
        &self,
        bookmarks: &[Bookmark],
        settings: &CategorizationSettings,
        mut options: RunOptions,
    ) -> Result<RunOutcome, CategorizationError> {
        if bookmarks.is_empty() {
            return Err(CategorizationError::NoBookmarks);
        }

        let batch_size = options.batch_size.max(1);
        let batches: Vec<&[Bookmark]> = bookmarks.chunks(batch_size).collect();
        let batches_total = batches.len();

        if let Err(err) = self.client.preflight(settings).await {
            match err {
                CategorizationError::InvalidApiKey(_)
                | CategorizationError::NetworkUnavailable(_) => {
                    warn!("preflight failed ({}); whole run degrades to rule-based", err);
                    let categories = align_to_batch(
                        precategorize::fallback_partition(bookmarks),
                        bookmarks,
                    );
                    let category_count = categories.len();
                    if let Some(callback) = options.on_progress.as_mut() {
                        callback(BatchProgress {
                            batches_completed: batches_total,
                            batches_total,
                            last_batch_category_count: category_count,
                        });
                    }
                    return Ok(RunOutcome {
                        categories,
                        status: RunStatus::Completed,
                        batches_total,
                        batches_completed: batches_total,
                        degraded_batches: batches_total,
                    });
                }
                other => return Err(other),
            }
        }

        let mut categories = CategoryMap::new();
        let mut batches_completed = 0usize;
        let mut degraded_batches = 0usize;
        let mut status = RunStatus::Completed;

        for (index, batch) in batches.iter().enumerate() {
            if options.cancel.load(Ordering::SeqCst) {
                status = RunStatus::Cancelled;
                break;
            }

            let batch_map = match self.client.categorize(batch, settings).await {
                Ok(raw) => validate_categories(raw),
                Err(err) => {
                    warn!(
                        "batch {}/{} failed ({}); substituting rule-based categorization",
                        index + 1,
                        batches_total,
                        err
                    );
                    degraded_batches += 1;
                    precategorize::fallback_partition(batch)
                }
            };

            let aligned = align_to_batch(batch_map, batch);
            let category_count = aligned.len();
            merge_categories(&mut categories, aligned);
            batches_completed += 1;

            if let Some(callback) = options.on_progress.as_mut() {
                callback(BatchProgress {
                    batches_completed,
                    batches_total,
                    last_batch_category_count: category_count,
                });
            }
        }

        Ok(RunOutcome {
            categories,
            status,
            batches_total,
            batches_completed,
            degraded_batches,
        })
    }
}

/// Merges a batch result into the running accumulator: category-wise list
/// concatenation, creating categories as they first appear.
pub fn merge_categories(accumulator: &mut CategoryMap, addition: CategoryMap) {
    for (name, entries) in addition {
        accumulator.entry(name).or_default().extend(entries);
    }
}

/// Restricts a category map to exactly the batch's bookmarks.
///
/// The model may hallucinate URLs, duplicate a bookmark across categories, or
/// omit some entirely. Alignment keeps each batch URL occurrence exactly once
/// (first category wins), restores the store's own titles, and routes
/// omissions to `"Other"` — upholding the partition invariant per batch.
pub fn align_to_batch(map: CategoryMap, batch: &[Bookmark]) -> CategoryMap {
    let mut remaining: HashMap<&str, usize> = HashMap::new();
    let mut titles: HashMap<&str, &str> = HashMap::new();
    for bookmark in batch {
        *remaining.entry(bookmark.url.as_str()).or_insert(0) += 1;
        titles.entry(bookmark.url.as_str()).or_insert(&bookmark.title);
    }

    let mut aligned = CategoryMap::new();
    for (name, entries) in map {
        let mut kept = Vec::new();
        for entry in entries {
            if let Some(count) = remaining.get_mut(entry.url.as_str()) {
                if *count > 0 {
                    *count -= 1;
                    let title = titles
                        .get(entry.url.as_str())
                        .map(|t| t.to_string())
                        .unwrap_or(entry.title);
                    kept.push(BookmarkRef {
                        title,
                        url: entry.url,
                    });
                }
            }
        }
        if !kept.is_empty() {
            aligned.insert(name, kept);
        }
    }

    let mut leftovers = Vec::new();
    for bookmark in batch {
        if let Some(count) = remaining.get_mut(bookmark.url.as_str()) {
            if *count > 0 {
                *count -= 1;
                leftovers.push(BookmarkRef {
                    title: bookmark.title.clone(),
                    url: bookmark.url.clone(),
                });
            }
        }
    }
    if !leftovers.is_empty() {
        aligned
            .entry(OTHER_CATEGORY.to_string())
            .or_default()
            .extend(leftovers);
    }
    aligned
}
