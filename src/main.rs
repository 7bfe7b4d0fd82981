//! MarkWarden — bookmark categorization and data-quality detection engine.
//!
//! Entry point: runs an offline console demo over a sample bookmark
//! collection. No network calls are made; the categorization run shows the
//! rule-based degradation path.

use std::sync::Arc;

use markwarden::database::Database;
use markwarden::detectors::dead_links::{DeadLinkDetector, LinkProber, ProbeVerdict};
use markwarden::detectors::duplicates::DuplicateDetector;
use markwarden::detectors::empty_folders::EmptyFolderDetector;
use markwarden::managers::bookmark_store::{BookmarkStore, InMemoryBookmarkStore};
use markwarden::managers::validity_cache::{ValidityCache, ValidityCacheTrait};
use markwarden::services::llm_client::CategorizationClient;
use markwarden::services::orchestrator::{BatchCategorizationOrchestrator, RunOptions};
use markwarden::services::precategorize;
use markwarden::types::bookmark::{Bookmark, BookmarkTreeNode};
use markwarden::types::category::{CategorizationSettings, CategoryMap};
use markwarden::types::errors::CategorizationError;

/// Client that reports the network as unreachable, forcing the orchestrator
/// down the whole-run rule-based fallback — the honest offline behavior.
struct OfflineClient;

impl CategorizationClient for OfflineClient {
    async fn preflight(
        &self,
        _settings: &CategorizationSettings,
    ) -> Result<(), CategorizationError> {
        Err(CategorizationError::NetworkUnavailable(
            "demo mode is offline".to_string(),
        ))
    }

    async fn categorize(
        &self,
        _batch: &[Bookmark],
        _settings: &CategorizationSettings,
    ) -> Result<CategoryMap, CategorizationError> {
        Err(CategorizationError::NetworkUnavailable(
            "demo mode is offline".to_string(),
        ))
    }
}

/// Prober that trusts every URL, so the dead-link scan stays offline.
struct TrustingProber;

impl LinkProber for TrustingProber {
    async fn probe(&self, _url: &str) -> ProbeVerdict {
        ProbeVerdict::valid()
    }
}

fn sample_tree() -> BookmarkTreeNode {
    BookmarkTreeNode::folder(
        "root",
        "Bookmarks",
        vec![
            BookmarkTreeNode::folder(
                "dev",
                "Dev",
                vec![
                    BookmarkTreeNode::leaf("1", "GitHub", "https://github.com"),
                    BookmarkTreeNode::leaf("2", "GitHub", "https://www.github.com/"),
                    BookmarkTreeNode::leaf("3", "Docs.rs", "https://docs.rs"),
                ],
            ),
            BookmarkTreeNode::folder(
                "media",
                "Media",
                vec![
                    BookmarkTreeNode::leaf("4", "YouTube", "https://youtube.com"),
                    BookmarkTreeNode::leaf("5", "Spotify", "https://spotify.com"),
                ],
            ),
            BookmarkTreeNode::folder("inbox", "Inbox", vec![]),
            BookmarkTreeNode::folder(
                "archive",
                "Archive",
                vec![BookmarkTreeNode::folder("archive-old", "Old", vec![])],
            ),
            BookmarkTreeNode::leaf("6", "Weird", "not a url at all"),
        ],
    )
}

#[tokio::main]
async fn main() {
    env_logger::init();

    println!();
    println!("MarkWarden v{} — Demo Mode (offline)", env!("CARGO_PKG_VERSION"));
    println!("Bookmark categorization & data-quality detection engine");
    println!();

    let store = InMemoryBookmarkStore::new(sample_tree());
    let bookmarks = store.all_bookmarks().expect("in-memory store");
    let tree = store.tree().expect("in-memory store");
    println!("Loaded {} bookmark(s) from the sample store", bookmarks.len());

    section("Rule-based pre-categorization");
    let hint = precategorize::categorize_by_rules(&bookmarks);
    for (category, entries) in &hint {
        println!("  {}: {} bookmark(s)", category, entries.len());
    }

    section("Categorization run (degrades to rules — offline)");
    let orchestrator = BatchCategorizationOrchestrator::new(OfflineClient);
    let outcome = orchestrator
        .run(&bookmarks, &CategorizationSettings::default(), RunOptions::default())
        .await
        .expect("non-empty input");
    println!(
        "  status={:?}, batches={}/{}, degraded={}",
        outcome.status, outcome.batches_completed, outcome.batches_total, outcome.degraded_batches
    );
    for (category, entries) in &outcome.categories {
        println!("  {}: {} bookmark(s)", category, entries.len());
    }

    let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
    let mut cache = ValidityCache::new(db);
    cache.load().expect("cache load");

    section("Duplicate detection");
    let mut duplicates = DuplicateDetector::new();
    let report = duplicates.detect(&bookmarks, &mut cache);
    println!(
        "  {} URL group(s), {} extra cop(ies)",
        report.url_groups.len(),
        report.url_duplicate_count
    );
    let again = duplicates.detect(&bookmarks, &mut cache);
    println!(
        "  second pass identical={}, scans performed={}",
        again == report,
        duplicates.scans_performed()
    );

    section("Empty-folder detection");
    let mut empties = EmptyFolderDetector::new();
    for record in empties.detect(&tree, &mut cache) {
        println!("  {:?}: {} ({})", record.kind, record.title, record.id);
    }

    section("Dead-link detection (stub prober)");
    let detector = DeadLinkDetector::new(TrustingProber);
    let dead = detector.scan(&bookmarks, &mut cache).await;
    println!(
        "  valid={}, invalid={}, cache hits={}, misses={}",
        dead.valid, dead.invalid, dead.cache_stats.hits, dead.cache_stats.misses
    );
    for bad in &dead.invalid_bookmarks {
        println!("  invalid: {} ({})", bad.title, bad.url);
    }

    cache.flush().expect("cache flush");
    println!();
    println!("Done. Caches flushed; rerun detection to see cache short-circuits.");
}

fn section(name: &str) {
    println!();
    println!("── {} ──", name);
}
