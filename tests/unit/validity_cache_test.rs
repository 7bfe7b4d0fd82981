//! Unit tests for the persisted validity cache: TTL handling, flush/load
//! roundtrips, aggregate caching, and corruption recovery.

use std::sync::Arc;

use markwarden::database::Database;
use markwarden::managers::validity_cache::{
    compute_set_hash, compute_tree_hash, now_ms, ValidityCache, ValidityCacheTrait,
    VALIDITY_TTL_MS,
};
use markwarden::types::bookmark::{Bookmark, BookmarkTreeNode};
use markwarden::types::detection::{
    DuplicateReport, EmptyFolderKind, EmptyFolderRecord, ValidityRecord,
};
use rusqlite::params;

fn bookmark(id: &str, title: &str, url: &str) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        title: title.to_string(),
        url: url.to_string(),
        parent_id: None,
    }
}

fn fresh_record(valid: bool) -> ValidityRecord {
    ValidityRecord {
        valid,
        error: if valid { None } else { Some("HTTP 404".to_string()) },
        timestamp: now_ms(),
    }
}

fn stale_record() -> ValidityRecord {
    ValidityRecord {
        valid: true,
        error: None,
        timestamp: now_ms() - VALIDITY_TTL_MS - 1000,
    }
}

#[test]
fn test_put_get_and_freshness() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let mut cache = ValidityCache::new(db);

    cache.put("https://a.example", fresh_record(true));
    cache.put("https://b.example", stale_record());

    let fresh = cache.get("https://a.example").unwrap();
    assert!(cache.is_fresh(fresh));
    let stale = cache.get("https://b.example").unwrap();
    assert!(!cache.is_fresh(stale));
    assert!(cache.get("https://missing.example").is_none());
}

#[test]
fn test_flush_load_roundtrip_drops_stale_entries() {
    let db = Arc::new(Database::open_in_memory().unwrap());

    let mut cache = ValidityCache::new(Arc::clone(&db));
    cache.put("https://fresh.example", fresh_record(true));
    cache.put("https://dead.example", fresh_record(false));
    cache.put("https://stale.example", stale_record());
    cache.flush().unwrap();

    let mut reloaded = ValidityCache::new(db);
    reloaded.load().unwrap();
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.get("https://fresh.example").unwrap().valid);
    let dead = reloaded.get("https://dead.example").unwrap();
    assert!(!dead.valid);
    assert_eq!(dead.error.as_deref(), Some("HTTP 404"));
    assert!(reloaded.get("https://stale.example").is_none());
}

#[test]
fn test_aggregate_cache_roundtrip() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let set = vec![bookmark("1", "A", "https://a.example")];
    let hash = compute_set_hash(&set);

    let mut cache = ValidityCache::new(Arc::clone(&db));
    let report = DuplicateReport::default();
    let folders = vec![EmptyFolderRecord {
        id: "f1".to_string(),
        title: "Inbox".to_string(),
        parent_id: Some("root".to_string()),
        kind: EmptyFolderKind::Empty,
    }];
    cache.store_duplicates(&hash, &report);
    cache.store_empty_folders(&hash, &folders);
    cache.flush().unwrap();

    let mut reloaded = ValidityCache::new(db);
    reloaded.load().unwrap();
    assert_eq!(reloaded.cached_duplicates(&hash), Some(report));
    assert_eq!(reloaded.cached_empty_folders(&hash), Some(folders));
    // A different hash misses
    assert!(reloaded.cached_duplicates("0000000000000000").is_none());
}

#[test]
fn test_invalidate_if_changed_drops_mismatched_aggregates() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let mut cache = ValidityCache::new(db);
    cache.store_duplicates("aaaa", &DuplicateReport::default());
    cache.store_empty_folders("aaaa", &[]);

    cache.invalidate_if_changed("aaaa");
    assert!(cache.cached_duplicates("aaaa").is_some());

    cache.invalidate_if_changed("bbbb");
    assert!(cache.cached_duplicates("aaaa").is_none());
    assert!(cache.cached_empty_folders("aaaa").is_none());
}

#[test]
fn test_corrupted_aggregate_payload_reads_as_empty() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    db.connection()
        .execute(
            "INSERT INTO aggregate_cache (kind, set_hash, payload, updated_at) VALUES ('duplicates', 'aaaa', '{not json', ?1)",
            params![now_ms()],
        )
        .unwrap();

    let mut cache = ValidityCache::new(db);
    cache.load().unwrap();
    assert!(cache.cached_duplicates("aaaa").is_none());
}

#[test]
fn test_tree_hash_sees_folder_only_changes() {
    let leaf = BookmarkTreeNode::leaf("1", "A", "https://a.example");
    let without = BookmarkTreeNode::folder("root", "Bookmarks", vec![leaf.clone()]);
    let with = BookmarkTreeNode::folder(
        "root",
        "Bookmarks",
        vec![leaf, BookmarkTreeNode::folder("inbox", "Inbox", vec![])],
    );
    assert_ne!(compute_tree_hash(&without), compute_tree_hash(&with));

    let renamed = BookmarkTreeNode::folder("root", "Archive", vec![]);
    let original = BookmarkTreeNode::folder("root", "Bookmarks", vec![]);
    assert_ne!(compute_tree_hash(&renamed), compute_tree_hash(&original));
}

#[test]
fn test_set_hash_ignores_order_but_not_content() {
    let a = bookmark("1", "A", "https://a.example");
    let b = bookmark("2", "B", "https://b.example");

    let forward = compute_set_hash(&[a.clone(), b.clone()]);
    let backward = compute_set_hash(&[b.clone(), a.clone()]);
    assert_eq!(forward, backward);

    let retitled = bookmark("1", "A renamed", "https://a.example");
    assert_ne!(compute_set_hash(&[retitled, b]), forward);

    assert_eq!(forward.len(), 16);
}
