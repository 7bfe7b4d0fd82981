//! Validity Cache for MarkWarden.
//!
//! Implements `ValidityCacheTrait` — per-URL link-validity records with a 24h
//! TTL, plus whole-collection aggregate caches (duplicate groups, empty-folder
//! lists) keyed by a content hash of the bookmark set. Backed by SQLite via
//! `rusqlite`; load and flush are explicit, the cache is inert otherwise.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use rusqlite::params;

use crate::database::Database;
use crate::types::bookmark::{Bookmark, BookmarkTreeNode};
use crate::types::detection::{DuplicateReport, EmptyFolderRecord, ValidityRecord};
use crate::types::errors::CacheError;

/// Validity records older than this are stale and re-probed.
pub const VALIDITY_TTL_MS: i64 = 24 * 60 * 60 * 1000;

const KIND_DUPLICATES: &str = "duplicates";
const KIND_EMPTY_FOLDERS: &str = "empty_folders";

/// Returns the current UNIX timestamp in milliseconds.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Computes a cheap fingerprint of the bookmark collection.
///
/// FNV-1a over sorted `id:url:title` triples. A collision only causes a stale
/// aggregate-cache read, never corruption, so no cryptographic hash is needed.
pub fn compute_set_hash(bookmarks: &[Bookmark]) -> String {
    let triples = bookmarks
        .iter()
        .map(|b| format!("{}:{}:{}", b.id, b.url, b.title))
        .collect();
    fnv_hex(triples)
}

/// Fingerprint of the full tree, folder nodes included.
///
/// The empty-folder cache keys on this rather than on the leaf set: adding or
/// removing an empty folder changes no bookmark, but must still invalidate
/// that cache.
pub fn compute_tree_hash(root: &BookmarkTreeNode) -> String {
    let mut triples = Vec::new();
    collect_node_triples(root, &mut triples);
    fnv_hex(triples)
}

fn collect_node_triples(node: &BookmarkTreeNode, out: &mut Vec<String>) {
    out.push(format!(
        "{}:{}:{}",
        node.id,
        node.url.as_deref().unwrap_or(""),
        node.title
    ));
    for child in &node.children {
        collect_node_triples(child, out);
    }
}

fn fnv_hex(mut items: Vec<String>) -> String {
    items.sort();
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for item in &items {
        for byte in item.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash ^= u64::from(b'\n');
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    format!("{:016x}", hash)
}

/// Trait defining validity cache operations.
pub trait ValidityCacheTrait {
    fn get(&self, url: &str) -> Option<&ValidityRecord>;
    fn put(&mut self, url: &str, record: ValidityRecord);
    fn is_fresh(&self, record: &ValidityRecord) -> bool;
    /// Loads persisted state, dropping stale validity entries.
    fn load(&mut self) -> Result<(), CacheError>;
    /// Persists current state, evicting stale validity entries.
    fn flush(&self) -> Result<(), CacheError>;
    /// Drops aggregate caches whose stored hash no longer matches.
    fn invalidate_if_changed(&mut self, current_hash: &str);
    fn cached_duplicates(&self, set_hash: &str) -> Option<DuplicateReport>;
    fn store_duplicates(&mut self, set_hash: &str, report: &DuplicateReport);
    fn cached_empty_folders(&self, set_hash: &str) -> Option<Vec<EmptyFolderRecord>>;
    fn store_empty_folders(&mut self, set_hash: &str, records: &[EmptyFolderRecord]);
}

/// Validity cache backed by SQLite.
pub struct ValidityCache {
    db: Arc<Database>,
    records: HashMap<String, ValidityRecord>,
    duplicates: Option<(String, DuplicateReport)>,
    empty_folders: Option<(String, Vec<EmptyFolderRecord>)>,
}

impl ValidityCache {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            records: HashMap::new(),
            duplicates: None,
            empty_folders: None,
        }
    }

    /// Number of in-memory validity records (fresh or not).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn load_aggregate(&self, kind: &str) -> Option<(String, String)> {
        let conn = self.db.connection();
        conn.query_row(
            "SELECT set_hash, payload FROM aggregate_cache WHERE kind = ?1",
            params![kind],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .ok()
    }

    fn store_aggregate(&self, kind: &str, set_hash: &str, payload: &str) -> Result<(), CacheError> {
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO aggregate_cache (kind, set_hash, payload, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params![kind, set_hash, payload, now_ms()],
            )
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

impl ValidityCacheTrait for ValidityCache {
    fn get(&self, url: &str) -> Option<&ValidityRecord> {
        self.records.get(url)
    }

    fn put(&mut self, url: &str, record: ValidityRecord) {
        self.records.insert(url.to_string(), record);
    }

    fn is_fresh(&self, record: &ValidityRecord) -> bool {
        now_ms() - record.timestamp < VALIDITY_TTL_MS
    }

    fn load(&mut self) -> Result<(), CacheError> {
        let cutoff = now_ms() - VALIDITY_TTL_MS;
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare("SELECT url, valid, error, timestamp FROM validity_cache WHERE timestamp >= ?1")
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        let rows = stmt
            .query_map(params![cutoff], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    ValidityRecord {
                        valid: row.get::<_, i64>(1)? != 0,
                        error: row.get(2)?,
                        timestamp: row.get(3)?,
                    },
                ))
            })
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        self.records.clear();
        for row in rows {
            let (url, record) = row.map_err(|e| CacheError::DatabaseError(e.to_string()))?;
            self.records.insert(url, record);
        }
        drop(stmt);

        // Malformed aggregate payloads read back as an empty cache, never an error
        self.duplicates = self.load_aggregate(KIND_DUPLICATES).and_then(|(hash, payload)| {
            match serde_json::from_str(&payload) {
                Ok(report) => Some((hash, report)),
                Err(e) => {
                    warn!("discarding corrupted duplicate cache: {}", e);
                    None
                }
            }
        });
        self.empty_folders =
            self.load_aggregate(KIND_EMPTY_FOLDERS).and_then(|(hash, payload)| {
                match serde_json::from_str(&payload) {
                    Ok(records) => Some((hash, records)),
                    Err(e) => {
                        warn!("discarding corrupted empty-folder cache: {}", e);
                        None
                    }
                }
            });

        debug!("loaded {} validity record(s) from cache", self.records.len());
        Ok(())
    }

    fn flush(&self) -> Result<(), CacheError> {
        let cutoff = now_ms() - VALIDITY_TTL_MS;
        let conn = self.db.connection();

        for (url, record) in &self.records {
            if record.timestamp < cutoff {
                continue;
            }
            conn.execute(
                "INSERT OR REPLACE INTO validity_cache (url, valid, error, timestamp) VALUES (?1, ?2, ?3, ?4)",
                params![url, record.valid as i64, record.error, record.timestamp],
            )
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        }

        // Lazy TTL eviction happens here; there is no background timer
        conn.execute(
            "DELETE FROM validity_cache WHERE timestamp < ?1",
            params![cutoff],
        )
        .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        if let Some((hash, report)) = &self.duplicates {
            let payload = serde_json::to_string(report)
                .map_err(|e| CacheError::Corrupted(e.to_string()))?;
            self.store_aggregate(KIND_DUPLICATES, hash, &payload)?;
        }
        if let Some((hash, records)) = &self.empty_folders {
            let payload = serde_json::to_string(records)
                .map_err(|e| CacheError::Corrupted(e.to_string()))?;
            self.store_aggregate(KIND_EMPTY_FOLDERS, hash, &payload)?;
        }
        Ok(())
    }

    fn invalidate_if_changed(&mut self, current_hash: &str) {
        if let Some((hash, _)) = &self.duplicates {
            if hash != current_hash {
                debug!("bookmark set changed; dropping duplicate cache");
                self.duplicates = None;
            }
        }
        if let Some((hash, _)) = &self.empty_folders {
            if hash != current_hash {
                debug!("bookmark set changed; dropping empty-folder cache");
                self.empty_folders = None;
            }
        }
    }

    fn cached_duplicates(&self, set_hash: &str) -> Option<DuplicateReport> {
        match &self.duplicates {
            Some((hash, report)) if hash == set_hash => Some(report.clone()),
            _ => None,
        }
    }

    fn store_duplicates(&mut self, set_hash: &str, report: &DuplicateReport) {
        self.duplicates = Some((set_hash.to_string(), report.clone()));
    }

    fn cached_empty_folders(&self, set_hash: &str) -> Option<Vec<EmptyFolderRecord>> {
        match &self.empty_folders {
            Some((hash, records)) if hash == set_hash => Some(records.clone()),
            _ => None,
        }
    }

    fn store_empty_folders(&mut self, set_hash: &str, records: &[EmptyFolderRecord]) {
        self.empty_folders = Some((set_hash.to_string(), records.to_vec()));
    }
}
