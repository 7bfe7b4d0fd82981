//! Empty-folder detection for MarkWarden.
//!
//! Recursive walk over the bookmark tree. A folder is `Empty` with zero
//! children, `NestedEmpty` when it has children but no transitive descendant
//! is a bookmark. Parent and child empty folders are reported independently;
//! the walk continues into reported folders.

use log::debug;

use crate::managers::validity_cache::{compute_tree_hash, ValidityCache, ValidityCacheTrait};
use crate::types::bookmark::BookmarkTreeNode;
use crate::types::detection::{EmptyFolderKind, EmptyFolderRecord};

/// Empty-folder detector with scan-count instrumentation.
pub struct EmptyFolderDetector {
    scans_performed: u64,
}

impl EmptyFolderDetector {
    pub fn new() -> Self {
        Self { scans_performed: 0 }
    }

    /// Number of full tree walks actually performed (cache hits excluded).
    pub fn scans_performed(&self) -> u64 {
        self.scans_performed
    }

    /// Cache-aware detection keyed by a hash of the whole tree. Folder nodes
    /// are part of the key, so folder-only edits invalidate the cache.
    pub fn detect(
        &mut self,
        root: &BookmarkTreeNode,
        cache: &mut ValidityCache,
    ) -> Vec<EmptyFolderRecord> {
        let hash = compute_tree_hash(root);
        if let Some(cached) = cache.cached_empty_folders(&hash) {
            debug!("empty-folder scan served from cache (hash {})", hash);
            return cached;
        }
        let records = self.scan(root);
        cache.store_empty_folders(&hash, &records);
        records
    }

    /// Pure tree walk. The root itself is a container and is never reported.
    pub fn scan(&mut self, root: &BookmarkTreeNode) -> Vec<EmptyFolderRecord> {
        self.scans_performed += 1;
        let mut records = Vec::new();
        walk(root, &mut records);
        records
    }
}

impl Default for EmptyFolderDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// True when any transitive descendant (or the node itself) is a bookmark.
fn has_bookmark(node: &BookmarkTreeNode) -> bool {
    node.url.is_some() || node.children.iter().any(has_bookmark)
}

fn walk(node: &BookmarkTreeNode, records: &mut Vec<EmptyFolderRecord>) {
    for child in &node.children {
        if !child.is_folder() {
            continue;
        }
        if child.children.is_empty() {
            records.push(EmptyFolderRecord {
                id: child.id.clone(),
                title: child.title.clone(),
                parent_id: Some(node.id.clone()),
                kind: EmptyFolderKind::Empty,
            });
        } else if !has_bookmark(child) {
            records.push(EmptyFolderRecord {
                id: child.id.clone(),
                title: child.title.clone(),
                parent_id: Some(node.id.clone()),
                kind: EmptyFolderKind::NestedEmpty,
            });
        }
        walk(child, records);
    }
}
