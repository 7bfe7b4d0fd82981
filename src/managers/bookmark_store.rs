//! Bookmark store boundary for MarkWarden.
//!
//! The engine never talks to a host bookmark API directly; it depends on the
//! `BookmarkStore` trait and receives read-only snapshots. Mutation (moving a
//! bookmark into a category folder, deleting duplicates) is performed by the
//! caller after the engine returns a plan.

use crate::types::bookmark::{Bookmark, BookmarkTreeNode};
use crate::types::errors::StoreError;

/// Trait a host bookmark store adapter must implement.
pub trait BookmarkStore {
    /// All bookmarks as a flat list.
    fn all_bookmarks(&self) -> Result<Vec<Bookmark>, StoreError>;
    /// The full bookmark tree; folders have no URL.
    fn tree(&self) -> Result<BookmarkTreeNode, StoreError>;
}

/// Flattens a bookmark tree into the leaf bookmarks, assigning `parent_id`
/// from the enclosing folder.
pub fn flatten_tree(root: &BookmarkTreeNode) -> Vec<Bookmark> {
    let mut out = Vec::new();
    collect_leaves(root, None, &mut out);
    out
}

fn collect_leaves(node: &BookmarkTreeNode, parent_id: Option<&str>, out: &mut Vec<Bookmark>) {
    if let Some(url) = &node.url {
        out.push(Bookmark {
            id: node.id.clone(),
            title: node.title.clone(),
            url: url.clone(),
            parent_id: parent_id.map(str::to_string),
        });
        return;
    }
    for child in &node.children {
        collect_leaves(child, Some(&node.id), out);
    }
}

/// In-memory bookmark store for tests and the demo binary.
pub struct InMemoryBookmarkStore {
    root: BookmarkTreeNode,
}

impl InMemoryBookmarkStore {
    pub fn new(root: BookmarkTreeNode) -> Self {
        Self { root }
    }

    /// Builds a flat store (every bookmark directly under a synthetic root).
    pub fn from_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
        let children = bookmarks
            .into_iter()
            .map(|b| BookmarkTreeNode::leaf(&b.id, &b.title, &b.url))
            .collect();
        Self {
            root: BookmarkTreeNode::folder("root", "Bookmarks", children),
        }
    }
}

impl BookmarkStore for InMemoryBookmarkStore {
    fn all_bookmarks(&self) -> Result<Vec<Bookmark>, StoreError> {
        Ok(flatten_tree(&self.root))
    }

    fn tree(&self) -> Result<BookmarkTreeNode, StoreError> {
        Ok(self.root.clone())
    }
}
