use serde::{Deserialize, Serialize};

/// A bookmark snapshot handed to the engine by the surrounding application.
///
/// Identity is `id` (assigned by the bookmark store); `url` is the comparison
/// key for duplicate and validity analysis. The engine never mutates the
/// store, so these are immutable per analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub parent_id: Option<String>,
}

/// A node in the bookmark tree. Folders have `url = None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkTreeNode {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    #[serde(default)]
    pub children: Vec<BookmarkTreeNode>,
}

impl BookmarkTreeNode {
    /// Creates a folder node with the given children.
    pub fn folder(id: &str, title: &str, children: Vec<BookmarkTreeNode>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: None,
            children,
        }
    }

    /// Creates a leaf bookmark node.
    pub fn leaf(id: &str, title: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: Some(url.to_string()),
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}
