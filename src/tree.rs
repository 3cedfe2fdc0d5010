//! Bookmark-tree provider capability.
//!
//! The core never talks to a browser directly; it consumes this trait.
//! Hosts implement it over whatever bookmark store they own (a browser
//! extension bridge, a database, an in-memory tree in tests). Node ids are
//! opaque: the core relies on equality only, never on their format.

use crate::error::TreeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of one node in the bookmark tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One node of the bookmark tree.
///
/// A node with a `url` is a bookmark (leaf); a node without one is a folder
/// and may carry `children` when returned from [`BookmarkTreeProvider::tree`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: NodeId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

/// Creation request for a new node; omit `url` to create a folder.
#[derive(Debug, Clone)]
pub struct CreateNode {
    pub parent_id: NodeId,
    pub title: String,
    pub url: Option<String>,
}

impl CreateNode {
    /// Creation request for a folder.
    pub fn folder(parent_id: NodeId, title: impl Into<String>) -> Self {
        Self {
            parent_id,
            title: title.into(),
            url: None,
        }
    }

    /// Creation request for a bookmark leaf.
    pub fn bookmark(parent_id: NodeId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            parent_id,
            title: title.into(),
            url: Some(url.into()),
        }
    }
}

/// Capability over a live bookmark tree.
///
/// Mutations are expected to be serialized by the host; the core issues one
/// call at a time and never holds references across calls.
#[async_trait]
pub trait BookmarkTreeProvider: Send + Sync {
    /// Full tree, children populated recursively. The top node is the
    /// invisible root whose children are the visible root folders.
    async fn tree(&self) -> Result<Vec<BookmarkNode>, TreeError>;

    /// Direct children of one node, children fields unpopulated.
    async fn children(&self, id: &NodeId) -> Result<Vec<BookmarkNode>, TreeError>;

    /// Look up a single node by id.
    async fn node(&self, id: &NodeId) -> Result<BookmarkNode, TreeError>;

    /// Create a folder or bookmark under an existing parent.
    async fn create(&self, spec: CreateNode) -> Result<BookmarkNode, TreeError>;

    /// Re-parent a node.
    async fn move_node(&self, id: &NodeId, new_parent_id: &NodeId)
        -> Result<BookmarkNode, TreeError>;

    /// Change a node's title.
    async fn rename(&self, id: &NodeId, new_title: &str) -> Result<BookmarkNode, TreeError>;

    /// Delete a node.
    async fn remove(&self, id: &NodeId) -> Result<(), TreeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_round_trips_through_serde_as_bare_string() {
        let id = NodeId::new("bookmark-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bookmark-7\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn folder_detection_follows_url_presence() {
        let folder = BookmarkNode {
            id: NodeId::new("1"),
            title: "Tech".into(),
            url: None,
            parent_id: None,
            children: None,
        };
        let leaf = BookmarkNode {
            id: NodeId::new("2"),
            title: "Rust".into(),
            url: Some("https://www.rust-lang.org".into()),
            parent_id: Some(NodeId::new("1")),
            children: None,
        };
        assert!(folder.is_folder());
        assert!(!leaf.is_folder());
    }

    #[test]
    fn create_node_helpers_set_url_accordingly() {
        let folder = CreateNode::folder(NodeId::new("1"), "AI");
        assert!(folder.url.is_none());
        let bookmark = CreateNode::bookmark(NodeId::new("1"), "Docs", "https://docs.rs");
        assert_eq!(bookmark.url.as_deref(), Some("https://docs.rs"));
    }
}
