//! Duplicate-bookmark detection by normalized URL.
//!
//! Two bookmarks are duplicates when their URLs differ only by scheme,
//! a leading `www.`, or one trailing slash.

use crate::error::TreeError;
use crate::tree::{BookmarkNode, BookmarkTreeProvider, NodeId};
use serde::Serialize;
use std::collections::BTreeMap;

/// A bookmark leaf with its derived tree path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRef {
    pub id: NodeId,
    pub title: String,
    pub url: String,
    pub parent_id: Option<NodeId>,
    pub path: String,
}

/// A group of bookmarks sharing one normalized URL. Always has at least
/// two members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// The shared normalized URL.
    pub url: String,
    pub count: usize,
    pub items: Vec<BookmarkRef>,
}

/// Scan the whole tree and group bookmarks by normalized URL.
///
/// Groups are sorted descending by size; singletons are excluded. The scan
/// has no side effects on the tree.
pub async fn find_duplicates(
    provider: &dyn BookmarkTreeProvider,
) -> Result<Vec<DuplicateGroup>, TreeError> {
    let tree = provider.tree().await?;
    let mut bookmarks = Vec::new();
    flatten_bookmarks("", &tree, &mut bookmarks);

    let mut by_url: BTreeMap<String, Vec<BookmarkRef>> = BTreeMap::new();
    for bookmark in bookmarks {
        by_url
            .entry(normalize_url(&bookmark.url))
            .or_default()
            .push(bookmark);
    }

    let mut groups: Vec<DuplicateGroup> = by_url
        .into_iter()
        .filter(|(_, items)| items.len() > 1)
        .map(|(url, items)| DuplicateGroup {
            url,
            count: items.len(),
            items,
        })
        .collect();
    // stable sort keeps URL-alphabetical order within equal counts
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(groups)
}

fn flatten_bookmarks(path: &str, nodes: &[BookmarkNode], out: &mut Vec<BookmarkRef>) {
    for node in nodes {
        let current_path = if node.title.is_empty() {
            path.to_string()
        } else if path.is_empty() {
            node.title.clone()
        } else {
            format!("{path}/{}", node.title)
        };

        if let Some(url) = &node.url {
            out.push(BookmarkRef {
                id: node.id.clone(),
                title: node.title.clone(),
                url: url.clone(),
                parent_id: node.parent_id.clone(),
                path: current_path.clone(),
            });
        }

        if let Some(children) = &node.children {
            flatten_bookmarks(&current_path, children, out);
        }
    }
}

/// Normalize a URL for duplicate comparison: strip one trailing slash, the
/// `http://`/`https://` scheme, and a leading `www.`.
pub fn normalize_url(url: &str) -> String {
    let normalized = url.strip_suffix('/').unwrap_or(url);
    let normalized = normalized
        .strip_prefix("https://")
        .or_else(|| normalized.strip_prefix("http://"))
        .unwrap_or(normalized);
    let normalized = normalized.strip_prefix("www.").unwrap_or(normalized);
    normalized.to_string()
}
