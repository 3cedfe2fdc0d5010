//! Folder-path resolution over the bookmark tree.
//!
//! Paths are `/`-delimited chains of folder titles. [`ensure_path`]
//! materializes a path into real folder nodes, creating missing segments
//! exactly once; [`list_folder_paths`] enumerates every existing folder as
//! an id/path pair for classification prompts and UI pickers.

use crate::error::TreeError;
use crate::tree::{BookmarkNode, BookmarkTreeProvider, CreateNode, NodeId};
use serde::Serialize;

/// A folder node addressed by its derived `/`-joined path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderPath {
    pub id: NodeId,
    pub path: String,
}

/// Enumerate every folder in the tree, depth-first, with derived paths.
///
/// Bookmark leaves are skipped. Nodes with empty titles (the invisible top
/// node) contribute nothing to the path and are not listed themselves.
pub async fn list_folder_paths(
    provider: &dyn BookmarkTreeProvider,
) -> Result<Vec<FolderPath>, TreeError> {
    let tree = provider.tree().await?;
    let mut folders = Vec::new();
    collect_folders("", &tree, &mut folders);
    Ok(folders)
}

fn collect_folders(prefix: &str, nodes: &[BookmarkNode], out: &mut Vec<FolderPath>) {
    for node in nodes {
        if !node.is_folder() {
            continue;
        }
        let path = format!("{prefix}{}", node.title);
        if !path.is_empty() {
            out.push(FolderPath {
                id: node.id.clone(),
                path: path.clone(),
            });
        }
        if let Some(children) = &node.children {
            let child_prefix = if path.is_empty() {
                String::new()
            } else {
                format!("{path}/")
            };
            collect_folders(&child_prefix, children, out);
        }
    }
}

/// Ensure every folder along `path` exists and return the deepest node's id.
///
/// Leading/trailing slashes are stripped and empty segments (from `//`)
/// discarded; an empty result is [`TreeError::InvalidPath`]. When the first
/// segment matches the resolved root's title case-insensitively it is
/// dropped, so a classifier echoing the root name does not nest the root
/// under itself. Existing children are always searched before creating, so
/// repeated calls against the same tree create no duplicate folders.
pub async fn ensure_path(
    provider: &dyn BookmarkTreeProvider,
    path: &str,
    root_hint: Option<&NodeId>,
) -> Result<NodeId, TreeError> {
    let mut segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        return Err(TreeError::InvalidPath(path.to_string()));
    }

    let root = match root_hint {
        Some(id) => provider.node(id).await?,
        None => default_root(provider).await?,
    };

    if segments[0].to_lowercase() == root.title.to_lowercase() {
        segments.remove(0);
    }

    let mut current = root.id;
    for segment in segments {
        let children = provider.children(&current).await?;
        let existing = children
            .into_iter()
            .find(|child| child.is_folder() && child.title == segment);
        current = match existing {
            Some(folder) => folder.id,
            None => {
                provider
                    .create(CreateNode::folder(current.clone(), segment))
                    .await?
                    .id
            }
        };
    }
    Ok(current)
}

/// The default root for new paths: the first folder-typed child of the
/// tree's top node.
async fn default_root(provider: &dyn BookmarkTreeProvider) -> Result<BookmarkNode, TreeError> {
    let tree = provider.tree().await?;
    let top = tree
        .first()
        .ok_or_else(|| TreeError::Backend("bookmark tree is empty".into()))?;
    top.children
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|child| child.is_folder())
        .cloned()
        .ok_or_else(|| TreeError::Backend("bookmark tree has no root folder".into()))
}
