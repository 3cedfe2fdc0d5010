//! Bookmark move tool.

use super::{required_str, Tool, ToolArgs};
use crate::error::ToolError;
use crate::paths::ensure_path;
use crate::tree::{BookmarkTreeProvider, NodeId};
use crate::types::{FunctionDefinition, ToolDefinition};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Tool that moves a bookmark into a folder path, creating missing folders.
pub struct MoveBookmarkTool {
    provider: Arc<dyn BookmarkTreeProvider>,
    new_path_root: Option<NodeId>,
}

impl MoveBookmarkTool {
    pub fn new(provider: Arc<dyn BookmarkTreeProvider>, new_path_root: Option<NodeId>) -> Self {
        Self {
            provider,
            new_path_root,
        }
    }
}

#[async_trait]
impl Tool for MoveBookmarkTool {
    fn name(&self) -> &'static str {
        "move_bookmark"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            tool_type: "function".into(),
            function: FunctionDefinition {
                name: self.name().into(),
                description: "Move a bookmark into the given folder path. Missing folders \
                              along the path are created automatically."
                    .into(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "bookmarkId": {
                            "type": "string",
                            "description": "Id of the bookmark to move"
                        },
                        "folderPath": {
                            "type": "string",
                            "description": "Target folder path separated by /, e.g. \"Tech/Rust\""
                        }
                    },
                    "required": ["bookmarkId", "folderPath"]
                }),
            },
        }
    }

    async fn execute(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let bookmark_id = required_str(args, "bookmarkId")?;
        let folder_path = required_str(args, "folderPath")?;
        move_to_path(
            self.provider.as_ref(),
            self.new_path_root.as_ref(),
            bookmark_id,
            folder_path,
        )
        .await
    }
}

/// Move one bookmark into `folder_path`, shared with batch updates.
pub(crate) async fn move_to_path(
    provider: &dyn BookmarkTreeProvider,
    root_hint: Option<&NodeId>,
    bookmark_id: &str,
    folder_path: &str,
) -> Result<Value, ToolError> {
    let new_parent = ensure_path(provider, folder_path, root_hint).await?;
    let moved = provider
        .move_node(&NodeId::from(bookmark_id), &new_parent)
        .await?;
    Ok(json!({
        "success": true,
        "bookmarkId": bookmark_id,
        "title": moved.title,
        "newPath": folder_path,
    }))
}
