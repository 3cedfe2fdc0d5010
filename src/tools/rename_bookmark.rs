//! Bookmark rename tool.

use super::{required_str, Tool, ToolArgs};
use crate::error::ToolError;
use crate::tree::{BookmarkTreeProvider, NodeId};
use crate::types::{FunctionDefinition, ToolDefinition};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Tool that changes a bookmark's title.
pub struct RenameBookmarkTool {
    provider: Arc<dyn BookmarkTreeProvider>,
}

impl RenameBookmarkTool {
    pub fn new(provider: Arc<dyn BookmarkTreeProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for RenameBookmarkTool {
    fn name(&self) -> &'static str {
        "rename_bookmark"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            tool_type: "function".into(),
            function: FunctionDefinition {
                name: self.name().into(),
                description: "Rename a bookmark or folder to the given title.".into(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "bookmarkId": {
                            "type": "string",
                            "description": "Id of the bookmark to rename"
                        },
                        "newTitle": {
                            "type": "string",
                            "description": "New title for the bookmark"
                        }
                    },
                    "required": ["bookmarkId", "newTitle"]
                }),
            },
        }
    }

    async fn execute(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let bookmark_id = required_str(args, "bookmarkId")?;
        let new_title = required_str(args, "newTitle")?;
        rename(self.provider.as_ref(), bookmark_id, new_title).await
    }
}

/// Rename one bookmark, shared with batch updates.
pub(crate) async fn rename(
    provider: &dyn BookmarkTreeProvider,
    bookmark_id: &str,
    new_title: &str,
) -> Result<Value, ToolError> {
    provider
        .rename(&NodeId::from(bookmark_id), new_title)
        .await?;
    Ok(json!({
        "success": true,
        "bookmarkId": bookmark_id,
        "newTitle": new_title,
    }))
}
