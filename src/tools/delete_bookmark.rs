//! Bookmark delete tool.

use super::{required_str, Tool, ToolArgs};
use crate::error::ToolError;
use crate::tree::{BookmarkTreeProvider, NodeId};
use crate::types::{FunctionDefinition, ToolDefinition};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Tool that deletes a bookmark.
pub struct DeleteBookmarkTool {
    provider: Arc<dyn BookmarkTreeProvider>,
}

impl DeleteBookmarkTool {
    pub fn new(provider: Arc<dyn BookmarkTreeProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for DeleteBookmarkTool {
    fn name(&self) -> &'static str {
        "delete_bookmark"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            tool_type: "function".into(),
            function: FunctionDefinition {
                name: self.name().into(),
                description: "Delete a bookmark by id.".into(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "bookmarkId": {
                            "type": "string",
                            "description": "Id of the bookmark to delete"
                        }
                    },
                    "required": ["bookmarkId"]
                }),
            },
        }
    }

    async fn execute(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let bookmark_id = required_str(args, "bookmarkId")?;
        delete(self.provider.as_ref(), bookmark_id).await
    }
}

/// Delete one bookmark, shared with batch updates. The title is captured
/// before removal so the model can confirm what was deleted.
pub(crate) async fn delete(
    provider: &dyn BookmarkTreeProvider,
    bookmark_id: &str,
) -> Result<Value, ToolError> {
    let id = NodeId::from(bookmark_id);
    let node = provider.node(&id).await?;
    provider.remove(&id).await?;
    Ok(json!({
        "success": true,
        "bookmarkId": bookmark_id,
        "title": node.title,
    }))
}
