//! Batch bookmark edit tool.
//!
//! Operations run strictly in order and failures are isolated: a bad
//! operation is recorded and the remaining ones still run, so one stale id
//! can't abort a large cleanup.

use super::{delete_bookmark, move_bookmark, rename_bookmark, Tool, ToolArgs};
use crate::error::ToolError;
use crate::tree::{BookmarkTreeProvider, NodeId};
use crate::types::{FunctionDefinition, ToolDefinition};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Tool that applies a sequence of move/rename/delete operations.
pub struct BatchUpdateTool {
    provider: Arc<dyn BookmarkTreeProvider>,
    new_path_root: Option<NodeId>,
}

impl BatchUpdateTool {
    pub fn new(provider: Arc<dyn BookmarkTreeProvider>, new_path_root: Option<NodeId>) -> Self {
        Self {
            provider,
            new_path_root,
        }
    }
}

/// One entry of the `operations` argument.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchOperation {
    action: String,
    bookmark_id: String,
    #[serde(default)]
    args: OperationArgs,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationArgs {
    #[serde(default)]
    folder_path: Option<String>,
    #[serde(default)]
    new_title: Option<String>,
}

#[async_trait]
impl Tool for BatchUpdateTool {
    fn name(&self) -> &'static str {
        "batch_update_bookmarks"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            tool_type: "function".into(),
            function: FunctionDefinition {
                name: self.name().into(),
                description: "Apply several bookmark operations in one call. Each operation \
                              is one of move, rename or delete; operations run in order and \
                              a failed operation does not stop the rest."
                    .into(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "operations": {
                            "type": "array",
                            "description": "Operations to apply, in order",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "action": {
                                        "type": "string",
                                        "enum": ["move", "rename", "delete"]
                                    },
                                    "bookmarkId": { "type": "string" },
                                    "args": {
                                        "type": "object",
                                        "properties": {
                                            "folderPath": {
                                                "type": "string",
                                                "description": "Target folder path for move"
                                            },
                                            "newTitle": {
                                                "type": "string",
                                                "description": "New title for rename"
                                            }
                                        }
                                    }
                                },
                                "required": ["action", "bookmarkId"]
                            }
                        }
                    },
                    "required": ["operations"]
                }),
            },
        }
    }

    async fn execute(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let operations = args
            .get("operations")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ToolError::InvalidArguments("missing required argument: operations".into())
            })?;

        let total = operations.len();
        let mut completed = 0usize;
        let mut failed = 0usize;
        let mut details = Vec::with_capacity(total);

        for raw in operations {
            match self.apply(raw).await {
                Ok(result) => {
                    completed += 1;
                    details.push(json!({
                        "success": true,
                        "operation": raw,
                        "result": result,
                    }));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "batch operation failed");
                    failed += 1;
                    details.push(json!({
                        "success": false,
                        "operation": raw,
                        "error": err.to_string(),
                    }));
                }
            }
        }

        Ok(json!({
            "success": failed == 0,
            "total": total,
            "completed": completed,
            "failed": failed,
            "details": details,
        }))
    }
}

impl BatchUpdateTool {
    async fn apply(&self, raw: &Value) -> Result<Value, ToolError> {
        let op: BatchOperation = serde_json::from_value(raw.clone())
            .map_err(|e| ToolError::InvalidArguments(format!("malformed operation: {e}")))?;

        match op.action.as_str() {
            "move" => {
                let folder_path = op.args.folder_path.as_deref().ok_or_else(|| {
                    ToolError::InvalidArguments("move requires args.folderPath".into())
                })?;
                move_bookmark::move_to_path(
                    self.provider.as_ref(),
                    self.new_path_root.as_ref(),
                    &op.bookmark_id,
                    folder_path,
                )
                .await
            }
            "rename" => {
                let new_title = op.args.new_title.as_deref().ok_or_else(|| {
                    ToolError::InvalidArguments("rename requires args.newTitle".into())
                })?;
                rename_bookmark::rename(self.provider.as_ref(), &op.bookmark_id, new_title).await
            }
            "delete" => delete_bookmark::delete(self.provider.as_ref(), &op.bookmark_id).await,
            other => Err(ToolError::InvalidArguments(format!(
                "unknown action: {other}"
            ))),
        }
    }
}
