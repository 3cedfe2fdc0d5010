//! Duplicate-scan tool.

use super::{Tool, ToolArgs};
use crate::duplicates::find_duplicates;
use crate::error::ToolError;
use crate::tree::BookmarkTreeProvider;
use crate::types::{FunctionDefinition, ToolDefinition};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Tool that scans the whole tree for bookmarks sharing a normalized URL.
pub struct FindDuplicatesTool {
    provider: Arc<dyn BookmarkTreeProvider>,
}

impl FindDuplicatesTool {
    pub fn new(provider: Arc<dyn BookmarkTreeProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for FindDuplicatesTool {
    fn name(&self) -> &'static str {
        "find_duplicate_bookmarks"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            tool_type: "function".into(),
            function: FunctionDefinition {
                name: self.name().into(),
                description: "Find bookmarks that point at the same URL (ignoring scheme, \
                              a leading www. and a trailing slash), grouped by URL with \
                              their ids, titles and folder paths."
                    .into(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {},
                    "additionalProperties": false
                }),
            },
        }
    }

    async fn execute(&self, _args: &ToolArgs) -> Result<Value, ToolError> {
        let groups = find_duplicates(self.provider.as_ref()).await?;
        serde_json::to_value(groups)
            .map_err(|e| ToolError::ExecutionFailed(format!("serializing duplicates: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::MemoryTree;

    #[tokio::test]
    async fn reports_groups_as_json() {
        let tree = Arc::new(MemoryTree::new());
        let root = tree.root_id();
        tree.add_bookmark(&root, "a", "https://example.com");
        tree.add_bookmark(&root, "b", "http://www.example.com/");

        let tool = FindDuplicatesTool::new(tree);
        let value = tool.execute(&ToolArgs::new()).await.unwrap();
        let groups = value.as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["url"], "example.com");
        assert_eq!(groups[0]["count"], 2);
    }

    #[tokio::test]
    async fn clean_tree_reports_empty_list() {
        let tree = Arc::new(MemoryTree::new());
        tree.add_bookmark(&tree.root_id(), "solo", "https://one.dev");
        let tool = FindDuplicatesTool::new(tree);
        let value = tool.execute(&ToolArgs::new()).await.unwrap();
        assert_eq!(value, serde_json::json!([]));
    }
}
