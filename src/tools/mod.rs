//! Pluggable tool system for the organizing assistant.
//!
//! Tools are async trait objects the model can invoke during the agent
//! loop. Each tool provides its own OpenAI function definition and an async
//! execute method over the bookmark-tree provider.

pub mod batch_update;
pub mod delete_bookmark;
pub mod find_duplicates;
pub mod move_bookmark;
pub mod rename_bookmark;

use crate::error::ToolError;
use crate::tree::{BookmarkTreeProvider, NodeId};
use crate::types::ToolDefinition;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub use batch_update::BatchUpdateTool;
pub use delete_bookmark::DeleteBookmarkTool;
pub use find_duplicates::FindDuplicatesTool;
pub use move_bookmark::MoveBookmarkTool;
pub use rename_bookmark::RenameBookmarkTool;

// ---------------------------------------------------------------------------
// Tool arguments
// ---------------------------------------------------------------------------

/// Parsed tool arguments: a JSON object keyed by parameter name.
pub type ToolArgs = serde_json::Map<String, Value>;

/// Parse accumulated argument text into a [`ToolArgs`] map.
///
/// Parse failure yields an empty map rather than an error, so a tool always
/// receives a (possibly incomplete) object and can report which parameters
/// are missing in its own words.
pub fn parse_tool_args(arguments: &str) -> ToolArgs {
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            tracing::warn!(
                arguments,
                "tool arguments are not a JSON object; substituting empty arguments"
            );
            ToolArgs::new()
        }
    }
}

/// Extract a required non-empty string argument.
pub(crate) fn required_str<'a>(args: &'a ToolArgs, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ToolError::InvalidArguments(format!("missing required argument: {key}")))
}

// ---------------------------------------------------------------------------
// Tool trait
// ---------------------------------------------------------------------------

/// A tool that can be invoked by the model.
///
/// Implement this trait to add custom tools. Register instances with
/// [`ToolRegistry`] before creating the agent.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name matching what the model will call.
    fn name(&self) -> &'static str;

    /// OpenAI-format tool definition for inclusion in API requests.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool. Returns a JSON value to send back to the model.
    async fn execute(&self, args: &ToolArgs) -> Result<Value, ToolError>;
}

// ---------------------------------------------------------------------------
// Tool registry
// ---------------------------------------------------------------------------

/// Registry of available tools.
///
/// The agent sends all registered tool definitions to the API and
/// dispatches tool calls through this registry.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Build a registry with the full bookmark-organizing tool set.
    ///
    /// `new_path_root` optionally pins where folder paths created by move
    /// operations are rooted; None uses the provider's default root.
    pub fn bookmark_tools(
        provider: Arc<dyn BookmarkTreeProvider>,
        new_path_root: Option<NodeId>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(FindDuplicatesTool::new(provider.clone()));
        registry.register(MoveBookmarkTool::new(
            provider.clone(),
            new_path_root.clone(),
        ));
        registry.register(RenameBookmarkTool::new(provider.clone()));
        registry.register(DeleteBookmarkTool::new(provider.clone()));
        registry.register(BatchUpdateTool::new(provider, new_path_root));
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.push(Box::new(tool));
    }

    /// Get tool definitions for the API request.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Find a tool by name, parse its arguments, and execute it.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let args = parse_tool_args(arguments);
        tool.execute(&args).await
    }

    /// True if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
