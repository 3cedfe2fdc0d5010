//! Data model for the OpenAI Chat Completions API.
//!
//! These types serialize/deserialize directly to/from the JSON payloads
//! expected by any OpenAI-compatible endpoint, covering both the blocking
//! request/response pair and the incremental streaming delta shapes.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Message roles
// ---------------------------------------------------------------------------

/// Conversation participant role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction message.
    System,
    /// End-user message.
    User,
    /// Assistant/model message.
    Assistant,
    /// Tool execution result message.
    Tool,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A single message in the conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Author role for this conversation turn.
    pub role: Role,

    /// Text content. Null when the assistant message is purely tool calls.
    pub content: Option<String>,

    /// Tool calls requested by the assistant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// When role == Tool, the id of the tool_call this result corresponds to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a plain assistant text message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create an assistant message carrying tool calls and optional narrative text.
    pub fn assistant_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    /// Create a tool result message, sent back after executing a tool call.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tool calls (in assistant responses)
// ---------------------------------------------------------------------------

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCall {
    /// Unique id used to correlate tool call and tool result.
    pub id: String,
    /// Tool call type; currently expected to be `"function"`.
    #[serde(rename = "type")]
    pub call_type: String, // "function"
    /// Function metadata and arguments for this tool invocation.
    pub function: FunctionCall,
}

/// The function name and JSON-encoded arguments within a tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionCall {
    /// Function/tool name to execute.
    pub name: String,
    /// JSON-encoded string of the arguments object.
    ///
    /// During streaming this is assembled from fragments and is only valid
    /// once the turn's stream has fully drained.
    pub arguments: String,
}

// ---------------------------------------------------------------------------
// Tool definitions (sent in requests)
// ---------------------------------------------------------------------------

/// Tool definition included in the API request so the model knows what's available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool definition type; currently expected to be `"function"`.
    #[serde(rename = "type")]
    pub tool_type: String, // "function"
    /// Function schema published to the model.
    pub function: FunctionDefinition,
}

/// The schema of a callable function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Exposed function/tool name.
    pub name: String,
    /// Natural-language description of tool behavior.
    pub description: String,
    /// JSON Schema object describing the parameters.
    pub parameters: serde_json::Value,
}

/// Tool-choice directive controlling whether and which tool the model calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    /// Let the model decide whether to call any declared tool.
    Auto,
    /// Force a call to the named function.
    Function(String),
}

impl Serialize for ToolChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Function(name) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "function")?;
                map.serialize_entry("function", &serde_json::json!({ "name": name }))?;
                map.end()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Chat completion request / response
// ---------------------------------------------------------------------------

/// Request body for POST /chat/completions.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier used for request routing.
    pub model: String,
    /// Conversation history sent to the model.
    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Request an SSE token stream instead of a single JSON body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Response body from POST /chat/completions.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Provider response id.
    #[serde(default)]
    pub id: String,
    /// Ranked response choices.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// A single choice in the API response.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Choice index in the provider response.
    #[serde(default)]
    pub index: u32,
    /// Assistant message payload for this choice.
    pub message: Message,
    /// Provider stop reason (`stop`, `tool_calls`, etc.).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Streaming deltas
// ---------------------------------------------------------------------------

/// One decoded streaming event from an SSE `data:` frame.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

/// A single choice slot within a streaming event.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: Delta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Incremental assistant output carried by one streaming event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Delta {
    /// Narrative text fragment to append.
    #[serde(default)]
    pub content: Option<String>,
    /// Tool-call fragments to merge by index.
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

/// A fragment of one tool call, addressed by its slot index.
///
/// `id` and `name` may arrive empty on some deltas and be filled on a later
/// one; only `function.arguments` is guaranteed to be incremental.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub function: Option<FunctionCallDelta>,
}

/// Function name/arguments fragment within a tool-call delta.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionCallDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
