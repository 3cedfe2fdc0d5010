//! Unified error types for the bookmark agent core.

use std::fmt;

// ---------------------------------------------------------------------------
// ToolError
// ---------------------------------------------------------------------------

/// Errors arising from tool execution.
#[derive(Debug)]
pub enum ToolError {
    /// The model supplied arguments the tool couldn't use.
    InvalidArguments(String),
    /// The tool ran but encountered a failure.
    ExecutionFailed(String),
    /// The model named a tool absent from the registry.
    UnknownTool(String),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArguments(msg) => write!(f, "invalid arguments: {msg}"),
            Self::ExecutionFailed(msg) => write!(f, "execution failed: {msg}"),
            Self::UnknownTool(name) => write!(f, "unknown tool: {name}"),
        }
    }
}

impl std::error::Error for ToolError {}

// ---------------------------------------------------------------------------
// TreeError
// ---------------------------------------------------------------------------

/// Errors from the bookmark-tree provider and path resolution.
#[derive(Debug)]
pub enum TreeError {
    /// The referenced node id does not exist in the tree.
    NodeNotFound(String),
    /// A folder path normalized down to zero segments.
    InvalidPath(String),
    /// Any other failure reported by the tree backend.
    Backend(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "bookmark node not found: {id}"),
            Self::InvalidPath(path) => write!(f, "invalid folder path: {path:?}"),
            Self::Backend(msg) => write!(f, "bookmark tree: {msg}"),
        }
    }
}

impl std::error::Error for TreeError {}

impl From<TreeError> for ToolError {
    fn from(e: TreeError) -> Self {
        Self::ExecutionFailed(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the HTTP API layer.
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the API.
    Status(u16, String),
    /// The backend returned a structured `{error:{message}}` payload.
    Backend(String),
    /// The response body didn't match the expected wire shape.
    InvalidResponse(String),
    /// A forced tool call was absent or mismatched in the response.
    MissingToolCall,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::Backend(msg) => write!(f, "api error: {msg}"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
            Self::MissingToolCall => write!(f, "response contains no matching tool call"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// AgentError — top-level
// ---------------------------------------------------------------------------

/// Top-level error type for the agent loop.
///
/// Per-tool failures never surface here; they are folded back into the
/// conversation as tool-response content so the model can react. Only
/// transport-level failures and the turn ceiling abort a run.
#[derive(Debug)]
pub enum AgentError {
    Api(ApiError),
    /// The agent loop exceeded the configured turn cap.
    MaxTurnsExceeded,
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "api: {e}"),
            Self::MaxTurnsExceeded => write!(f, "max agent turns reached"),
        }
    }
}

impl std::error::Error for AgentError {}

impl From<ApiError> for AgentError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}
