//! Single-shot page classification ("file this page").
//!
//! One non-streaming request with a forced tool call: the model must answer
//! through the classification function, which pins the response to a JSON
//! object we can parse deterministically. Two request shapes exist: one
//! constrains the folder path to the existing set with a schema `enum`, the
//! other leaves the path free and instead lists existing paths in the user
//! payload so the model prefers reusing one.

use crate::api::{ApiClient, ChatTransport};
use crate::config::Config;
use crate::error::ApiError;
use crate::prompt::{
    render_existing_paths, CLASSIFY_FUNCTION, CLASSIFY_FUNCTION_DESCRIPTION,
    CLASSIFY_SYSTEM_PROMPT, CLASSIFY_USER_PROMPT, FOLDER_PATH_DESCRIPTION, FOLDER_PATH_PARAM,
    TITLE_DESCRIPTION, TITLE_PARAM,
};
use crate::types::{
    ChatRequest, ChatResponse, FunctionDefinition, Message, ToolChoice, ToolDefinition,
};
use serde_json::{json, Value};
use std::time::Duration;

/// The classifier's verdict for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Suggested folder path, `/`-separated.
    pub path: String,
    /// Suggested bookmark title, when requested.
    pub title: Option<String>,
}

/// Inputs for one classification call.
#[derive(Debug, Clone)]
pub struct ClassifyRequest {
    title: String,
    page_content: String,
    existing_paths: Vec<String>,
    constrain_to_existing: bool,
    want_title: bool,
}

impl ClassifyRequest {
    /// Constrain the suggested path to the existing folder set via a schema
    /// `enum`; the model cannot invent new paths.
    pub fn with_enum_constraint(
        title: impl Into<String>,
        page_content: impl Into<String>,
        existing_paths: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            page_content: page_content.into(),
            existing_paths,
            constrain_to_existing: true,
            want_title: false,
        }
    }

    /// Leave the path unconstrained; existing paths are enumerated in the
    /// user payload so the model can prefer reusing one.
    pub fn with_freeform_path(
        title: impl Into<String>,
        page_content: impl Into<String>,
        existing_paths: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            page_content: page_content.into(),
            existing_paths,
            constrain_to_existing: false,
            want_title: false,
        }
    }

    /// Also ask the model for a cleaned-up bookmark title.
    pub fn want_title(mut self, want: bool) -> Self {
        self.want_title = want;
        self
    }
}

/// Non-streaming classification client.
pub struct Classifier {
    client: Box<dyn ChatTransport>,
    config: Config,
}

impl Classifier {
    /// Create a classifier from configuration.
    pub fn new(config: Config) -> Self {
        let client = Box::new(ApiClient::new(
            &config.api,
            Duration::from_secs(config.network.api_timeout_secs),
        ));
        Self::with_client(config, client)
    }

    /// Create a classifier with an explicit transport implementation.
    pub fn with_client(config: Config, client: Box<dyn ChatTransport>) -> Self {
        Self { client, config }
    }

    /// Classify one page into a folder path (and optionally a title).
    ///
    /// The two failure modes of a well-formed backend are
    /// [`ApiError::Backend`] (structured error payload) and
    /// [`ApiError::MissingToolCall`] (no usable forced call in the
    /// response); any other response shape also maps to the latter.
    pub async fn classify(&self, request: &ClassifyRequest) -> Result<Classification, ApiError> {
        let chat_request = build_chat_request(&self.config, request);
        let response = self.client.chat(&chat_request).await?;
        parse_classification(&response, request.want_title)
    }

    /// Classify one page using the configured `allow_new_path` and
    /// `want_title` flags to pick the request shape.
    pub async fn classify_page(
        &self,
        title: &str,
        page_content: &str,
        existing_paths: Vec<String>,
    ) -> Result<Classification, ApiError> {
        let request = if self.config.agent.allow_new_path {
            ClassifyRequest::with_freeform_path(title, page_content, existing_paths)
        } else {
            ClassifyRequest::with_enum_constraint(title, page_content, existing_paths)
        }
        .want_title(self.config.agent.want_title);
        self.classify(&request).await
    }
}

fn build_chat_request(config: &Config, request: &ClassifyRequest) -> ChatRequest {
    let mut user_content = format!("{CLASSIFY_USER_PROMPT} {}", request.title);
    if !request.page_content.is_empty() {
        user_content.push_str("\n\nPage content: ");
        user_content.push_str(&request.page_content);
    }
    if !request.constrain_to_existing {
        let paths_block = render_existing_paths(&request.existing_paths);
        if !paths_block.is_empty() {
            user_content.push_str("\n\n");
            user_content.push_str(&paths_block);
        }
    }

    let mut folder_schema = json!({
        "description": FOLDER_PATH_DESCRIPTION,
        "type": "string",
    });
    if request.constrain_to_existing {
        folder_schema["enum"] = json!(request.existing_paths);
    }
    let mut properties = json!({ FOLDER_PATH_PARAM: folder_schema });
    if request.want_title {
        properties[TITLE_PARAM] = json!({
            "description": TITLE_DESCRIPTION,
            "type": "string",
        });
    }

    ChatRequest {
        model: config.api.model.clone(),
        messages: vec![
            Message::system(CLASSIFY_SYSTEM_PROMPT),
            Message::user(user_content),
        ],
        tools: Some(vec![ToolDefinition {
            tool_type: "function".into(),
            function: FunctionDefinition {
                name: CLASSIFY_FUNCTION.into(),
                description: CLASSIFY_FUNCTION_DESCRIPTION.into(),
                parameters: json!({
                    "type": "object",
                    "properties": properties,
                    "required": [FOLDER_PATH_PARAM]
                }),
            },
        }]),
        tool_choice: Some(ToolChoice::Function(CLASSIFY_FUNCTION.into())),
        temperature: config.agent.temperature,
        stream: None,
    }
}

fn parse_classification(
    response: &ChatResponse,
    want_title: bool,
) -> Result<Classification, ApiError> {
    let call = response
        .choices
        .first()
        .and_then(|choice| choice.message.tool_calls.as_ref())
        .and_then(|calls| calls.first())
        .ok_or(ApiError::MissingToolCall)?;
    if call.function.name != CLASSIFY_FUNCTION {
        return Err(ApiError::MissingToolCall);
    }

    let args: Value =
        serde_json::from_str(&call.function.arguments).map_err(|_| ApiError::MissingToolCall)?;
    let path = args
        .get(FOLDER_PATH_PARAM)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .ok_or(ApiError::MissingToolCall)?
        .to_string();

    let title = want_title
        .then(|| {
            args.get(TITLE_PARAM)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map(str::to_string)
        })
        .flatten();

    Ok(Classification { path, title })
}
