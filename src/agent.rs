//! Core agent loop for the organizing assistant.
//!
//! The [`Agent`] drives the conversation: it streams each model turn,
//! assembles fragmented tool calls, executes tools through the registry and
//! re-submits results, looping until the model produces a turn with no tool
//! calls (or the turn cap is reached).

use crate::api::accumulator::ToolCallAccumulator;
use crate::api::sse::SseFrameDecoder;
use crate::api::{ApiClient, ChatTransport};
use crate::config::Config;
use crate::error::AgentError;
use crate::prompt::ORGANIZER_SYSTEM_PROMPT;
use crate::tools::ToolRegistry;
use crate::types::{ChatRequest, Message, StreamChunk, ToolChoice};
use serde_json::json;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

const CANCELLED_BY_USER_RESPONSE: &str = "operation cancelled by user";

/// Progress events emitted while a turn is running.
///
/// Events are a message-passing channel rather than a callback so a UI can
/// consume them at its own pace, decoupled from the loop's stepping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// The assistant's narrative text accumulated so far. Emitted after
    /// every content fragment; consumers must tolerate repeated values.
    Content { text: String },
    /// A tool invocation is starting.
    ToolStarted { name: String },
    /// A tool invocation finished successfully.
    ToolFinished { name: String },
    /// A tool invocation failed; the error was folded into the transcript.
    ToolFailed { name: String, error: String },
}

/// The core agent orchestrating the conversation and tool-use loop.
///
/// Single-threaded and cooperative: one request is in flight at a time, and
/// tool calls within a turn execute strictly in emission order because later
/// calls may depend on earlier ones' side effects.
pub struct Agent {
    client: Box<dyn ChatTransport>,
    config: Config,
    tools: ToolRegistry,
    messages: Vec<Message>,
    event_sink: Option<mpsc::UnboundedSender<AgentEvent>>,
    cancellation_rx: Option<watch::Receiver<bool>>,
}

impl Agent {
    /// Create an agent from configuration with tools pre-registered.
    pub fn new(config: Config, tools: ToolRegistry) -> Self {
        let client = Box::new(ApiClient::new(
            &config.api,
            Duration::from_secs(config.network.api_timeout_secs),
        ));
        Self::with_client(config, tools, client)
    }

    /// Create an agent with an explicit transport implementation.
    ///
    /// Used for deterministic testing and alternative backends.
    pub fn with_client(config: Config, tools: ToolRegistry, client: Box<dyn ChatTransport>) -> Self {
        let messages = initial_messages(&config);
        Self {
            client,
            config,
            tools,
            messages,
            event_sink: None,
            cancellation_rx: None,
        }
    }

    /// Route progress events to a channel the caller consumes.
    pub fn set_event_sink(&mut self, sink: Option<mpsc::UnboundedSender<AgentEvent>>) {
        self.event_sink = sink;
    }

    /// Register a cancellation signal checked before each model request.
    pub fn set_cancellation_receiver(&mut self, rx: Option<watch::Receiver<bool>>) {
        self.cancellation_rx = rx;
    }

    /// Access the conversation transcript.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn cancellation_requested(&self) -> bool {
        self.cancellation_rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    fn emit(&self, event: AgentEvent) {
        if let Some(sink) = &self.event_sink {
            let _ = sink.send(event);
        }
    }

    /// Send a user message and run the full agent loop.
    ///
    /// Returns the model's final text response. Transport failures abort the
    /// run; failures inside a single tool invocation are converted into
    /// tool-response content so the model can react and the loop continues.
    pub async fn send(&mut self, user_input: &str) -> Result<String, AgentError> {
        self.messages.push(Message::user(user_input));

        let mut turns = 0usize;
        loop {
            turns += 1;
            if turns > self.config.agent.max_turns {
                return Err(AgentError::MaxTurnsExceeded);
            }
            if self.cancellation_requested() {
                return Ok(CANCELLED_BY_USER_RESPONSE.to_string());
            }

            let tool_defs = if self.tools.is_empty() {
                None
            } else {
                Some(self.tools.definitions())
            };
            let tool_choice = tool_defs.as_ref().map(|_| ToolChoice::Auto);
            let request = ChatRequest {
                model: self.config.api.model.clone(),
                messages: self.messages.clone(),
                tools: tool_defs,
                tool_choice,
                temperature: self.config.agent.temperature,
                stream: Some(true),
            };

            let stream = self.client.chat_stream(&request).await?;
            let mut decoder = SseFrameDecoder::new(stream);
            let mut accumulator = ToolCallAccumulator::new();
            while let Some(event) = decoder.next_event().await? {
                let chunk: StreamChunk = match serde_json::from_value(event) {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        tracing::warn!(error = %err, "dropping stream event with unexpected shape");
                        continue;
                    }
                };
                if accumulator.ingest(&chunk) {
                    self.emit(AgentEvent::Content {
                        text: accumulator.content().to_string(),
                    });
                }
            }

            let has_tool_calls = accumulator.has_tool_calls();
            let (content, tool_calls) = accumulator.finish();

            if !has_tool_calls {
                // Final text turn; the only terminal state.
                self.messages.push(Message::assistant(content.clone()));
                return Ok(content);
            }

            let narrative = (!content.is_empty()).then(|| content.clone());
            self.messages
                .push(Message::assistant_tool_calls(narrative, tool_calls.clone()));

            for call in &tool_calls {
                self.emit(AgentEvent::ToolStarted {
                    name: call.function.name.clone(),
                });
                let result = match self
                    .tools
                    .execute(&call.function.name, &call.function.arguments)
                    .await
                {
                    Ok(value) => {
                        self.emit(AgentEvent::ToolFinished {
                            name: call.function.name.clone(),
                        });
                        value
                    }
                    Err(err) => {
                        tracing::warn!(
                            tool = call.function.name.as_str(),
                            error = %err,
                            "tool invocation failed"
                        );
                        self.emit(AgentEvent::ToolFailed {
                            name: call.function.name.clone(),
                            error: err.to_string(),
                        });
                        json!({ "error": err.to_string() })
                    }
                };
                self.messages
                    .push(Message::tool_result(&call.id, result.to_string()));
            }
            // Loop back — re-submit with tool results.
        }
    }
}

fn initial_messages(config: &Config) -> Vec<Message> {
    let prompt = if config.agent.system_prompt.trim().is_empty() {
        ORGANIZER_SYSTEM_PROMPT
    } else {
        config.agent.system_prompt.as_str()
    };
    vec![Message::system(prompt)]
}
