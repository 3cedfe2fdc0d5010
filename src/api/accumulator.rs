//! Assembly of fragmented tool calls from streaming deltas.
//!
//! A streamed turn delivers tool calls in pieces: ids and names may arrive
//! on any delta for a slot index, while argument text arrives as fragments
//! to concatenate. The accumulator merges all of it into complete records
//! and keeps the narrative content channel separate, so one turn can carry
//! both text and tool calls.

use crate::types::{FunctionCall, StreamChunk, ToolCall};

/// A tool call still being assembled from deltas.
///
/// Merge rules: `id` and `name` are seeded from the first non-empty value
/// seen for the slot and never overwritten afterwards; `arguments` grows by
/// appending every fragment in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PendingToolCall {
    id: String,
    name: String,
    arguments: String,
}

impl PendingToolCall {
    fn complete(self) -> ToolCall {
        ToolCall {
            id: self.id,
            call_type: "function".into(),
            function: FunctionCall {
                name: self.name,
                arguments: self.arguments,
            },
        }
    }
}

/// Accumulates one streamed assistant turn.
///
/// [`finish`](Self::finish) is only meaningful once the stream has fully
/// drained; argument text is not valid JSON until then.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    content: String,
    calls: Vec<PendingToolCall>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one decoded stream chunk. Returns true when the chunk carried
    /// a narrative content fragment, so callers know to re-render.
    pub fn ingest(&mut self, chunk: &StreamChunk) -> bool {
        let mut content_updated = false;
        for choice in &chunk.choices {
            if let Some(text) = &choice.delta.content {
                if !text.is_empty() {
                    self.content.push_str(text);
                    content_updated = true;
                }
            }

            for (position, delta) in choice.delta.tool_calls.iter().flatten().enumerate() {
                let index = delta.index.unwrap_or(position);
                if self.calls.len() <= index {
                    self.calls.resize(index + 1, PendingToolCall::default());
                }
                let slot = &mut self.calls[index];

                if slot.id.is_empty() {
                    if let Some(id) = delta.id.as_deref().filter(|id| !id.is_empty()) {
                        slot.id = id.to_string();
                    }
                }
                if let Some(function) = &delta.function {
                    if slot.name.is_empty() {
                        if let Some(name) = function.name.as_deref().filter(|n| !n.is_empty()) {
                            slot.name = name.to_string();
                        }
                    }
                    if let Some(fragment) = &function.arguments {
                        slot.arguments.push_str(fragment);
                    }
                }
            }
        }
        content_updated
    }

    /// Narrative content accumulated so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the turn contained any tool calls, distinguishing
    /// final-answer turns from tool-invoking turns.
    pub fn has_tool_calls(&self) -> bool {
        !self.calls.is_empty()
    }

    /// Consume the accumulator into the turn's content and completed
    /// tool-call records, in slot order.
    pub fn finish(self) -> (String, Vec<ToolCall>) {
        let calls = self
            .calls
            .into_iter()
            .map(PendingToolCall::complete)
            .collect();
        (self.content, calls)
    }
}
