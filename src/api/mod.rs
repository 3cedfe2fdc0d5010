//! HTTP client for OpenAI-compatible chat APIs.
//!
//! The API layer is split into cohesive modules:
//! - `client`: request dispatch, auth header, status/error mapping
//! - `sse`: incremental `data:` frame decoding for streamed responses
//! - `accumulator`: assembly of fragmented tool calls from stream deltas

pub mod accumulator;
mod client;
pub mod sse;

use crate::error::ApiError;
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;

pub use client::ApiClient;

/// Raw byte chunks of one streaming HTTP response body.
///
/// Chunk boundaries are arbitrary: a chunk may end mid-line or mid-token.
/// The stream is tied to one response and is exhausted exactly once.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ApiError>> + Send>>;

/// Minimal chat transport interface used by the agent loop and classifier.
///
/// This trait lets tests provide deterministic responses without network
/// calls while the production path uses [`ApiClient`].
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one blocking request and parse the JSON response body.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;

    /// Send one streaming request and return the raw SSE body.
    async fn chat_stream(&self, request: &ChatRequest) -> Result<ByteStream, ApiError>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for std::sync::Arc<T> {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        (**self).chat(request).await
    }

    async fn chat_stream(&self, request: &ChatRequest) -> Result<ByteStream, ApiError> {
        (**self).chat_stream(request).await
    }
}
