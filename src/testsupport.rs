//! Shared test fixtures: an in-memory bookmark tree, SSE body builders and
//! a scriptable chat transport.
//!
//! Keeping these here prevents each test module from rebuilding ad-hoc tree
//! and stream fixture code.

use crate::api::{ByteStream, ChatTransport};
use crate::error::{ApiError, TreeError};
use crate::tree::{BookmarkNode, BookmarkTreeProvider, CreateNode, NodeId};
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// In-memory bookmark tree
// ---------------------------------------------------------------------------

const TOP_ID: &str = "0";
const BAR_ID: &str = "1";

#[derive(Debug, Clone)]
struct StoredNode {
    id: String,
    parent: Option<String>,
    title: String,
    url: Option<String>,
    children: Vec<String>,
}

#[derive(Debug)]
struct TreeState {
    nodes: BTreeMap<String, StoredNode>,
    next_id: u64,
}

/// In-memory [`BookmarkTreeProvider`] mirroring a browser bookmark store:
/// an invisible top node whose children are the visible root folders.
#[derive(Debug)]
pub struct MemoryTree {
    inner: Mutex<TreeState>,
}

impl MemoryTree {
    /// A tree with a "Bookmarks Bar" and an "Other Bookmarks" root folder.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            TOP_ID.to_string(),
            StoredNode {
                id: TOP_ID.to_string(),
                parent: None,
                title: String::new(),
                url: None,
                children: vec![BAR_ID.to_string(), "2".to_string()],
            },
        );
        nodes.insert(
            BAR_ID.to_string(),
            StoredNode {
                id: BAR_ID.to_string(),
                parent: Some(TOP_ID.to_string()),
                title: "Bookmarks Bar".to_string(),
                url: None,
                children: Vec::new(),
            },
        );
        nodes.insert(
            "2".to_string(),
            StoredNode {
                id: "2".to_string(),
                parent: Some(TOP_ID.to_string()),
                title: "Other Bookmarks".to_string(),
                url: None,
                children: Vec::new(),
            },
        );
        Self {
            inner: Mutex::new(TreeState { nodes, next_id: 3 }),
        }
    }

    /// Id of the default root folder ("Bookmarks Bar").
    pub fn root_id(&self) -> NodeId {
        NodeId::new(BAR_ID)
    }

    /// Total number of nodes, including the invisible top node.
    pub fn node_count(&self) -> usize {
        self.inner.lock().expect("tree lock").nodes.len()
    }

    /// Insert a folder under `parent` and return its id.
    pub fn add_folder(&self, parent: &NodeId, title: &str) -> NodeId {
        self.insert(parent, title, None)
    }

    /// Insert a bookmark leaf under `parent` and return its id.
    pub fn add_bookmark(&self, parent: &NodeId, title: &str, url: &str) -> NodeId {
        self.insert(parent, title, Some(url.to_string()))
    }

    fn insert(&self, parent: &NodeId, title: &str, url: Option<String>) -> NodeId {
        let mut state = self.inner.lock().expect("tree lock");
        let id = state.next_id.to_string();
        state.next_id += 1;
        state.nodes.insert(
            id.clone(),
            StoredNode {
                id: id.clone(),
                parent: Some(parent.as_str().to_string()),
                title: title.to_string(),
                url,
                children: Vec::new(),
            },
        );
        state
            .nodes
            .get_mut(parent.as_str())
            .expect("parent exists")
            .children
            .push(id.clone());
        NodeId::new(id)
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

fn shallow_view(state: &TreeState, id: &str) -> Option<BookmarkNode> {
    let stored = state.nodes.get(id)?;
    Some(BookmarkNode {
        id: NodeId::new(stored.id.clone()),
        title: stored.title.clone(),
        url: stored.url.clone(),
        parent_id: stored.parent.clone().map(NodeId::new),
        children: None,
    })
}

fn deep_view(state: &TreeState, id: &str) -> Option<BookmarkNode> {
    let stored = state.nodes.get(id)?;
    let mut node = shallow_view(state, id)?;
    if stored.url.is_none() {
        let children = stored
            .children
            .iter()
            .filter_map(|child| deep_view(state, child))
            .collect();
        node.children = Some(children);
    }
    Some(node)
}

fn remove_subtree(state: &mut TreeState, id: &str) {
    let children = state
        .nodes
        .remove(id)
        .map(|node| node.children)
        .unwrap_or_default();
    for child in children {
        remove_subtree(state, &child);
    }
}

#[async_trait]
impl BookmarkTreeProvider for MemoryTree {
    async fn tree(&self) -> Result<Vec<BookmarkNode>, TreeError> {
        let state = self.inner.lock().expect("tree lock");
        Ok(deep_view(&state, TOP_ID).into_iter().collect())
    }

    async fn children(&self, id: &NodeId) -> Result<Vec<BookmarkNode>, TreeError> {
        let state = self.inner.lock().expect("tree lock");
        let stored = state
            .nodes
            .get(id.as_str())
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        Ok(stored
            .children
            .iter()
            .filter_map(|child| shallow_view(&state, child))
            .collect())
    }

    async fn node(&self, id: &NodeId) -> Result<BookmarkNode, TreeError> {
        let state = self.inner.lock().expect("tree lock");
        shallow_view(&state, id.as_str()).ok_or_else(|| TreeError::NodeNotFound(id.to_string()))
    }

    async fn create(&self, spec: CreateNode) -> Result<BookmarkNode, TreeError> {
        {
            let state = self.inner.lock().expect("tree lock");
            if !state.nodes.contains_key(spec.parent_id.as_str()) {
                return Err(TreeError::NodeNotFound(spec.parent_id.to_string()));
            }
        }
        let id = self.insert(&spec.parent_id, &spec.title, spec.url);
        self.node(&id).await
    }

    async fn move_node(
        &self,
        id: &NodeId,
        new_parent_id: &NodeId,
    ) -> Result<BookmarkNode, TreeError> {
        let mut state = self.inner.lock().expect("tree lock");
        if !state.nodes.contains_key(id.as_str()) {
            return Err(TreeError::NodeNotFound(id.to_string()));
        }
        if !state.nodes.contains_key(new_parent_id.as_str()) {
            return Err(TreeError::NodeNotFound(new_parent_id.to_string()));
        }

        let old_parent = state
            .nodes
            .get(id.as_str())
            .and_then(|node| node.parent.clone());
        if let Some(old_parent) = old_parent {
            if let Some(parent_node) = state.nodes.get_mut(&old_parent) {
                parent_node.children.retain(|child| child != id.as_str());
            }
        }
        state
            .nodes
            .get_mut(new_parent_id.as_str())
            .expect("checked above")
            .children
            .push(id.as_str().to_string());
        let node = state.nodes.get_mut(id.as_str()).expect("checked above");
        node.parent = Some(new_parent_id.as_str().to_string());

        shallow_view(&state, id.as_str()).ok_or_else(|| TreeError::NodeNotFound(id.to_string()))
    }

    async fn rename(&self, id: &NodeId, new_title: &str) -> Result<BookmarkNode, TreeError> {
        let mut state = self.inner.lock().expect("tree lock");
        let node = state
            .nodes
            .get_mut(id.as_str())
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        node.title = new_title.to_string();
        shallow_view(&state, id.as_str()).ok_or_else(|| TreeError::NodeNotFound(id.to_string()))
    }

    async fn remove(&self, id: &NodeId) -> Result<(), TreeError> {
        let mut state = self.inner.lock().expect("tree lock");
        if !state.nodes.contains_key(id.as_str()) {
            return Err(TreeError::NodeNotFound(id.to_string()));
        }
        let parent = state
            .nodes
            .get(id.as_str())
            .and_then(|node| node.parent.clone());
        if let Some(parent) = parent {
            if let Some(parent_node) = state.nodes.get_mut(&parent) {
                parent_node.children.retain(|child| child != id.as_str());
            }
        }
        remove_subtree(&mut state, id.as_str());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Stream fixtures
// ---------------------------------------------------------------------------

/// Build a [`ByteStream`] from UTF-8 chunks.
pub fn byte_stream(parts: &[&str]) -> ByteStream {
    let chunks: Vec<Result<Bytes, ApiError>> = parts
        .iter()
        .map(|part| Ok(Bytes::from(part.to_string())))
        .collect();
    Box::pin(futures_util::stream::iter(chunks))
}

/// Build a [`ByteStream`] from raw byte chunks, for mid-character splits.
pub fn raw_byte_stream(chunks: Vec<Vec<u8>>) -> ByteStream {
    let chunks: Vec<Result<Bytes, ApiError>> =
        chunks.into_iter().map(|chunk| Ok(Bytes::from(chunk))).collect();
    Box::pin(futures_util::stream::iter(chunks))
}

/// A stream that yields one good chunk and then a transport error.
pub fn failing_byte_stream(first: &str, error: &str) -> ByteStream {
    let items: Vec<Result<Bytes, ApiError>> = vec![
        Ok(Bytes::from(first.to_string())),
        Err(ApiError::InvalidResponse(error.to_string())),
    ];
    Box::pin(futures_util::stream::iter(items))
}

/// One SSE event block carrying a JSON payload.
pub fn sse_data_block(json: &str) -> String {
    format!("data: {json}\n\n")
}

/// SSE stream terminator block used by OpenAI-compatible streams.
pub fn sse_done_block() -> &'static str {
    "data: [DONE]\n\n"
}

// ---------------------------------------------------------------------------
// Scriptable transport
// ---------------------------------------------------------------------------

/// [`ChatTransport`] fed from queues, recording every request it sees.
#[derive(Default)]
pub struct MockTransport {
    chat_responses: Mutex<VecDeque<Result<ChatResponse, ApiError>>>,
    stream_bodies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<Value>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one blocking chat response.
    pub fn push_chat(&self, response: ChatResponse) {
        self.chat_responses
            .lock()
            .expect("queue lock")
            .push_back(Ok(response));
    }

    /// Queue one blocking chat failure.
    pub fn push_chat_error(&self, error: ApiError) {
        self.chat_responses
            .lock()
            .expect("queue lock")
            .push_back(Err(error));
    }

    /// Queue one raw SSE body for a streaming turn.
    pub fn push_stream(&self, body: impl Into<String>) {
        self.stream_bodies
            .lock()
            .expect("queue lock")
            .push_back(body.into());
    }

    /// Every request body observed, in order, as JSON values.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().expect("request lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("request lock").len()
    }

    fn record(&self, request: &ChatRequest) {
        let value = serde_json::to_value(request).expect("serialize request");
        self.requests.lock().expect("request lock").push(value);
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.record(request);
        self.chat_responses
            .lock()
            .expect("queue lock")
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::InvalidResponse("no mock response queued".into()))
            })
    }

    async fn chat_stream(&self, request: &ChatRequest) -> Result<ByteStream, ApiError> {
        self.record(request);
        let body = self
            .stream_bodies
            .lock()
            .expect("queue lock")
            .pop_front()
            .ok_or_else(|| ApiError::InvalidResponse("no mock stream queued".into()))?;
        Ok(byte_stream(&[body.as_str()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_tree_round_trips_basic_operations() {
        let tree = MemoryTree::new();
        let tech = tree.add_folder(&tree.root_id(), "Tech");
        let bm = tree.add_bookmark(&tech, "docs", "https://docs.rs");

        let children = tree.children(&tech).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, bm);

        tree.rename(&bm, "Rust docs").await.unwrap();
        assert_eq!(tree.node(&bm).await.unwrap().title, "Rust docs");

        tree.move_node(&bm, &tree.root_id()).await.unwrap();
        assert_eq!(
            tree.node(&bm).await.unwrap().parent_id,
            Some(tree.root_id())
        );

        tree.remove(&tech).await.unwrap();
        assert!(tree.node(&tech).await.is_err());
        // the moved bookmark survived its old parent's removal
        assert!(tree.node(&bm).await.is_ok());
    }

    #[tokio::test]
    async fn remove_deletes_descendants() {
        let tree = MemoryTree::new();
        let folder = tree.add_folder(&tree.root_id(), "Old");
        let child = tree.add_bookmark(&folder, "stale", "https://stale.dev");

        tree.remove(&folder).await.unwrap();
        assert!(tree.node(&child).await.is_err());
    }

    #[tokio::test]
    async fn mock_transport_records_requests_and_drains_queues() {
        let transport = MockTransport::new();
        transport.push_stream("data: [DONE]\n\n");

        let request = ChatRequest {
            model: "m".into(),
            messages: vec![crate::types::Message::user("hi")],
            tools: None,
            tool_choice: None,
            temperature: None,
            stream: Some(true),
        };
        transport.chat_stream(&request).await.unwrap();
        assert_eq!(transport.request_count(), 1);
        assert_eq!(transport.requests()[0]["model"], "m");

        // queue exhausted
        assert!(transport.chat_stream(&request).await.is_err());
    }
}
