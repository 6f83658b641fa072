//! Mock implementations of core traits for testing.
//!
//! Shared by the unit and integration tests of every crate in the workspace.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::{
    traits::{CompletionClient, ModelCatalog},
    types::{ChatCompletionRequest, ModelDescriptor},
    Error, Result,
};

// =============================================================================
// Mock Completion Client
// =============================================================================

/// Scripted outcome for one completion call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this completion text.
    Text(String),
    /// Fail as if the service were down.
    Unavailable(String),
    /// Fail as if the service answered with nothing usable.
    Malformed(String),
}

/// Scripted completion client that records every request it receives.
pub struct MockCompletionClient {
    replies: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl MockCompletionClient {
    /// Create a mock that plays `replies` in order, then repeats the last one.
    pub fn new(replies: Vec<MockReply>) -> Self {
        let fallback = replies
            .last()
            .cloned()
            .unwrap_or_else(|| MockReply::Text(String::new()));
        Self {
            replies: Mutex::new(replies.into()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same completion.
    pub fn constant(text: &str) -> Self {
        Self::new(vec![MockReply::Text(text.to_string())])
    }

    /// Create a mock whose upstream is always unreachable.
    pub fn unavailable(message: &str) -> Self {
        Self::new(vec![MockReply::Unavailable(message.to_string())])
    }

    /// Number of calls made to this mock.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<ChatCompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn create_chat_completion(&self, request: &ChatCompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Unavailable(msg) => Err(Error::upstream_unavailable(msg)),
            MockReply::Malformed(msg) => Err(Error::upstream_malformed(msg)),
        }
    }
}

// =============================================================================
// Mock Model Catalog
// =============================================================================

/// In-memory model catalog that counts how often it is queried.
pub struct MockCatalog {
    models: Vec<ModelDescriptor>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockCatalog {
    /// Create a catalog serving `models`.
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        Self {
            models,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a catalog whose every call fails.
    pub fn failing(message: &str) -> Self {
        Self {
            models: Vec::new(),
            failure: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `list_models` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelCatalog for MockCatalog {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(msg) => Err(Error::upstream_unavailable(msg.clone())),
            None => Ok(self.models.clone()),
        }
    }
}
