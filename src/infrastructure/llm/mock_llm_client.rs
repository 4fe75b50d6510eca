use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;

use crate::application::ports::{LlmClient, LlmClientError};

/// Scripted language model for tests: returns queued responses in order and
/// counts calls. An exhausted script fails the call.
pub struct MockLlmClient {
    script: Mutex<VecDeque<Result<String, LlmClientError>>>,
    calls: AtomicUsize,
}

impl MockLlmClient {
    pub fn new(responses: Vec<Result<String, LlmClientError>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().await.pop_front().unwrap_or_else(|| {
            Err(LlmClientError::ApiRequestFailed(
                "mock script exhausted".to_string(),
            ))
        })
    }
}
