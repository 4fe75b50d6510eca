use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;

use crate::application::ports::{OcrEngine, OcrError};

/// Scripted OCR engine for tests: returns queued responses in order and
/// counts calls. An exhausted script fails permanently.
pub struct MockOcrEngine {
    script: Mutex<VecDeque<Result<String, OcrError>>>,
    calls: AtomicUsize,
}

impl MockOcrEngine {
    pub fn new(responses: Vec<Result<String, OcrError>>) -> Self {
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
impl OcrEngine for MockOcrEngine {
    async fn recognize(&self, _image: &[u8]) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(OcrError::Unrecognized("mock script exhausted".to_string())))
    }
}
