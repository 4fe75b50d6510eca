use async_trait::async_trait;

/// External optical-recognition collaborator. Takes a single rendered page
/// (PNG bytes) and returns the recognized text.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("ocr request timed out")]
    Timeout,
    #[error("ocr transport failure: {0}")]
    Transport(String),
    #[error("ocr could not recognize content: {0}")]
    Unrecognized(String),
}

impl OcrError {
    /// Transient failures are worth one retry per page; permanent ones are
    /// recorded as a page warning immediately.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Transport(_))
    }
}
