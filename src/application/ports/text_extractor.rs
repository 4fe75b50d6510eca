use async_trait::async_trait;

use crate::domain::{Document, ExtractionResult};

/// Turns raw file bytes into extracted text, choosing between direct text
/// extraction and optical recognition.
///
/// Per-page failures are folded into the result as warnings; only input
/// validation fails the call.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<ExtractionResult, ValidationError>;
}

/// The only error that crosses the pipeline boundary: bad input, rejected
/// before any processing begins.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("file exceeds size limit: {size_bytes} > {limit_bytes} bytes")]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },
    #[error("empty file")]
    EmptyFile,
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
}
