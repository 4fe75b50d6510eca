mod pdf_rasterizer;
mod pdf_text;
mod text_extractor;
mod text_sanitizer;

pub use text_extractor::DocumentTextExtractor;
pub use text_sanitizer::sanitize_extracted_text;

/// In-process PDF handling failures. These never cross the pipeline
/// boundary; they are folded into extraction warnings.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("pdf parsing failed: {0}")]
    Parse(String),
    #[error("pdf rendering failed: {0}")]
    Render(String),
}
