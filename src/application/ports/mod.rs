mod llm_client;
mod ocr_engine;
mod text_extractor;

pub use llm_client::{LlmClient, LlmClientError};
pub use ocr_engine::{OcrEngine, OcrError};
pub use text_extractor::{TextExtractor, ValidationError};
