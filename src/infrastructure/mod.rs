pub mod extraction;
pub mod llm;
pub mod observability;
pub mod ocr;
