mod mistral_ocr_client;
mod mock_ocr_engine;

pub use mistral_ocr_client::MistralOcrClient;
pub use mock_ocr_engine::MockOcrEngine;
