use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{OcrEngine, OcrError};
use crate::config::OcrSettings;

/// Mistral OCR adapter: posts a single rendered page as a base64 data URI
/// and returns the recognized text in page order.
pub struct MistralOcrClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl MistralOcrClient {
    pub fn new(settings: &OcrSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        }
    }
}

#[derive(Deserialize)]
struct OcrResponse {
    pages: Vec<OcrPage>,
}

#[derive(Deserialize)]
struct OcrPage {
    markdown: Option<String>,
    text: Option<String>,
}

#[async_trait]
impl OcrEngine for MistralOcrClient {
    #[tracing::instrument(skip(self, image), fields(image_bytes = image.len()))]
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let b64 = general_purpose::STANDARD.encode(image);
        let data_uri = format!("data:image/png;base64,{b64}");

        let body = serde_json::json!({
            "model": self.model,
            "document": {
                "type": "image_url",
                "image_url": data_uri
            }
        });

        let url = format!("{}/v1/ocr", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OcrError::Timeout
                } else {
                    OcrError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // Server-side and rate-limit failures are transient; anything
            // else means this page will never be recognized.
            return if status.is_server_error() || status.as_u16() == 429 {
                Err(OcrError::Transport(format!("ocr returned {status}: {text}")))
            } else {
                Err(OcrError::Unrecognized(format!(
                    "ocr returned {status}: {text}"
                )))
            };
        }

        let parsed: OcrResponse = response
            .json()
            .await
            .map_err(|e| OcrError::Unrecognized(format!("ocr response parse failed: {e}")))?;

        let page_texts: Vec<String> = parsed
            .pages
            .into_iter()
            .filter_map(|p| p.markdown.or(p.text))
            .filter(|t| !t.trim().is_empty())
            .collect();

        Ok(page_texts.join("\n"))
    }
}
