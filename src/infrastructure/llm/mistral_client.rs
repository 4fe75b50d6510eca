use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::config::LlmSettings;

const SYSTEM_PROMPT: &str = "Tu es un expert en classification de documents administratifs et \
financiers français. Analyse attentivement le texte fourni et identifie LE TYPE EXACT parmi la \
liste fournie. Tu dois OBLIGATOIREMENT choisir un type de document dans la liste exacte fournie; \
ne propose jamais un type qui n'est pas dans cette liste. Sois précis et cohérent dans ta \
classification et fournis un score de confiance réaliste (0.0 à 1.0).";

/// Mistral chat-completions adapter for the classification prompt.
pub struct MistralClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl MistralClient {
    pub fn new(settings: &LlmSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl LlmClient for MistralClient {
    #[tracing::instrument(skip(self, prompt), fields(prompt_chars = prompt.chars().count()))]
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "response_format": { "type": "json_object" }
        });

        let url = format!("{}/v1/chat/completions", self.base_url);

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
                    LlmClientError::Timeout
                } else {
                    LlmClientError::ApiRequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "llm returned {status}: {text}"
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(format!("json parse failed: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("empty completion".to_string()))
    }
}
