use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::application::services::FallbackClassifier;
use crate::config::LlmSettings;
use crate::domain::{
    ClassificationMethod, ClassificationOutcome, ClassificationResult, DocumentTypeCatalog,
};

/// Internal failures of the model path. Never surfaced: every variant is
/// absorbed by degrading to the fallback classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("model call failed: {0}")]
    Call(#[from] LlmClientError),
    #[error("malformed model answer: {0}")]
    MalformedAnswer(String),
    #[error("model returned a type outside the catalog: {0}")]
    UnknownType(String),
}

/// Structured record expected from the model: exactly type, category and a
/// numeric confidence.
#[derive(Debug, Deserialize)]
pub struct ModelAnswer {
    #[serde(rename = "type", alias = "document_type")]
    pub document_type: String,
    /// Accepted from the model but never trusted; the catalog pairing wins.
    pub category: String,
    pub confidence: f32,
}

/// Classifies extracted text through the external language model, degrading
/// to the keyword fallback on any internal failure.
pub struct LlmClassifier {
    client: Arc<dyn LlmClient>,
    catalog: Arc<DocumentTypeCatalog>,
    fallback: FallbackClassifier,
    timeout: Duration,
    max_input_chars: usize,
    min_classifiable_chars: usize,
}

impl LlmClassifier {
    pub fn new(
        client: Arc<dyn LlmClient>,
        catalog: Arc<DocumentTypeCatalog>,
        fallback: FallbackClassifier,
        settings: &LlmSettings,
        min_classifiable_chars: usize,
    ) -> Self {
        Self {
            client,
            catalog,
            fallback,
            timeout: Duration::from_secs(settings.timeout_secs),
            max_input_chars: settings.max_input_chars,
            min_classifiable_chars,
        }
    }

    /// Never fails outward: either the model path succeeds, or the result is
    /// a degraded fallback classification.
    #[tracing::instrument(skip(self, text), fields(text_chars = text.chars().count()))]
    pub async fn classify(&self, text: &str) -> ClassificationOutcome {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.min_classifiable_chars {
            tracing::info!("text below classifiable threshold, skipping model call");
            return ClassificationOutcome::Degraded(self.fallback.classify(text));
        }

        match self.classify_with_model(trimmed).await {
            Ok(result) => {
                tracing::info!(
                    document_type = %result.document_type,
                    confidence = result.confidence,
                    "model classification succeeded"
                );
                ClassificationOutcome::Succeeded(result)
            }
            Err(err) => {
                tracing::warn!(error = %err, "model classification failed, using fallback");
                ClassificationOutcome::Degraded(self.fallback.classify(text))
            }
        }
    }

    async fn classify_with_model(
        &self,
        text: &str,
    ) -> Result<ClassificationResult, ClassificationError> {
        let prompt = self.build_prompt(text, false);
        let raw = self.complete_with_timeout(&prompt).await?;

        let answer = match parse_model_answer(&raw) {
            Ok(answer) => self.accept(answer, raw)?,
            Err(parse_err) => {
                // One retry with a stricter reformulation, then give up.
                tracing::warn!(error = %parse_err, "unparseable model answer, retrying once");
                let retry_prompt = self.build_prompt(text, true);
                let raw = self.complete_with_timeout(&retry_prompt).await?;
                let answer = parse_model_answer(&raw)?;
                self.accept(answer, raw)?
            }
        };

        Ok(answer)
    }

    /// Validate the model's type against the catalog (case-sensitive exact
    /// match); the category always comes from the catalog pairing, not from
    /// the model.
    fn accept(
        &self,
        answer: ModelAnswer,
        raw: String,
    ) -> Result<ClassificationResult, ClassificationError> {
        let category = self
            .catalog
            .category_of(&answer.document_type)
            .ok_or_else(|| ClassificationError::UnknownType(answer.document_type.clone()))?
            .to_string();

        Ok(ClassificationResult {
            document_type: answer.document_type,
            category,
            confidence: answer.confidence.clamp(0.0, 1.0),
            method: ClassificationMethod::Llm,
            raw_model_output: Some(raw),
        })
    }

    async fn complete_with_timeout(&self, prompt: &str) -> Result<String, ClassificationError> {
        tokio::time::timeout(self.timeout, self.client.complete(prompt))
            .await
            .map_err(|_| ClassificationError::Call(LlmClientError::Timeout))?
            .map_err(ClassificationError::Call)
    }

    fn build_prompt(&self, text: &str, strict: bool) -> String {
        let truncated = truncate_chars(text, self.max_input_chars);

        let mut types_listing = String::new();
        for (category, types) in self.catalog.grouped_by_category() {
            types_listing.push_str(&format!("## {category}\n"));
            for type_name in types {
                types_listing.push_str(&format!("- {type_name}\n"));
            }
        }

        let mut prompt = format!(
            "Analyse le texte suivant, extrait d'un document administratif ou financier \
             français, et identifie LE TYPE EXACT de document parmi la liste fournie.\n\
             \n\
             Texte à analyser:\n{truncated}\n\
             \n\
             Types de documents disponibles, groupés par catégorie \
             (CHOISIR OBLIGATOIREMENT DANS CETTE LISTE, en recopiant le nom à l'identique):\n\
             {types_listing}\n\
             Réponds par un objet JSON avec exactement trois champs:\n\
             {{\"type\": \"<nom exact du type>\", \"category\": \"<catégorie>\", \
             \"confidence\": <nombre entre 0.0 et 1.0>}}"
        );

        if strict {
            prompt.push_str(
                "\n\nIMPORTANT: ta réponse précédente n'était pas exploitable. Réponds \
                 UNIQUEMENT avec l'objet JSON demandé, sans texte avant ou après, sans \
                 bloc de code, et avec une valeur numérique pour \"confidence\".",
            );
        }

        prompt
    }
}

/// Parse the model's free-text answer into a [`ModelAnswer`]. The answer is
/// expected to contain a JSON object; surrounding prose or code fences are
/// tolerated by extracting the outermost braces. Any shape mismatch is a
/// single `MalformedAnswer`.
pub fn parse_model_answer(raw: &str) -> Result<ModelAnswer, ClassificationError> {
    let start = raw
        .find('{')
        .ok_or_else(|| ClassificationError::MalformedAnswer("no json object found".to_string()))?;
    let end = raw
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| ClassificationError::MalformedAnswer("no json object found".to_string()))?;

    serde_json::from_str(&raw[start..=end])
        .map_err(|e| ClassificationError::MalformedAnswer(e.to_string()))
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
