use std::sync::Arc;

use crate::application::ports::{TextExtractor, ValidationError};
use crate::application::services::{LlmClassifier, ResultValidator};
use crate::domain::{ClassificationOutcome, Document, ExtractionResult, FileFormat};

/// Everything the caller gets back from one pipeline invocation. Both result
/// values are created once and immutable thereafter; the caller owns them.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub document: Document,
    pub extraction: ExtractionResult,
    pub outcome: ClassificationOutcome,
}

/// The extraction-and-classification pipeline:
/// bytes -> text -> classification -> validated result.
///
/// Holds no cross-invocation state beyond the read-only catalog inside its
/// components, so invocations may run concurrently without locking. Only
/// [`ValidationError`] escapes; every other failure mode terminates in a
/// valid (possibly `Unknown`, possibly degraded) classification.
pub struct ClassificationPipeline {
    extractor: Arc<dyn TextExtractor>,
    classifier: LlmClassifier,
    validator: ResultValidator,
}

impl ClassificationPipeline {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        classifier: LlmClassifier,
        validator: ResultValidator,
    ) -> Self {
        Self {
            extractor,
            classifier,
            validator,
        }
    }

    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn process(
        &self,
        data: &[u8],
        filename: &str,
    ) -> Result<PipelineOutput, ValidationError> {
        let format = FileFormat::from_filename(filename).ok_or_else(|| {
            let ext = filename
                .rsplit_once('.')
                .map(|(_, e)| e.to_string())
                .unwrap_or_else(|| "missing extension".to_string());
            ValidationError::UnsupportedFormat(ext)
        })?;
        let document = Document::new(filename.to_string(), format, data.len() as u64);

        let extraction = self.extractor.extract(data, &document).await?;
        tracing::info!(
            source = ?extraction.source,
            pages_processed = extraction.pages_processed,
            pages_failed = extraction.pages_failed,
            "text extracted"
        );

        let outcome = self.classifier.classify(&extraction.text).await;
        let outcome = outcome.map(|result| self.validator.validate(result));

        tracing::info!(
            document_type = %outcome.result().document_type,
            category = %outcome.result().category,
            confidence = outcome.result().confidence,
            degraded = outcome.is_degraded(),
            "classification validated"
        );

        Ok(PipelineOutput {
            document,
            extraction,
            outcome,
        })
    }
}
