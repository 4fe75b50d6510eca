use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use classidoc::application::services::{
    ClassificationPipeline, FallbackClassifier, LlmClassifier, PipelineOutput, ResultValidator,
};
use classidoc::config::Settings;
use classidoc::domain::{ClassificationResult, DocumentTypeCatalog, ExtractionSource};
use classidoc::infrastructure::extraction::DocumentTextExtractor;
use classidoc::infrastructure::llm::MistralClient;
use classidoc::infrastructure::observability::{init_tracing, TracingConfig};
use classidoc::infrastructure::ocr::MistralOcrClient;

#[derive(Serialize)]
struct Report<'a> {
    filename: &'a str,
    format: &'a str,
    source: ExtractionSource,
    pages_processed: usize,
    pages_failed: usize,
    warnings: &'a [String],
    degraded: bool,
    classification: &'a ClassificationResult,
}

impl<'a> Report<'a> {
    fn from_output(output: &'a PipelineOutput) -> Self {
        Self {
            filename: &output.document.filename,
            format: output.document.format.as_str(),
            source: output.extraction.source,
            pages_processed: output.extraction.pages_processed,
            pages_failed: output.extraction.pages_failed,
            warnings: &output.extraction.warnings,
            degraded: output.outcome.is_degraded(),
            classification: output.outcome.result(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    init_tracing(TracingConfig::new(
        settings.logging.level.clone(),
        settings.logging.enable_json,
    ));

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: classidoc <file>...");
    }

    let catalog = Arc::new(DocumentTypeCatalog::builtin());
    let ocr = Arc::new(MistralOcrClient::new(&settings.ocr));
    let llm = Arc::new(MistralClient::new(&settings.llm));

    let extractor = Arc::new(DocumentTextExtractor::new(
        ocr,
        &settings.limits,
        &settings.extraction,
    ));
    let fallback = FallbackClassifier::new(Arc::clone(&catalog), settings.fallback.confidence);
    let classifier = LlmClassifier::new(
        llm,
        Arc::clone(&catalog),
        fallback,
        &settings.llm,
        settings.limits.min_classifiable_chars,
    );
    let validator = ResultValidator::new(Arc::clone(&catalog));
    let pipeline = ClassificationPipeline::new(extractor, classifier, validator);

    let mut failures = 0usize;
    for path in &paths {
        match classify_path(&pipeline, path).await {
            Ok(report) => println!("{report}"),
            Err(message) => {
                tracing::error!(file = %path, error = %message, "document failed");
                eprintln!("{message}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} document(s) failed", paths.len());
    }
    Ok(())
}

/// Classify one path into its printable JSON report. Any failure, including
/// an unreadable file, is returned as a message so the batch can continue
/// with the remaining paths.
async fn classify_path(
    pipeline: &ClassificationPipeline,
    path: &str,
) -> Result<String, String> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| format!("{path}: {e}"))?;
    let filename = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);

    let output = pipeline
        .process(&data, filename)
        .await
        .map_err(|e| format!("{path}: {e}"))?;

    serde_json::to_string_pretty(&Report::from_output(&output)).map_err(|e| format!("{path}: {e}"))
}
