use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};

use classidoc::application::ports::{
    LlmClient, LlmClientError, OcrEngine, OcrError, TextExtractor, ValidationError,
};
use classidoc::application::services::{
    ClassificationPipeline, FallbackClassifier, LlmClassifier, ResultValidator,
};
use classidoc::config::{ExtractionSettings, LimitSettings, LlmSettings};
use classidoc::domain::{
    ClassificationMethod, ClassificationResult, DocumentTypeCatalog, ExtractionSource,
};
use classidoc::infrastructure::extraction::DocumentTextExtractor;
use classidoc::infrastructure::llm::MockLlmClient;
use classidoc::infrastructure::ocr::MockOcrEngine;

const FALLBACK_CONFIDENCE: f32 = 0.3;

struct Mocks {
    ocr: Arc<MockOcrEngine>,
    llm: Arc<MockLlmClient>,
}

fn pipeline_with(
    ocr_script: Vec<Result<String, OcrError>>,
    llm_script: Vec<Result<String, LlmClientError>>,
) -> (ClassificationPipeline, Mocks) {
    pipeline_with_limits(ocr_script, llm_script, limits())
}

fn pipeline_with_limits(
    ocr_script: Vec<Result<String, OcrError>>,
    llm_script: Vec<Result<String, LlmClientError>>,
    limits: LimitSettings,
) -> (ClassificationPipeline, Mocks) {
    let catalog = Arc::new(DocumentTypeCatalog::builtin());

    let ocr = Arc::new(MockOcrEngine::new(ocr_script));
    let ocr_engine: Arc<dyn OcrEngine> = ocr.clone();
    let extractor: Arc<dyn TextExtractor> = Arc::new(DocumentTextExtractor::new(
        ocr_engine,
        &limits,
        &ExtractionSettings {
            render_dpi: 150.0,
            max_pages: 200,
        },
    ));

    let llm = Arc::new(MockLlmClient::new(llm_script));
    let llm_client: Arc<dyn LlmClient> = llm.clone();
    let fallback = FallbackClassifier::new(Arc::clone(&catalog), FALLBACK_CONFIDENCE);
    let classifier = LlmClassifier::new(
        llm_client,
        Arc::clone(&catalog),
        fallback,
        &llm_settings(),
        limits.min_classifiable_chars,
    );

    let validator = ResultValidator::new(catalog);
    let pipeline = ClassificationPipeline::new(extractor, classifier, validator);
    (pipeline, Mocks { ocr, llm })
}

fn limits() -> LimitSettings {
    LimitSettings {
        max_file_size_mb: 50,
        min_direct_chars: 50,
        min_classifiable_chars: 20,
    }
}

fn llm_settings() -> LlmSettings {
    LlmSettings {
        base_url: "http://localhost".to_string(),
        api_key: String::new(),
        model: "test-model".to_string(),
        temperature: 0.1,
        max_tokens: 512,
        timeout_secs: 5,
        max_input_chars: 8000,
    }
}

/// Build a minimal single-page PDF carrying the given text in its content
/// stream, so direct extraction can find it.
fn text_pdf(text: &str) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("content stream encodes"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("pdf serializes");
    buffer
}

const LEASE_PDF_TEXT: &str = "Bail commercial conclu entre le bailleur et le preneur pour le \
                              local commercial, loyer annuel de 24 000 euros hors charges.";

#[tokio::test]
async fn given_textual_pdf_and_cooperative_model_then_llm_result_comes_back_validated() {
    let answer = r#"{"type": "Bail ou projet de bail du bien objet de l'acquisition", "category": "Object", "confidence": 0.91}"#;
    let (pipeline, mocks) = pipeline_with(vec![], vec![Ok(answer.to_string())]);
    let data = text_pdf(LEASE_PDF_TEXT);

    let output = pipeline.process(&data, "bail.pdf").await.unwrap();

    assert_eq!(output.extraction.source, ExtractionSource::Direct);
    assert!(!output.outcome.is_degraded());
    let result = output.outcome.result();
    assert_eq!(
        result.document_type,
        "Bail ou projet de bail du bien objet de l'acquisition"
    );
    assert_eq!(result.category, "Object");
    assert_eq!(result.confidence, 0.91);
    assert_eq!(result.method, ClassificationMethod::Llm);
    assert_eq!(mocks.ocr.call_count(), 0);
    assert_eq!(mocks.llm.call_count(), 1);
}

#[tokio::test]
async fn given_scanned_image_then_ocr_text_feeds_the_model() {
    let ocr_text = "Extrait Kbis délivré par le greffe du tribunal de commerce, \
                    immatriculation au registre du commerce et des sociétés.";
    let answer =
        r#"{"type": "KBIS société emprunteur", "category": "Company", "confidence": 0.87}"#;
    let (pipeline, mocks) = pipeline_with(
        vec![Ok(ocr_text.to_string())],
        vec![Ok(answer.to_string())],
    );
    let data = b"\x89PNG fake scan";

    let output = pipeline.process(data, "kbis.png").await.unwrap();

    assert_eq!(output.extraction.source, ExtractionSource::Ocr);
    assert_eq!(output.outcome.result().document_type, "KBIS société emprunteur");
    assert_eq!(output.outcome.result().category, "Company");
    assert_eq!(mocks.ocr.call_count(), 1);
    assert_eq!(mocks.llm.call_count(), 1);
}

#[tokio::test]
async fn given_model_that_never_answers_json_then_fallback_classifies_degraded() {
    let (pipeline, mocks) = pipeline_with(
        vec![],
        vec![
            Ok("I think this is a lease".to_string()),
            Ok("still prose, not json".to_string()),
        ],
    );
    let data = text_pdf(LEASE_PDF_TEXT);

    let output = pipeline.process(&data, "bail.pdf").await.unwrap();

    assert!(output.outcome.is_degraded());
    let result = output.outcome.result();
    assert_eq!(result.method, ClassificationMethod::Fallback);
    assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
    assert_eq!(
        result.document_type,
        "Bail ou projet de bail du bien objet de l'acquisition"
    );
    assert_eq!(mocks.llm.call_count(), 2);
}

#[tokio::test]
async fn given_unreadable_pdf_then_output_is_unknown_and_model_is_never_called() {
    let (pipeline, mocks) = pipeline_with(vec![], vec![]);

    let output = pipeline
        .process(b"not a pdf at all", "broken.pdf")
        .await
        .unwrap();

    assert!(output.extraction.text.is_empty());
    assert!(output.outcome.is_degraded());
    let result = output.outcome.result();
    assert_eq!(result.document_type, ClassificationResult::UNKNOWN);
    assert_eq!(result.category, ClassificationResult::UNKNOWN);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(mocks.ocr.call_count(), 0);
    assert_eq!(mocks.llm.call_count(), 0);
}

#[tokio::test]
async fn given_unsupported_extension_then_processing_is_refused_upfront() {
    let (pipeline, mocks) = pipeline_with(vec![], vec![]);

    let result = pipeline.process(b"plain text", "notes.txt").await;

    assert_eq!(
        result.err(),
        Some(ValidationError::UnsupportedFormat("txt".to_string()))
    );
    assert_eq!(mocks.ocr.call_count(), 0);
    assert_eq!(mocks.llm.call_count(), 0);
}

#[tokio::test]
async fn given_filename_without_extension_then_the_error_names_the_missing_extension() {
    let (pipeline, _) = pipeline_with(vec![], vec![]);

    let result = pipeline.process(b"some bytes", "README").await;

    assert_eq!(
        result.err(),
        Some(ValidationError::UnsupportedFormat(
            "missing extension".to_string()
        ))
    );
}

#[tokio::test]
async fn given_oversized_file_then_processing_is_refused_before_any_collaborator_runs() {
    let tight = LimitSettings {
        max_file_size_mb: 0,
        min_direct_chars: 50,
        min_classifiable_chars: 20,
    };
    let (pipeline, mocks) = pipeline_with_limits(vec![], vec![], tight);

    let result = pipeline.process(&[0u8; 2048], "scan.jpg").await;

    assert!(matches!(result, Err(ValidationError::FileTooLarge { .. })));
    assert_eq!(mocks.ocr.call_count(), 0);
    assert_eq!(mocks.llm.call_count(), 0);
}

#[tokio::test]
async fn given_same_input_twice_then_outputs_are_identical() {
    let answer = r#"{"type": "Compromis de vente", "category": "Object", "confidence": 0.8}"#;
    let data = text_pdf(LEASE_PDF_TEXT);

    let (first_pipeline, _) = pipeline_with(vec![], vec![Ok(answer.to_string())]);
    let (second_pipeline, _) = pipeline_with(vec![], vec![Ok(answer.to_string())]);

    let first = first_pipeline.process(&data, "bail.pdf").await.unwrap();
    let second = second_pipeline.process(&data, "bail.pdf").await.unwrap();

    assert_eq!(first.extraction.text, second.extraction.text);
    assert_eq!(first.outcome.result(), second.outcome.result());
}
