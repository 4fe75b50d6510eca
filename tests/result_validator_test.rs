use std::sync::Arc;

use classidoc::application::services::ResultValidator;
use classidoc::domain::{
    ClassificationMethod, ClassificationResult, DocumentTypeCatalog,
};

fn validator() -> ResultValidator {
    ResultValidator::new(Arc::new(DocumentTypeCatalog::builtin()))
}

fn llm_result(document_type: &str, category: &str, confidence: f32) -> ClassificationResult {
    ClassificationResult {
        document_type: document_type.to_string(),
        category: category.to_string(),
        confidence,
        method: ClassificationMethod::Llm,
        raw_model_output: Some("{}".to_string()),
    }
}

#[test]
fn given_valid_result_when_validating_then_it_passes_through_unchanged() {
    let result = validator().validate(llm_result("Compromis de vente", "Object", 0.75));

    assert_eq!(result.document_type, "Compromis de vente");
    assert_eq!(result.category, "Object");
    assert_eq!(result.confidence, 0.75);
}

#[test]
fn given_out_of_range_confidence_when_validating_then_it_is_clamped() {
    let above = validator().validate(llm_result("Compromis de vente", "Object", 3.2));
    assert_eq!(above.confidence, 1.0);

    let below = validator().validate(llm_result("Compromis de vente", "Object", -0.4));
    assert_eq!(below.confidence, 0.0);
}

#[test]
fn given_non_finite_confidence_when_validating_then_it_becomes_zero() {
    let result = validator().validate(llm_result("Compromis de vente", "Object", f32::NAN));
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn given_unknown_type_when_validating_then_confidence_and_category_are_forced() {
    let mut input = ClassificationResult::unknown();
    input.confidence = 0.6;
    input.category = "Object".to_string();

    let result = validator().validate(input);

    assert_eq!(result.document_type, ClassificationResult::UNKNOWN);
    assert_eq!(result.category, ClassificationResult::UNKNOWN);
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn given_type_outside_catalog_when_validating_then_result_is_demoted_to_unknown() {
    let result = validator().validate(llm_result("Facture de téléphone", "Company", 0.9));

    assert_eq!(result.document_type, ClassificationResult::UNKNOWN);
    assert_eq!(result.category, ClassificationResult::UNKNOWN);
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn given_mismatched_category_when_validating_then_catalog_pairing_is_restored() {
    let result = validator().validate(llm_result("Diagnostic gaz", "Works", 0.8));

    assert_eq!(result.document_type, "Diagnostic gaz");
    assert_eq!(result.category, "Diagnostics");
    assert_eq!(result.confidence, 0.8);
}
