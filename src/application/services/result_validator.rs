use std::sync::Arc;

use crate::domain::{ClassificationResult, DocumentTypeCatalog};

/// Terminal gate of the pipeline: re-clamps confidence and re-confirms the
/// `(type, category)` pairing against the catalog, guarding against a
/// corrupted fallback table or a classifier bug. Never fails.
pub struct ResultValidator {
    catalog: Arc<DocumentTypeCatalog>,
}

impl ResultValidator {
    pub fn new(catalog: Arc<DocumentTypeCatalog>) -> Self {
        Self { catalog }
    }

    pub fn validate(&self, mut result: ClassificationResult) -> ClassificationResult {
        result.confidence = if result.confidence.is_finite() {
            result.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        if result.is_unknown() {
            result.category = ClassificationResult::UNKNOWN.to_string();
            result.confidence = 0.0;
            return result;
        }

        match self.catalog.category_of(&result.document_type) {
            None => {
                tracing::warn!(
                    document_type = %result.document_type,
                    "classified type not in catalog, demoting to Unknown"
                );
                result.document_type = ClassificationResult::UNKNOWN.to_string();
                result.category = ClassificationResult::UNKNOWN.to_string();
                result.confidence = 0.0;
            }
            Some(expected) if expected != result.category => {
                tracing::warn!(
                    document_type = %result.document_type,
                    reported = %result.category,
                    expected,
                    "category mismatch, rewriting from catalog"
                );
                result.category = expected.to_string();
            }
            Some(_) => {}
        }

        result
    }
}
