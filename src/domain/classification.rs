use serde::Serialize;

/// Which path produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMethod {
    Llm,
    Fallback,
}

/// Terminal classification of a document. `(document_type, category)` is
/// always a catalog pair, or `document_type` is [`ClassificationResult::UNKNOWN`]
/// with confidence 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub document_type: String,
    pub category: String,
    pub confidence: f32,
    pub method: ClassificationMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_model_output: Option<String>,
}

impl ClassificationResult {
    pub const UNKNOWN: &'static str = "Unknown";

    /// The total-failure classification: nothing matched anywhere.
    pub fn unknown() -> Self {
        Self {
            document_type: Self::UNKNOWN.to_string(),
            category: Self::UNKNOWN.to_string(),
            confidence: 0.0,
            method: ClassificationMethod::Fallback,
            raw_model_output: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.document_type == Self::UNKNOWN
    }
}

/// Classification always terminates with a result; this distinguishes the
/// model path from the degraded fallback path without exception inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Succeeded(ClassificationResult),
    Degraded(ClassificationResult),
}

impl ClassificationOutcome {
    pub fn result(&self) -> &ClassificationResult {
        match self {
            Self::Succeeded(r) | Self::Degraded(r) => r,
        }
    }

    pub fn into_result(self) -> ClassificationResult {
        match self {
            Self::Succeeded(r) | Self::Degraded(r) => r,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    pub fn map(self, f: impl FnOnce(ClassificationResult) -> ClassificationResult) -> Self {
        match self {
            Self::Succeeded(r) => Self::Succeeded(f(r)),
            Self::Degraded(r) => Self::Degraded(f(r)),
        }
    }
}
