mod fallback_classifier;
mod llm_classifier;
mod pipeline;
mod result_validator;

pub use fallback_classifier::FallbackClassifier;
pub use llm_classifier::{parse_model_answer, ClassificationError, LlmClassifier, ModelAnswer};
pub use pipeline::{ClassificationPipeline, PipelineOutput};
pub use result_validator::ResultValidator;
