use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub limits: LimitSettings,
    pub ocr: OcrSettings,
    pub llm: LlmSettings,
    pub extraction: ExtractionSettings,
    pub fallback: FallbackSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    pub max_file_size_mb: usize,
    /// Minimum extracted character count under which direct PDF text is
    /// not trusted and pages are re-routed through OCR.
    pub min_direct_chars: usize,
    /// Minimum character count under which the model call is skipped and
    /// classification falls back immediately.
    pub min_classifiable_chars: usize,
}

impl LimitSettings {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb as u64 * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
    pub timeout_secs: u64,
    /// Extracted text is truncated to this many characters before being
    /// embedded in the prompt.
    pub max_input_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    pub render_dpi: f32,
    pub max_pages: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FallbackSettings {
    /// Fixed confidence reported by the keyword fallback, deliberately lower
    /// than anything the model would normally report.
    pub confidence: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Build settings from environment variables, defaulting every field.
    pub fn from_env() -> Self {
        Self {
            limits: LimitSettings {
                max_file_size_mb: env_parse("CLASSIDOC_MAX_FILE_SIZE_MB", 50),
                min_direct_chars: env_parse("CLASSIDOC_MIN_DIRECT_CHARS", 50),
                min_classifiable_chars: env_parse("CLASSIDOC_MIN_CLASSIFIABLE_CHARS", 20),
            },
            ocr: OcrSettings {
                base_url: env_or("MISTRAL_BASE_URL", "https://api.mistral.ai"),
                api_key: env_or("MISTRAL_API_KEY", ""),
                model: env_or("CLASSIDOC_OCR_MODEL", "mistral-ocr-latest"),
                timeout_secs: env_parse("CLASSIDOC_OCR_TIMEOUT_SECS", 60),
            },
            llm: LlmSettings {
                base_url: env_or("MISTRAL_BASE_URL", "https://api.mistral.ai"),
                api_key: env_or("MISTRAL_API_KEY", ""),
                model: env_or("CLASSIDOC_LLM_MODEL", "mistral-large-latest"),
                temperature: env_parse("CLASSIDOC_LLM_TEMPERATURE", 0.1),
                max_tokens: env_parse("CLASSIDOC_LLM_MAX_TOKENS", 512),
                timeout_secs: env_parse("CLASSIDOC_LLM_TIMEOUT_SECS", 60),
                max_input_chars: env_parse("CLASSIDOC_LLM_MAX_INPUT_CHARS", 8000),
            },
            extraction: ExtractionSettings {
                render_dpi: env_parse("CLASSIDOC_RENDER_DPI", 150.0),
                max_pages: env_parse("CLASSIDOC_MAX_PAGES", 200),
            },
            fallback: FallbackSettings {
                confidence: env_parse("CLASSIDOC_FALLBACK_CONFIDENCE", 0.3),
            },
            logging: LoggingSettings {
                level: env_or("CLASSIDOC_LOG_LEVEL", "info"),
                enable_json: env_parse("CLASSIDOC_LOG_JSON", false),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
