mod settings;

pub use settings::{
    ExtractionSettings, FallbackSettings, LimitSettings, LlmSettings, LoggingSettings, OcrSettings,
    Settings,
};
