/// Subscriber configuration derived from [`crate::config::LoggingSettings`].
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl TracingConfig {
    pub fn new(level: impl Into<String>, json_format: bool) -> Self {
        Self {
            level: level.into(),
            json_format,
        }
    }
}
