use crate::presentation::config::LoggingSettings;

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub level: String,
    pub json_format: bool,
}

impl TracingConfig {
    /// `LOG_FORMAT=json` switches to JSON output regardless of settings.
    pub fn from_settings(environment: &str, logging: &LoggingSettings) -> Self {
        let json_from_env = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self {
            environment: environment.to_string(),
            level: logging.level.clone(),
            json_format: logging.enable_json || json_from_env,
        }
    }

    pub(super) fn default_directives(&self) -> String {
        format!(
            "{},assistant_store=debug,tower_http=debug",
            self.level.trim().to_lowercase()
        )
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::from_settings("local", &LoggingSettings::default())
    }
}
