use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub proxy: ProxySettings,
    pub document_store: DocumentStoreSettings,
    pub storage: StorageSettings,
    pub chat: ChatSettings,
    pub assistants: AssistantsSettings,
    pub logging: LoggingSettings,
    pub branding: BrandingSettings,
}

impl Settings {
    /// Reads `.env`, then `appsettings.{environment}` if present, then
    /// `APP__SECTION__KEY` variables.
    pub fn load() -> Result<(Self, Environment), ConfigError> {
        dotenvy::dotenv().ok();

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(ConfigError::Message)?;

        let settings = Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok((settings, environment))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub upstream_base_url: String,
    pub api_key: Option<String>,
}

impl ProxySettings {
    /// The configured key, else `OPENAI_API_KEY`, else `VITE_OPENAI_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .or_else(|| std::env::var("VITE_OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            upstream_base_url: OPENAI_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentStoreSettings {
    pub endpoint: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub data_source: Option<String>,
    pub api_key: Option<String>,
    pub fallback: FallbackMode,
}

/// What the prompt store serves while the document store is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    #[default]
    Static,
    Empty,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponderKind {
    #[default]
    Canned,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub responder: ResponderKind,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub chunk_delay_ms: u64,
    pub poll_interval_ms: u64,
    pub completions_base_url: String,
    pub model: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            responder: ResponderKind::Canned,
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            chunk_delay_ms: 30,
            poll_interval_ms: 500,
            completions_base_url: OPENAI_BASE_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssistantsSettings {
    pub directory_base_url: String,
}

impl Default for AssistantsSettings {
    fn default() -> Self {
        Self {
            directory_base_url: OPENAI_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrandingSettings {
    pub company_name: String,
    pub bot_name: String,
    pub logo: String,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        Self {
            company_name: "ADVANCE Solutions".to_string(),
            bot_name: "Leif".to_string(),
            logo: "/ADVANCE Logo_Vertical_Color.png".to_string(),
        }
    }
}
