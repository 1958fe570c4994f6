use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::application::services::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, DEFAULT_TOP_K};
use crate::infrastructure::observability::TracingConfig;
use crate::infrastructure::search::{DEFAULT_CONTENT_FIELD, DEFAULT_VECTOR_FIELD};
use crate::infrastructure::video::{DEFAULT_API_BASE_URL, DEFAULT_MANAGEMENT_BASE_URL};

use super::Environment;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub video_indexer: VideoIndexerSettings,
    pub openai: OpenAiSettings,
    pub search: SearchSettings,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Reads `appsettings.{environment}` (optional) and then `APP_`-prefixed
    /// environment variables, `__` separating nested keys
    /// (`APP_OPENAI__API_KEY` sets `openai.api_key`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str().to_lowercase()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn tracing_config(&self, environment: Environment) -> TracingConfig {
        TracingConfig::new(environment.as_str(), self.logging.json)
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
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VideoIndexerSettings {
    pub api_base_url: String,
    pub management_base_url: String,
    pub account_id: String,
    pub location: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub account_name: String,
    pub arm_access_token: String,
}

impl Default for VideoIndexerSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            management_base_url: DEFAULT_MANAGEMENT_BASE_URL.to_string(),
            account_id: String::new(),
            location: "trial".to_string(),
            subscription_id: String::new(),
            resource_group: String::new(),
            account_name: String::new(),
            arm_access_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub chat_deployment: String,
    pub embedding_deployment: String,
    pub temperature: f32,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            api_version: "2024-02-01".to_string(),
            chat_deployment: String::new(),
            embedding_deployment: String::new(),
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub endpoint: String,
    pub api_key: String,
    pub index_name: String,
    pub api_version: String,
    pub top_k: usize,
    pub content_field: String,
    pub vector_field: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            index_name: String::new(),
            api_version: "2023-11-01".to_string(),
            top_k: DEFAULT_TOP_K,
            content_field: DEFAULT_CONTENT_FIELD.to_string(),
            vector_field: DEFAULT_VECTOR_FIELD.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,
    pub work_dir: Option<PathBuf>,
}

impl PipelineSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT.as_secs(),
            work_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub json: bool,
}
