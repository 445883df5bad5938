use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::{Validate, ValidationError};

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;

/// Picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "address-verifier.toml";
pub const ENV_PREFIX: &str = "ADDRESS_VERIFIER_";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Read at startup; a missing key only fails when a request is made
    pub api_key: Option<String>,

    #[validate(custom(function = "validate_base_url"))]
    pub base_url: String,

    #[validate(length(min = 1))]
    pub single_model: String,

    #[validate(length(min = 1))]
    pub batch_model: String,

    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,

    #[validate(range(min = 1))]
    pub single_max_tokens: u32,

    #[validate(range(min = 1))]
    pub batch_max_tokens: u32,

    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,

    #[validate(length(min = 1))]
    pub host: String,

    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            single_model: "gpt-4o".to_string(),
            batch_model: "gpt-4".to_string(),
            temperature: 0.3,
            single_max_tokens: 150,
            batch_max_tokens: 1000,
            request_timeout_secs: 120,
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

fn validate_base_url(value: &str) -> std::result::Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(ValidationError::new("base_url")),
    }
}

impl AppConfig {
    /// Defaults, then the TOML file, then `OPENAI_API_KEY`, then `ADDRESS_VERIFIER_*`.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::ConfigError(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Toml::file(path)
            }
            None => Toml::file(DEFAULT_CONFIG_FILE),
        };

        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(file)
            .merge(Env::raw().only(&[API_KEY_ENV]).map(|_| "api_key".into()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;

        config
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;

        debug!(
            base_url = %config.base_url,
            single_model = %config.single_model,
            batch_model = %config.batch_model,
            has_api_key = config.api_key.is_some(),
            "Configuration loaded"
        );

        Ok(config)
    }

    pub fn single_llm_config(&self) -> LLMConfig {
        LLMConfig {
            base_url: self.base_url.clone(),
            model: self.single_model.clone(),
            api_key: self.api_key.clone(),
            max_tokens: Some(self.single_max_tokens),
            temperature: Some(self.temperature),
        }
    }

    pub fn batch_llm_config(&self) -> LLMConfig {
        LLMConfig {
            base_url: self.base_url.clone(),
            model: self.batch_model.clone(),
            api_key: self.api_key.clone(),
            max_tokens: Some(self.batch_max_tokens),
            temperature: Some(self.temperature),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
