mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::{debug, info};

/// Environment variables that take precedence over the YAML file. Tunnel URLs
/// change on every redeploy, so the backend endpoints are overridable.
pub const OLLAMA_URL_ENV: &str = "OLLAMA_URL";
pub const OLLAMA_MODEL_ENV: &str = "OLLAMA_MODEL";
pub const IMAGE_BACKEND_URL_ENV: &str = "IMAGE_BACKEND_URL";

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    load_from(&config_path, |key| env::var(key).ok()).await
}

pub async fn load_from<F>(config_path: &str, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    let mut config: Config = serde_yaml::from_str(&config_str)?;

    apply_overrides(&mut config, lookup);
    normalize(&mut config);
    validate(&config)?;

    Ok(config)
}

pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(OLLAMA_URL_ENV) {
        info!("Ollama base URL overridden by {}", OLLAMA_URL_ENV);
        config.ollama.base_url = url;
    }

    if let Some(model) = lookup(OLLAMA_MODEL_ENV) {
        info!("Default model overridden by {}: {}", OLLAMA_MODEL_ENV, model);
        config.ollama.default_model = model;
    }

    if let Some(url) = lookup(IMAGE_BACKEND_URL_ENV) {
        info!("Image backend URL overridden by {}", IMAGE_BACKEND_URL_ENV);
        match config.image.as_mut() {
            Some(image) => image.base_url = url,
            None => config.image = Some(ImageConfig::new(url)),
        }
    }
}

fn normalize(config: &mut Config) {
    config.ollama.base_url = trim_base_url(&config.ollama.base_url);
    if let Some(image) = config.image.as_mut() {
        image.base_url = trim_base_url(&image.base_url);
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

pub fn validate(config: &Config) -> Result<()> {
    if config.ollama.base_url.is_empty() {
        return Err(Error::config("ollama.base_url must not be empty"));
    }
    if config.ollama.default_model.trim().is_empty() {
        return Err(Error::config("ollama.default_model must not be empty"));
    }
    if config.ollama.health_timeout_secs == 0 || config.ollama.generate_timeout_secs == 0 {
        return Err(Error::config("ollama timeouts must be at least one second"));
    }

    if let Some(image) = &config.image {
        if image.base_url.is_empty() {
            return Err(Error::config("image.base_url must not be empty"));
        }
        if image.timeout_secs == 0 {
            return Err(Error::config("image.timeout_secs must be at least one second"));
        }
    }

    Ok(())
}
