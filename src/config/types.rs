use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub image: Option<ImageConfig>,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
    #[serde(default = "default_generate_timeout_secs")]
    pub generate_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub check_health_first: bool,
    #[serde(default = "default_warmup_prompt")]
    pub warmup_prompt: String,
}

/// Stable Diffusion WebUI compatible `txt2img` backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub base_url: String,
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default = "default_image_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl OllamaConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_model: default_model(),
            health_timeout_secs: default_health_timeout_secs(),
            generate_timeout_secs: default_generate_timeout_secs(),
            check_health_first: true,
            warmup_prompt: default_warmup_prompt(),
        }
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn generate_timeout(&self) -> Duration {
        Duration::from_secs(self.generate_timeout_secs)
    }
}

impl ImageConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            steps: default_steps(),
            timeout_secs: default_image_timeout_secs(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_model() -> String {
    "mistral".to_string()
}

fn default_health_timeout_secs() -> u64 {
    2
}

fn default_generate_timeout_secs() -> u64 {
    15
}

fn default_true() -> bool {
    true
}

fn default_warmup_prompt() -> String {
    "Hello".to_string()
}

fn default_steps() -> u32 {
    20
}

fn default_image_timeout_secs() -> u64 {
    120
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}
