use crate::{
    config::OllamaConfig,
    llm::{GenerationRequest, GenerationResult, InferenceBackend, OllamaClient},
};
use tracing::{info, warn};

/// Forwards prompts to the inference backend and turns every backend outcome
/// into a [`GenerationResult`]. Holds no mutable state, so one instance is
/// shared by all concurrent requests.
pub struct Relay {
    pub(super) backend: Box<dyn InferenceBackend>,
    default_model: String,
    pub(super) warmup_prompt: String,
    check_health_first: bool,
}

/// One completed ask: what was sent and what came back.
#[derive(Debug, Clone, PartialEq)]
pub struct Relayed {
    pub prompt: String,
    pub model: String,
    pub result: GenerationResult,
}

impl Relay {
    pub fn new(config: &OllamaConfig) -> Self {
        info!("Initializing relay for Ollama at {}", config.base_url);
        Self::with_backend(Box::new(OllamaClient::from_config(config)), config)
    }

    pub fn with_backend(backend: Box<dyn InferenceBackend>, config: &OllamaConfig) -> Self {
        Self {
            backend,
            default_model: config.default_model.clone(),
            warmup_prompt: config.warmup_prompt.clone(),
            check_health_first: config.check_health_first,
        }
    }

    /// Blank or missing model names fall back to the configured default.
    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        match requested.map(str::trim) {
            Some(model) if !model.is_empty() => model.to_string(),
            _ => self.default_model.clone(),
        }
    }

    pub async fn ask(&self, prompt: &str, model: Option<&str>) -> Relayed {
        let model = self.resolve_model(model);
        info!("Prompt: {}", prompt);
        info!("Model selected: {}", model);

        // The health check is advisory; the backend may still drop before generate.
        if self.check_health_first && !self.backend.check_health().await {
            warn!("Ollama server not available, skipping generation");
            return Relayed {
                prompt: prompt.to_string(),
                model,
                result: GenerationResult::BackendOffline,
            };
        }

        let result = self
            .backend
            .generate(GenerationRequest::new(model.clone(), prompt))
            .await;

        Relayed {
            prompt: prompt.to_string(),
            model,
            result,
        }
    }
}
