use super::Relay;
use crate::llm::{GenerationRequest, LoadResult, ModelListing};
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum WarmupOutcome {
    AlreadyActive,
    Warmed(Duration),
    BackendOffline,
    NotResponding(u16),
    TimedOut,
    Failed(u16),
}

impl WarmupOutcome {
    /// Time spent getting the model ready, when it is ready.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            Self::AlreadyActive => Some(Duration::ZERO),
            Self::Warmed(elapsed) => Some(*elapsed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarmupReport {
    pub model: String,
    pub outcome: WarmupOutcome,
}

impl Relay {
    /// Makes the backend load `model` ahead of the first real prompt.
    ///
    /// A model listed by `/api/tags` is taken as ready and no generate call is
    /// issued. Otherwise a filler prompt is sent, only its HTTP status is
    /// checked, and the wall-clock time since the listing request is reported.
    pub async fn warm_up(&self, model: Option<&str>) -> WarmupReport {
        let model = self.resolve_model(model);
        let started = Instant::now();

        let listing = self.backend.list_models().await;
        let outcome = match &listing {
            ModelListing::Unreachable(_) | ModelListing::Malformed(_) => {
                warn!("Ollama server is offline or unreachable");
                WarmupOutcome::BackendOffline
            }
            ModelListing::Unhealthy(status) => WarmupOutcome::NotResponding(*status),
            ModelListing::Available(_) if listing.contains(&model) => {
                info!("Model '{}' is already loaded", model);
                WarmupOutcome::AlreadyActive
            }
            ModelListing::Available(_) => self.load_filler(&model, started).await,
        };

        WarmupReport { model, outcome }
    }

    async fn load_filler(&self, model: &str, started: Instant) -> WarmupOutcome {
        let result = self
            .backend
            .load_model(GenerationRequest::new(model, self.warmup_prompt.clone()))
            .await;
        let elapsed = started.elapsed();

        match result {
            LoadResult::Loaded => {
                info!(
                    "Model '{}' warmed up in {:.2} seconds",
                    model,
                    elapsed.as_secs_f64()
                );
                WarmupOutcome::Warmed(elapsed)
            }
            LoadResult::TimedOut => {
                warn!("Warmup request for '{}' timed out", model);
                WarmupOutcome::TimedOut
            }
            LoadResult::Status(status) => {
                warn!(
                    "Ollama warmup failed (status {}) in {:.2}s",
                    status,
                    elapsed.as_secs_f64()
                );
                WarmupOutcome::Failed(status)
            }
            LoadResult::Unreachable(_) => WarmupOutcome::BackendOffline,
        }
    }
}
