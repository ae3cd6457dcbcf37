use super::types::{
    AskRequest, AttachmentPayload, ErrorResponse, ImagineRequest, ImagineResponse, WarmupRequest,
};
use crate::{
    config::Config,
    image::{ImageClient, ImageOutcome},
    relay::Relay,
    reply::{self, Reply},
};
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::{info, warn};

pub const IMAGE_BACKEND_MISSING: &str = "image backend is not configured";

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub images: Option<Arc<ImageClient>>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            relay: Arc::new(Relay::new(&config.ollama)),
            images: config
                .image
                .as_ref()
                .map(|image| Arc::new(ImageClient::from_config(image))),
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn require_prompt(prompt: &str) -> Result<(), HandlerError> {
    if prompt.trim().is_empty() {
        warn!("Rejected request with empty prompt");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "prompt must not be empty".to_string(),
            }),
        ));
    }
    Ok(())
}

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<Reply>, HandlerError> {
    require_prompt(&request.prompt)?;

    let relayed = state
        .relay
        .ask(&request.prompt, request.model.as_deref())
        .await;
    info!("Replying to prompt with model {}", relayed.model);

    Ok(Json(reply::generation(&relayed)))
}

pub async fn warmup(
    State(state): State<AppState>,
    Json(request): Json<WarmupRequest>,
) -> Json<Reply> {
    let report = state.relay.warm_up(request.model.as_deref()).await;
    Json(reply::warmup(&report))
}

pub async fn imagine(
    State(state): State<AppState>,
    Json(request): Json<ImagineRequest>,
) -> Result<Json<ImagineResponse>, HandlerError> {
    require_prompt(&request.prompt)?;

    let outcome = match &state.images {
        Some(images) => images.generate(&request.prompt).await,
        None => {
            warn!("Image request received but no image backend is configured");
            ImageOutcome::Failed(IMAGE_BACKEND_MISSING.to_string())
        }
    };

    let attachment = match &outcome {
        ImageOutcome::Generated(attachment) => Some(AttachmentPayload::from(attachment)),
        ImageOutcome::Failed(_) => None,
    };

    Ok(Json(ImagineResponse {
        reply: reply::image(&request.prompt, &outcome),
        attachment,
    }))
}
