use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Answer used when the backend replies with JSON that lacks a `response` field.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response received.";

const IMPLICIT_TAG: &str = ":latest";

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
        }
    }
}

/// Terminal outcome of one generation call. Exactly one is produced per request.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Success(String),
    BackendOffline,
    InvalidResponse,
    NetworkTimeout,
    NetworkError(NetworkFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkFailure {
    pub kind: FailureKind,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ConnectionRefused,
    Status(u16),
    Other,
}

impl NetworkFailure {
    pub fn connection_refused(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::ConnectionRefused,
            detail: detail.into(),
        }
    }

    pub fn status(status: u16, detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Status(status),
            detail: detail.into(),
        }
    }

    pub fn other(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Other,
            detail: detail.into(),
        }
    }
}

/// Outcome of `GET /api/tags`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelListing {
    Available(Vec<String>),
    Unhealthy(u16),
    Malformed(String),
    Unreachable(String),
}

/// Outcome of a warm-up generation, where only the HTTP status matters.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult {
    Loaded,
    Status(u16),
    TimedOut,
    Unreachable(String),
}

impl ModelListing {
    pub fn contains(&self, model: &str) -> bool {
        match self {
            Self::Available(names) => names.iter().any(|name| model_matches(model, name)),
            _ => false,
        }
    }
}

/// `mistral` matches `mistral:latest`; anything carrying an explicit tag must match exactly.
pub fn model_matches(requested: &str, listed: &str) -> bool {
    if requested == listed {
        return true;
    }
    !requested.contains(':')
        && listed
            .strip_suffix(IMPLICIT_TAG)
            .is_some_and(|base| base == requested)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Option<Vec<ModelEntry>>,
    #[serde(default)]
    pub tags: Option<Vec<ModelEntry>>,
}

/// Older servers list bare names, current ones list descriptor objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModelEntry {
    Name(String),
    Described { name: String },
}

impl ModelEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Described { name } => name,
        }
    }
}

impl TagsResponse {
    pub fn into_names(self) -> Vec<String> {
        let entries = match self.models {
            Some(models) if !models.is_empty() => models,
            _ => self.tags.unwrap_or_default(),
        };
        entries
            .into_iter()
            .map(|entry| entry.name().to_string())
            .collect()
    }
}

/// Maps a successful `/api/generate` body onto an outcome.
pub fn parse_generation_body(body: &str) -> GenerationResult {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => {
            let answer = fields
                .get("response")
                .and_then(Value::as_str)
                .unwrap_or(NO_RESPONSE_PLACEHOLDER);
            GenerationResult::Success(answer.trim().to_string())
        }
        Ok(_) | Err(_) => GenerationResult::InvalidResponse,
    }
}

/// Pulls Ollama's `{"error": "..."}` message out of a failed response, falling back to the raw body.
pub fn backend_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| preview(body))
}

/// First 300 characters of a body, for logs and error details.
pub fn preview(body: &str) -> String {
    body.chars().take(300).collect()
}
