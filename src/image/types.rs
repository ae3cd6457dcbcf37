use crate::Result;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Txt2ImgRequest {
    pub prompt: String,
    pub steps: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Txt2ImgResponse {
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            filename: format!("jenggpt-{}.png", Uuid::new_v4()),
            content_type: "image/png".to_string(),
            bytes,
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    Generated(ImageAttachment),
    Failed(String),
}

/// Decodes one entry of `images`, dropping a `data:image/...;base64,` prefix if present.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>> {
    let payload = match encoded.split_once(',') {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };
    Ok(STANDARD.decode(payload.trim())?)
}
