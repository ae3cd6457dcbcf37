use crate::{image::ImageAttachment, reply::Reply};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WarmupRequest {
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImagineRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImagineResponse {
    pub reply: Reply,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentPayload>,
}

/// Image bytes travel base64-encoded inside the JSON response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AttachmentPayload {
    pub filename: String,
    pub content_type: String,
    pub data: String,
}

impl From<&ImageAttachment> for AttachmentPayload {
    fn from(attachment: &ImageAttachment) -> Self {
        Self {
            filename: attachment.filename.clone(),
            content_type: attachment.content_type.clone(),
            data: attachment.to_base64(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
