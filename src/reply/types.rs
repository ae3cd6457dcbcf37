use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Embed accent colour as a 24-bit RGB integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Color = Color(0xE74C3C);
    pub const ORANGE: Color = Color(0xE67E22);
    pub const DARK_TEAL: Color = Color(0x11806A);
    pub const GREEN: Color = Color(0x2ECC71);
    pub const BLURPLE: Color = Color(0x5865F2);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// A single embed-style message sent back to the chat user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub title: String,
    pub description: String,
    pub color: Color,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ReplyField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub ephemeral: bool,
    pub timestamp: DateTime<Utc>,
}

impl Reply {
    pub fn new(title: impl Into<String>, description: impl Into<String>, color: Color) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
            fields: Vec::new(),
            footer: None,
            image: None,
            ephemeral: false,
            timestamp: Utc::now(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(ReplyField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }

    /// Points the embed image at an attachment sent alongside the message.
    pub fn attachment_image(mut self, filename: &str) -> Self {
        self.image = Some(format!("attachment://{}", filename));
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}
