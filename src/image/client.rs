use super::types::*;
use crate::{Error, Result, config::ImageConfig, llm::preview};
use std::time::Duration;
use tracing::{debug, error, info};

pub struct ImageClient {
    client: reqwest::Client,
    base_url: String,
    steps: u32,
    timeout: Duration,
}

impl ImageClient {
    pub fn new(base_url: impl Into<String>, steps: u32, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            steps,
            timeout,
        }
    }

    pub fn from_config(config: &ImageConfig) -> Self {
        info!("Initializing image client for {}", config.base_url);
        Self::new(config.base_url.clone(), config.steps, config.timeout())
    }

    /// Every failure collapses into [`ImageOutcome::Failed`] carrying the error text.
    pub async fn generate(&self, prompt: &str) -> ImageOutcome {
        info!("Image prompt: {}", prompt);
        match self.try_generate(prompt).await {
            Ok(attachment) => {
                info!(
                    "Generated image {} ({} bytes)",
                    attachment.filename,
                    attachment.bytes.len()
                );
                ImageOutcome::Generated(attachment)
            }
            Err(e) => {
                error!("Image generation failed: {}", e);
                ImageOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_generate(&self, prompt: &str) -> Result<ImageAttachment> {
        let request = Txt2ImgRequest {
            prompt: prompt.to_string(),
            steps: self.steps,
        };

        let response = self
            .client
            .post(format!("{}/sdapi/v1/txt2img", self.base_url))
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Image backend status {}: {}", status, preview(&body));

        if !status.is_success() {
            return Err(Error::BackendStatus {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let parsed: Txt2ImgResponse = serde_json::from_str(&body)?;
        let first = parsed
            .images
            .into_iter()
            .next()
            .ok_or_else(|| Error::image("response contained no images"))?;

        Ok(ImageAttachment::png(decode_image(&first)?))
    }
}
