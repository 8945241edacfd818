// Pollinations.ai backend - free hosted text-to-image, no API key required

use crate::{GeneratedImage, ImageGenConfig, ImageGenError, ImageGenerator, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://image.pollinations.ai";

/// Image generator backed by the Pollinations prompt endpoint
pub struct PollinationsGenerator {
    client: reqwest::Client,
    endpoint: Url,
}

impl PollinationsGenerator {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ImageGenError::InvalidConfig(format!("invalid endpoint '{endpoint}': {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(ImageGenError::InvalidConfig(format!(
                "endpoint '{endpoint}' cannot be used as a base URL"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageGenError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    /// Build the request URL, percent-encoding the prompt as a path segment
    fn request_url(&self, config: &ImageGenConfig) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| ImageGenError::InvalidConfig("endpoint cannot be a base".into()))?
            .pop_if_empty()
            .push("prompt")
            .push(&config.prompt);
        url.query_pairs_mut()
            .append_pair("width", &config.width.to_string())
            .append_pair("height", &config.height.to_string())
            .append_pair("nologo", "true");
        Ok(url)
    }
}

#[async_trait]
impl ImageGenerator for PollinationsGenerator {
    async fn generate(&self, config: &ImageGenConfig) -> Result<GeneratedImage> {
        let url = self.request_url(config)?;
        tracing::info!(width = config.width, height = config.height, "requesting image from Pollinations");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageGenError::Service {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!(size = bytes.len(), "image downloaded");

        Ok(GeneratedImage::new(bytes.to_vec(), config.prompt.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_encoded() {
        let generator = PollinationsGenerator::new(DEFAULT_ENDPOINT, Duration::from_secs(5)).unwrap();
        let config = ImageGenConfig::new("fluffy cat, 4k & more").with_size(512, 512);
        let url = generator.request_url(&config).unwrap();

        assert_eq!(url.path(), "/prompt/fluffy%20cat,%204k%20&%20more");
        assert_eq!(url.query(), Some("width=512&height=512&nologo=true"));
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = PollinationsGenerator::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(ImageGenError::InvalidConfig(_))));
    }
}
