// imagent - AI Image Generation Library
// Provides an interface for generating images through hosted text-to-image services

mod pollinations;

pub mod error;

pub use error::{ImageGenError, Result};
pub use pollinations::{DEFAULT_ENDPOINT, PollinationsGenerator};

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Configuration for image generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenConfig {
    /// Text prompt describing the image to generate
    pub prompt: String,

    /// Width of the generated image
    pub width: u32,

    /// Height of the generated image
    pub height: u32,
}

impl ImageGenConfig {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            width: 1024,
            height: 1024,
        }
    }
}

/// Result of image generation
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Encoded image bytes as returned by the service
    pub data: Vec<u8>,

    /// Prompt used to generate the image
    pub prompt: String,
}

impl GeneratedImage {
    pub fn new(data: Vec<u8>, prompt: impl Into<String>) -> Self {
        Self {
            data,
            prompt: prompt.into(),
        }
    }

    /// Decode the image and re-encode it as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let img = image::load_from_memory(&self.data)?;
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    /// PNG data URL suitable for embedding in a web page
    pub fn to_data_url(&self) -> Result<String> {
        let png = self.to_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }
}

/// Trait for image generation backends
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image from the given configuration
    async fn generate(&self, config: &ImageGenConfig) -> Result<GeneratedImage>;
}
