// Error types for imagent

use thiserror::Error;

/// Result type for imagent operations
pub type Result<T> = std::result::Result<T, ImageGenError>;

/// Errors that can occur during image generation
#[derive(Error, Debug)]
pub enum ImageGenError {
    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Image service returned {status}")]
    Service { status: u16 },
}

impl ImageGenError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ImageGenError::Timeout)
    }
}

impl From<image::ImageError> for ImageGenError {
    fn from(err: image::ImageError) -> Self {
        ImageGenError::ImageProcessing(err.to_string())
    }
}

impl From<reqwest::Error> for ImageGenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ImageGenError::Timeout
        } else {
            ImageGenError::Network(err.to_string())
        }
    }
}
