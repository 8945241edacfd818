// Error types for the Gemini client

use thiserror::Error;

/// Result type for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur while talking to the Gemini API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response contained no text candidates (block reason: {})", .block_reason.as_deref().unwrap_or("none"))]
    EmptyResponse { block_reason: Option<String> },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeminiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GeminiError::Timeout)
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeminiError::Timeout
        } else if err.is_decode() {
            GeminiError::Network(format!("failed to decode response: {err}"))
        } else {
            GeminiError::Network(err.to_string())
        }
    }
}
