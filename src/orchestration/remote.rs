// Remote service boundary - text and image clients behind timeouts

use super::types::ErrorKind;
use async_trait::async_trait;
use imagent::{GeneratedImage, ImageGenConfig, ImageGenerator};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One text-generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub user_input: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Failure of a remote call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    #[error("remote call timed out")]
    Timeout,

    #[error("upstream error: {0}")]
    Upstream(String),
}

impl RemoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RemoteError::Timeout => ErrorKind::UpstreamTimeout,
            RemoteError::Upstream(_) => ErrorKind::UpstreamError,
        }
    }

    /// Message safe to show to a caller; upstream detail stays in the logs
    pub fn user_message(&self) -> &'static str {
        match self {
            RemoteError::Timeout => "The request timed out. Please try again.",
            RemoteError::Upstream(_) => "The upstream service failed to process the request.",
        }
    }
}

/// Hosted text-generation service
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, RemoteError>;
}

#[async_trait]
impl TextModel for gemini::GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, RemoteError> {
        let prompt = gemini::Prompt {
            system_instruction: &request.system_instruction,
            user_input: &request.user_input,
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
        };

        gemini::GeminiClient::generate(self, &prompt).await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout
            } else {
                RemoteError::Upstream(e.to_string())
            }
        })
    }
}

/// Shared handle to a text model with the call bound applied
#[derive(Clone)]
pub struct ModelHandle {
    model: Arc<dyn TextModel>,
    timeout: Duration,
    retries: u32,
}

impl ModelHandle {
    pub fn new(model: Arc<dyn TextModel>, timeout: Duration) -> Self {
        Self {
            model,
            timeout,
            retries: 0,
        }
    }

    /// Retry timed-out calls up to `retries` extra times
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, RemoteError> {
        let mut attempt = 0;
        loop {
            let outcome = match tokio::time::timeout(self.timeout, self.model.generate(request)).await {
                Ok(result) => result,
                Err(_) => Err(RemoteError::Timeout),
            };

            match outcome {
                Err(RemoteError::Timeout) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(attempt, "text model timed out, retrying");
                }
                other => return other,
            }
        }
    }
}

/// Shared handle to an image generator with the call bound applied
#[derive(Clone)]
pub struct ImageHandle {
    generator: Arc<dyn ImageGenerator>,
    timeout: Duration,
}

impl ImageHandle {
    pub fn new(generator: Arc<dyn ImageGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub async fn generate(&self, config: &ImageGenConfig) -> Result<GeneratedImage, RemoteError> {
        match tokio::time::timeout(self.timeout, self.generator.generate(config)).await {
            Ok(Ok(image)) => Ok(image),
            Ok(Err(e)) if e.is_timeout() => Err(RemoteError::Timeout),
            Ok(Err(e)) => Err(RemoteError::Upstream(e.to_string())),
            Err(_) => Err(RemoteError::Timeout),
        }
    }
}
