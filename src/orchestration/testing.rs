// Test doubles for the remote service boundary

use super::remote::{GenerationRequest, RemoteError, TextModel};
use async_trait::async_trait;
use imagent::{GeneratedImage, ImageGenConfig, ImageGenError, ImageGenerator};
use std::io::Cursor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn request(input: &str) -> GenerationRequest {
    GenerationRequest {
        system_instruction: "test".into(),
        user_input: input.into(),
        temperature: 0.5,
        max_output_tokens: 64,
    }
}

/// Echoes the user input with a suffix
pub struct EchoModel {
    suffix: String,
    calls: AtomicUsize,
}

impl EchoModel {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextModel for EchoModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}{}", request.user_input, self.suffix))
    }
}

/// Answers moderation prompts with a fixed verdict, echoes everything else
pub struct RoutingModel {
    verdict: String,
    echo: EchoModel,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl RoutingModel {
    pub fn new(verdict: &str, suffix: &str) -> Self {
        Self {
            verdict: verdict.to_string(),
            echo: EchoModel::new(suffix),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextModel for RoutingModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, RemoteError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if request.system_instruction.contains("content moderator") {
            Ok(self.verdict.clone())
        } else {
            self.echo.generate(request).await
        }
    }
}

/// Always fails with the given error
pub struct FailingModel {
    error: RemoteError,
    calls: AtomicUsize,
}

impl FailingModel {
    pub fn new(error: RemoteError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextModel for FailingModel {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

/// Never answers within any reasonable bound
#[derive(Default)]
pub struct HangingModel {
    calls: AtomicUsize,
}

impl HangingModel {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextModel for HangingModel {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(String::new())
    }
}

pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([255, 160, 60]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode test image");
    buf.into_inner()
}

/// Returns a tiny PNG and records the prompts it was given
#[derive(Default)]
pub struct PngGenerator {
    prompts: Mutex<Vec<String>>,
}

impl PngGenerator {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ImageGenerator for PngGenerator {
    async fn generate(&self, config: &ImageGenConfig) -> imagent::Result<GeneratedImage> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(config.prompt.clone());
        }
        Ok(GeneratedImage::new(tiny_png(), config.prompt.clone()))
    }
}

pub struct BrokenGenerator;

#[async_trait]
impl ImageGenerator for BrokenGenerator {
    async fn generate(&self, _config: &ImageGenConfig) -> imagent::Result<GeneratedImage> {
        Err(ImageGenError::Service { status: 502 })
    }
}

/// Never returns an image within any reasonable bound
pub struct HangingGenerator;

#[async_trait]
impl ImageGenerator for HangingGenerator {
    async fn generate(&self, config: &ImageGenConfig) -> imagent::Result<GeneratedImage> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(GeneratedImage::new(Vec::new(), config.prompt.clone()))
    }
}

/// Reports its own transport timeout
pub struct TimedOutGenerator;

#[async_trait]
impl ImageGenerator for TimedOutGenerator {
    async fn generate(&self, _config: &ImageGenConfig) -> imagent::Result<GeneratedImage> {
        Err(ImageGenError::Timeout)
    }
}
