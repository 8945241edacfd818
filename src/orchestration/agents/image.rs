// Image Generation - enriches a prompt with the text model, then synthesizes an image

use super::{Agent, Persona, empty_notice, is_blank};
use crate::orchestration::remote::{ImageHandle, ModelHandle, RemoteError};
use crate::orchestration::types::{AgentKind, AgentResult, payload};
use async_trait::async_trait;
use imagent::ImageGenConfig;
use serde_json::{Value, json};

const QUALITY_MODIFIERS: &str = "highly detailed, professional photography, 4k";

const ENRICHMENT: Persona = Persona {
    instruction: r#"Enhance the user's cat image generation prompt to be more detailed and specific for a diffusion model.

Add details about:
- Specific breed characteristics if mentioned
- Fur texture and patterns
- Eye color and expression
- Pose and environment
- Lighting and artistic style

Keep it under 75 words. Focus on visual details. Return ONLY the enhanced prompt, nothing else."#,
    temperature: 0.7,
    max_output_tokens: 256,
};

/// Where the prompt sent to the image service came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrichment {
    Model,
    Template,
}

impl Enrichment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Enrichment::Model => "model",
            Enrichment::Template => "template",
        }
    }
}

pub struct ImageGenerationAgent {
    model: ModelHandle,
    image: ImageHandle,
    width: u32,
    height: u32,
}

impl ImageGenerationAgent {
    pub fn new(model: ModelHandle, image: ImageHandle, width: u32, height: u32) -> Self {
        Self {
            model,
            image,
            width,
            height,
        }
    }

    /// Ask the model for a richer prompt, falling back to a fixed template
    async fn enhance_prompt(&self, prompt: &str) -> (String, Enrichment) {
        match self.model.generate(&ENRICHMENT.request(prompt)).await {
            Ok(text) if !text.trim().is_empty() => {
                let mut enhanced = text.trim().to_string();
                if !enhanced.to_lowercase().contains("cat") {
                    enhanced = format!("cat, {enhanced}");
                }
                (format!("{enhanced}, {QUALITY_MODIFIERS}"), Enrichment::Model)
            }
            Ok(_) => {
                tracing::warn!("prompt enrichment returned nothing, using template");
                (template_prompt(prompt), Enrichment::Template)
            }
            Err(e) => {
                tracing::warn!(error = %e, "prompt enrichment failed, using template");
                (template_prompt(prompt), Enrichment::Template)
            }
        }
    }

    async fn synthesize(&self, enhanced: &str) -> Result<String, RemoteError> {
        let config = ImageGenConfig::new(enhanced).with_size(self.width, self.height);
        let image = self.image.generate(&config).await?;
        image
            .to_data_url()
            .map_err(|e| RemoteError::Upstream(e.to_string()))
    }
}

pub fn template_prompt(prompt: &str) -> String {
    format!("beautiful cat, {}, {QUALITY_MODIFIERS}", prompt.trim())
}

#[async_trait]
impl Agent for ImageGenerationAgent {
    async fn process(&self, input: &str) -> AgentResult {
        if is_blank(input) {
            return AgentResult::ok(
                self.name(),
                payload([
                    ("prompt", json!(input)),
                    ("enhanced_prompt", Value::Null),
                    ("image_url", Value::Null),
                    ("message", json!("No prompt provided")),
                    ("notice", empty_notice()),
                ]),
            );
        }

        let (enhanced, enrichment) = self.enhance_prompt(input).await;
        tracing::info!(enrichment = enrichment.as_str(), prompt = %enhanced, "generating image");

        match self.synthesize(&enhanced).await {
            Ok(data_url) => AgentResult::ok(
                self.name(),
                payload([
                    ("prompt", json!(input)),
                    ("enhanced_prompt", json!(enhanced)),
                    ("image_url", json!(data_url)),
                    ("message", json!("Image generated successfully!")),
                    ("enrichment", json!(enrichment.as_str())),
                ]),
            ),
            Err(e) => {
                tracing::error!(agent = self.name(), error = %e, "image synthesis failed");
                AgentResult::error(self.name(), e.kind(), e.user_message())
                    .with_field("prompt", input)
                    .with_field("enhanced_prompt", enhanced)
                    .with_field("image_url", Value::Null)
                    .with_field("message", e.user_message())
                    .with_field("enrichment", enrichment.as_str())
            }
        }
    }

    fn kind(&self) -> AgentKind {
        AgentKind::ImageGenerator
    }

    fn capabilities(&self) -> &str {
        "Enriches a cat image prompt and renders it through the hosted image service"
    }

    fn primary_output(&self) -> &'static str {
        "image_url"
    }
}
