// Orchestrator - runs agents alone or as gated pipelines

use super::agents::{
    Agent, AgentRegistry, BreedMatchAgent, CatTranslatorAgent, ContentModeratorAgent, ImageGenerationAgent,
    VideoFormat, VideoGenerationAgent,
};
use super::moderation::{GatePolicy, ModerationReport, moderation_gate};
use super::pipeline::{PipelineRun, PipelineSpec, Stage};
use super::remote::{DEFAULT_TIMEOUT, ImageHandle, ModelHandle, TextModel};
use super::responses::{AgentInfo, AgentsInfo, BreedMatchResponse, DreamCatResponse, ImageResponse, VideoResponse};
use super::types::{AgentKind, AgentResult, ErrorKind};
use crate::config::{ConfigError, Settings};
use imagent::{ImageGenerator, PollinationsGenerator};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Agents reachable through single-agent mode
pub const SINGLE_MODE_AGENTS: [AgentKind; 2] = [AgentKind::Moderator, AgentKind::Translator];

const ORCHESTRATOR_NAME: &str = "MultiAgentOrchestrator";

/// Prompt used when a dream cat is requested without one
pub const DEFAULT_DREAM_PROMPT: &str = "a beautiful cat";

/// Runtime knobs shared by every agent
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    pub timeout: Duration,
    pub retries: u32,
    pub gate_policy: GatePolicy,
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
            gate_policy: GatePolicy::default(),
            image_width: 1024,
            image_height: 1024,
        }
    }
}

impl From<&Settings> for OrchestratorOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            timeout: settings.timeout(),
            retries: settings.retries,
            gate_policy: settings.gate_policy(),
            image_width: settings.image.width,
            image_height: settings.image.height,
        }
    }
}

/// The run was abandoned before it finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pipeline run was cancelled")]
pub struct Cancelled;

/// Entry point for every agent operation.
///
/// Holds only immutable configuration, so one instance can serve concurrent requests.
pub struct Orchestrator {
    registry: AgentRegistry,
    breed_matcher: Arc<dyn Agent>,
    image_generator: Arc<dyn Agent>,
    video_generator: Arc<VideoGenerationAgent>,
    translation: PipelineSpec,
    moderated_translation: PipelineSpec,
    dream_cat: PipelineSpec,
}

impl Orchestrator {
    /// Build the Gemini and Pollinations clients from validated settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let mut gemini_config = gemini::GeminiConfig::new(
            settings.gemini.api_key.clone().unwrap_or_default(),
            settings.gemini.model.clone(),
        );
        gemini_config.endpoint = settings.gemini.endpoint.clone();
        gemini_config.timeout = settings.timeout();

        let text = gemini::GeminiClient::new(gemini_config).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let image = PollinationsGenerator::new(&settings.image.endpoint, settings.timeout())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        tracing::info!(model = %settings.gemini.model, "orchestrator configured");

        Ok(Self::with_clients(
            Arc::new(text),
            Arc::new(image),
            OrchestratorOptions::from(settings),
        ))
    }

    /// Create orchestrator over arbitrary remote clients
    pub fn with_clients(
        text: Arc<dyn TextModel>,
        image: Arc<dyn ImageGenerator>,
        options: OrchestratorOptions,
    ) -> Self {
        let model = ModelHandle::new(text, options.timeout).with_retries(options.retries);
        let image = ImageHandle::new(image, options.timeout);

        let moderator: Arc<dyn Agent> = Arc::new(ContentModeratorAgent::new(model.clone()));
        let translator: Arc<dyn Agent> = Arc::new(CatTranslatorAgent::new(model.clone()));
        let breed_matcher: Arc<dyn Agent> = Arc::new(BreedMatchAgent::new(model.clone()));
        let image_generator: Arc<dyn Agent> = Arc::new(ImageGenerationAgent::new(
            model,
            image,
            options.image_width,
            options.image_height,
        ));
        let video_generator = Arc::new(VideoGenerationAgent::new());

        let mut registry = AgentRegistry::new();
        for agent in [
            moderator.clone(),
            translator.clone(),
            breed_matcher.clone(),
            image_generator.clone(),
            video_generator.clone() as Arc<dyn Agent>,
        ] {
            registry.register(agent);
        }

        let translation = PipelineSpec::new("translation").then(Stage::new(translator.clone()).terminal());

        let moderated_translation = PipelineSpec::new("moderated-translation")
            .then(Stage::new(moderator.clone()))
            .then(
                Stage::new(translator)
                    .gated(moderation_gate(options.gate_policy))
                    .terminal(),
            );

        // Image requests are always moderated strictly
        let dream_cat = PipelineSpec::new("dream-cat")
            .then(Stage::new(moderator))
            .then(Stage::new(breed_matcher.clone()).gated(moderation_gate(GatePolicy::Strict)))
            .then(
                Stage::new(image_generator.clone())
                    .gated(moderation_gate(GatePolicy::Strict))
                    .terminal(),
            );

        Self {
            registry,
            breed_matcher,
            image_generator,
            video_generator,
            translation,
            moderated_translation,
            dream_cat,
        }
    }

    /// Moderate (unless skipped) and translate
    pub async fn run_pipeline(&self, text: &str, skip_moderation: bool) -> PipelineRun {
        let spec = if skip_moderation {
            &self.translation
        } else {
            &self.moderated_translation
        };

        let mut run = spec.execute(text).await;
        run.moderation = ModerationReport::from_stages(&run.stages);
        tracing::info!(pipeline = spec.name(), status = ?run.status, stages = run.stages.len(), "pipeline finished");
        run
    }

    /// Like [`run_pipeline`](Self::run_pipeline), abandoning in-flight calls once `cancel` resolves
    pub async fn run_pipeline_until<F>(&self, text: &str, skip_moderation: bool, cancel: F) -> Result<PipelineRun, Cancelled>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            run = self.run_pipeline(text, skip_moderation) => Ok(run),
            _ = cancel => {
                tracing::warn!("pipeline cancelled");
                Err(Cancelled)
            }
        }
    }

    /// Process text with one agent, addressed by its short type name
    pub async fn run_single(&self, text: &str, agent_type: &str) -> AgentResult {
        let agent = AgentKind::from_name(agent_type)
            .filter(|kind| SINGLE_MODE_AGENTS.contains(kind))
            .and_then(|kind| self.registry.get(kind));

        match agent {
            Some(agent) => agent.process(text).await,
            None => {
                tracing::warn!(agent_type, "unknown agent requested");
                let available: Vec<&str> = SINGLE_MODE_AGENTS.iter().map(AgentKind::as_str).collect();
                AgentResult::error(
                    ORCHESTRATOR_NAME,
                    ErrorKind::UnknownAgent,
                    format!("Unknown agent type: {agent_type}"),
                )
                .with_field("available_agents", available)
            }
        }
    }

    pub async fn match_breed(&self, description: &str) -> BreedMatchResponse {
        let result = self.breed_matcher.process(description).await;
        BreedMatchResponse::from_result(description, &result)
    }

    pub async fn generate_image(&self, prompt: &str) -> ImageResponse {
        let result = self.image_generator.process(prompt).await;
        ImageResponse::from_result(prompt, &result)
    }

    pub fn generate_video(&self, image_ref: &str, format: VideoFormat) -> VideoResponse {
        VideoResponse::from_result(&self.video_generator.generate(image_ref, format))
    }

    /// Moderate a prompt, match its breed, then render it
    pub async fn dream_cat(&self, prompt: &str) -> DreamCatResponse {
        let prompt = if prompt.trim().is_empty() {
            DEFAULT_DREAM_PROMPT
        } else {
            prompt
        };

        let mut run = self.dream_cat.execute(prompt).await;
        run.moderation = ModerationReport::from_stages(&run.stages);
        tracing::info!(status = ?run.status, "dream cat pipeline finished");
        DreamCatResponse::from_run(run)
    }

    pub fn agents_info(&self) -> AgentsInfo {
        AgentsInfo {
            agents: self
                .registry
                .agents()
                .iter()
                .map(|agent| AgentInfo {
                    name: agent.name().to_string(),
                    kind: agent.kind().as_str().to_string(),
                    description: agent.kind().description().to_string(),
                    capabilities: agent.capabilities().to_string(),
                })
                .collect(),
            pipeline_mode: "Sequential processing: moderation, then translation".to_string(),
            single_mode: format!(
                "Process with individual agents: {}",
                SINGLE_MODE_AGENTS.map(|k| k.as_str()).join(", ")
            ),
        }
    }
}
