// Agent implementations

mod breed_matcher;
mod image;
mod moderator;
mod translator;
mod video;

pub use breed_matcher::BreedMatchAgent;
pub use image::ImageGenerationAgent;
pub use moderator::ContentModeratorAgent;
pub use translator::CatTranslatorAgent;
pub use video::{VideoFormat, VideoGenerationAgent};

use super::remote::{GenerationRequest, RemoteError};
use super::types::{AgentKind, AgentResult, ErrorKind};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Capability contract shared by all agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Turn one input into one result; failures are reported in the result, never raised
    async fn process(&self, input: &str) -> AgentResult;

    /// Get the agent kind
    fn kind(&self) -> AgentKind;

    /// Name reported in results
    fn name(&self) -> &'static str {
        self.kind().agent_name()
    }

    /// Get the agent's capabilities description
    fn capabilities(&self) -> &str;

    /// Payload field holding the agent's main output
    fn primary_output(&self) -> &'static str;
}

/// Registry for looking agents up by kind
#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<AgentKind, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        self.agents.insert(agent.kind(), agent);
    }

    pub fn get(&self, kind: AgentKind) -> Option<Arc<dyn Agent>> {
        self.agents.get(&kind).cloned()
    }

    /// Registered agents in declaration order
    pub fn agents(&self) -> Vec<Arc<dyn Agent>> {
        AgentKind::ALL.iter().filter_map(|k| self.get(*k)).collect()
    }
}

/// Fixed instruction and sampling settings of a text agent
#[derive(Debug, Clone, Copy)]
pub(crate) struct Persona {
    pub instruction: &'static str,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Persona {
    pub(crate) fn request(&self, input: &str) -> GenerationRequest {
        GenerationRequest {
            system_instruction: self.instruction.to_string(),
            user_input: input.to_string(),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

pub(crate) fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

/// Marker added to every blank-input sentinel payload
pub(crate) fn empty_notice() -> Value {
    Value::String(ErrorKind::EmptyInput.as_str().to_string())
}

/// Convert a remote failure into an error result, logging the detail
pub(crate) fn remote_failure(kind: AgentKind, err: &RemoteError) -> AgentResult {
    tracing::error!(agent = kind.agent_name(), error = %err, "remote call failed");
    AgentResult::error(kind.agent_name(), err.kind(), err.user_message())
}
