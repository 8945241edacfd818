// Orchestration system - agents composed into gated pipelines

pub mod agents;
pub mod moderation;
pub mod orchestrator;
pub mod pipeline;
pub mod remote;
pub mod responses;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use agents::{Agent, AgentRegistry, VideoFormat};
pub use moderation::{GatePolicy, ModerationReport, ModerationVerdict, Severity, parse_verdict};
pub use orchestrator::{Cancelled, Orchestrator, OrchestratorOptions};
pub use pipeline::{Gate, GateDecision, PipelineRun, PipelineSpec, RunStatus, Stage};
pub use remote::{GenerationRequest, ImageHandle, ModelHandle, RemoteError, TextModel};
pub use types::*;
