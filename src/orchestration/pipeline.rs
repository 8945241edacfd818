// Pipeline engine - ordered, gated execution of agents

use super::agents::Agent;
use super::moderation::ModerationReport;
use super::types::AgentResult;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;

/// Whether a pipeline may proceed to the next stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Continue,
    Halt,
}

/// Predicate over the results accumulated so far
pub type Gate = Arc<dyn Fn(&[AgentResult]) -> GateDecision + Send + Sync>;

/// One step of a pipeline
#[derive(Clone)]
pub struct Stage {
    agent: Arc<dyn Agent>,
    gate: Option<Gate>,
    terminal: bool,
    chained: bool,
}

impl Stage {
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self {
            agent,
            gate: None,
            terminal: false,
            chained: false,
        }
    }

    /// Evaluate `gate` before running this stage
    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Take the pipeline's final output from this stage
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Feed the previous stage's primary output in place of the pipeline input
    pub fn chained(mut self) -> Self {
        self.chained = true;
        self
    }
}

/// Ordered sequence of stages, fixed once built
#[derive(Clone)]
pub struct PipelineSpec {
    name: String,
    stages: Vec<Stage>,
}

impl PipelineSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the stage marked terminal, otherwise the last stage
    fn terminal_index(&self) -> Option<usize> {
        self.stages
            .iter()
            .position(|s| s.terminal)
            .or_else(|| self.stages.len().checked_sub(1))
    }

    /// Run every stage in order against `input`
    pub async fn execute(&self, input: &str) -> PipelineRun {
        let terminal = self.terminal_index();
        let mut stages: Vec<AgentResult> = Vec::with_capacity(self.stages.len());
        let mut final_output = Value::Null;
        let mut halted = false;
        let mut last_output: Option<String> = None;

        for (index, stage) in self.stages.iter().enumerate() {
            if let Some(gate) = &stage.gate {
                if gate(stages.as_slice()) == GateDecision::Halt {
                    tracing::info!(pipeline = %self.name, stage = stage.agent.name(), "pipeline halted by gate");
                    halted = true;
                    break;
                }
            }

            let stage_input = if stage.chained {
                last_output.as_deref().unwrap_or(input)
            } else {
                input
            };

            tracing::info!(pipeline = %self.name, step = index + 1, agent = stage.agent.name(), "running stage");
            let result = stage.agent.process(stage_input).await;

            if result.is_error() {
                // Failures are recorded, not fatal
                tracing::warn!(
                    pipeline = %self.name,
                    agent = stage.agent.name(),
                    kind = ?result.error_kind(),
                    "stage failed"
                );
            }

            let primary = result.field(stage.agent.primary_output()).cloned();
            if result.is_ok() {
                if let Some(Value::String(text)) = &primary {
                    last_output = Some(text.clone());
                }
            }
            if Some(index) == terminal {
                final_output = primary.unwrap_or(Value::Null);
            }

            stages.push(result);
        }

        // Gating alone decides the status; stage errors stay in their results
        let status = if halted { RunStatus::Halted } else { RunStatus::Completed };

        PipelineRun {
            input: input.to_string(),
            stages,
            final_output,
            status,
            moderation: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Halted,
    Failed, // The run itself could not be carried out, never set from stage outcomes
}

/// Outcome of one pipeline invocation
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub input: String,
    pub stages: Vec<AgentResult>,
    pub final_output: Value,
    pub status: RunStatus,
    pub moderation: Option<ModerationReport>,
}

impl PipelineRun {
    /// Agent names in invocation order
    pub fn agent_names(&self) -> Vec<&str> {
        self.stages.iter().map(AgentResult::agent_name).collect()
    }
}

impl Serialize for PipelineRun {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Step<'a> {
            step: usize,
            agent: &'a str,
            result: &'a AgentResult,
        }

        #[derive(Serialize)]
        struct View<'a> {
            input: &'a str,
            pipeline: Vec<Step<'a>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            moderation: Option<&'a ModerationReport>,
            final_output: &'a Value,
            status: RunStatus,
        }

        View {
            input: &self.input,
            pipeline: self
                .stages
                .iter()
                .enumerate()
                .map(|(i, result)| Step {
                    step: i + 1,
                    agent: result.agent_name(),
                    result,
                })
                .collect(),
            moderation: self.moderation.as_ref(),
            final_output: &self.final_output,
            status: self.status,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::types::{AgentKind, ErrorKind, payload};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Upper-cases its input, or fails when told to
    struct Shout {
        kind: AgentKind,
        fail: bool,
        calls: AtomicUsize,
    }

    impl Shout {
        fn new(kind: AgentKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(kind: AgentKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Agent for Shout {
        async fn process(&self, input: &str) -> AgentResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return AgentResult::error(self.name(), ErrorKind::UpstreamError, "nope");
            }
            AgentResult::ok(self.name(), payload([("out", json!(input.to_uppercase()))]))
        }

        fn kind(&self) -> AgentKind {
            self.kind
        }

        fn capabilities(&self) -> &str {
            "shouts"
        }

        fn primary_output(&self) -> &'static str {
            "out"
        }
    }

    fn halt_always() -> Gate {
        Arc::new(|_: &[AgentResult]| GateDecision::Halt)
    }

    #[tokio::test]
    async fn test_final_output_from_last_stage() {
        let spec = PipelineSpec::new("t")
            .then(Stage::new(Shout::new(AgentKind::Moderator)))
            .then(Stage::new(Shout::new(AgentKind::Translator)));

        let run = spec.execute("meow").await;
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.agent_names(), vec!["ContentModeratorAgent", "CatTranslatorAgent"]);
        assert_eq!(run.final_output, json!("MEOW"));
    }

    #[tokio::test]
    async fn test_halted_stages_are_not_listed() {
        let third = Shout::new(AgentKind::BreedMatcher);
        let spec = PipelineSpec::new("t")
            .then(Stage::new(Shout::new(AgentKind::Moderator)))
            .then(Stage::new(Shout::new(AgentKind::Translator)).gated(halt_always()))
            .then(Stage::new(third.clone()));

        let run = spec.execute("meow").await;
        assert_eq!(run.status, RunStatus::Halted);
        assert_eq!(run.stages.len(), 1);
        assert_eq!(run.final_output, Value::Null);
        assert_eq!(third.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_gate_sees_prior_results() {
        let gate: Gate = Arc::new(|results: &[AgentResult]| {
            if results.iter().any(AgentResult::is_error) {
                GateDecision::Halt
            } else {
                GateDecision::Continue
            }
        });

        let spec = PipelineSpec::new("t")
            .then(Stage::new(Shout::failing(AgentKind::Moderator)))
            .then(Stage::new(Shout::new(AgentKind::Translator)).gated(gate));

        let run = spec.execute("x").await;
        assert_eq!(run.status, RunStatus::Halted);
        assert_eq!(run.stages.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_stage_does_not_stop_run() {
        let spec = PipelineSpec::new("t")
            .then(Stage::new(Shout::failing(AgentKind::Moderator)))
            .then(Stage::new(Shout::new(AgentKind::Translator)));

        let run = spec.execute("purr").await;
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.stages.len(), 2);
        assert!(run.stages[0].is_error());
        assert_eq!(run.final_output, json!("PURR"));
    }

    #[tokio::test]
    async fn test_all_stages_failing_still_completes() {
        let spec = PipelineSpec::new("t")
            .then(Stage::new(Shout::failing(AgentKind::Moderator)))
            .then(Stage::new(Shout::failing(AgentKind::Translator)));

        let run = spec.execute("purr").await;
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.stages.len(), 2);
        assert!(run.stages.iter().all(AgentResult::is_error));
        assert_eq!(run.final_output, Value::Null);
    }

    #[tokio::test]
    async fn test_explicit_terminal_stage() {
        let spec = PipelineSpec::new("t")
            .then(Stage::new(Shout::new(AgentKind::Moderator)).terminal())
            .then(Stage::new(Shout::failing(AgentKind::Translator)));

        let run = spec.execute("hiss").await;
        assert_eq!(run.final_output, json!("HISS"));
    }

    #[tokio::test]
    async fn test_chained_stage_receives_previous_output() {
        struct Suffix;

        #[async_trait]
        impl Agent for Suffix {
            async fn process(&self, input: &str) -> AgentResult {
                AgentResult::ok(self.name(), payload([("out", json!(format!("{input}!")))]))
            }
            fn kind(&self) -> AgentKind {
                AgentKind::Translator
            }
            fn capabilities(&self) -> &str {
                "suffix"
            }
            fn primary_output(&self) -> &'static str {
                "out"
            }
        }

        let spec = PipelineSpec::new("t")
            .then(Stage::new(Shout::new(AgentKind::Moderator)))
            .then(Stage::new(Arc::new(Suffix)).chained());

        let run = spec.execute("mrrp").await;
        assert_eq!(run.final_output, json!("MRRP!"));
    }

    #[tokio::test]
    async fn test_serialized_run_shape() {
        let spec = PipelineSpec::new("t").then(Stage::new(Shout::new(AgentKind::Translator)));
        let value = serde_json::to_value(spec.execute("hi").await).unwrap();

        assert_eq!(value["input"], "hi");
        assert_eq!(value["pipeline"][0]["step"], 1);
        assert_eq!(value["pipeline"][0]["agent"], "CatTranslatorAgent");
        assert_eq!(value["pipeline"][0]["result"]["payload"]["out"], "HI");
        assert_eq!(value["final_output"], "HI");
        assert_eq!(value["status"], "completed");
        assert!(value.get("moderation").is_none());
    }

    #[tokio::test]
    async fn test_empty_spec_completes() {
        let run = PipelineSpec::new("empty").execute("x").await;
        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.stages.is_empty());
    }
}
