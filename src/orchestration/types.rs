// Core types for the agent system

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form result fields produced by an agent
pub type Payload = Map<String, Value>;

/// Agent capabilities
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Moderator,      // Workplace-appropriateness check
    Translator,     // Human text to cat language
    BreedMatcher,   // Breed identification from a description
    ImageGenerator, // Prompt enrichment plus image synthesis
    VideoGenerator, // Placeholder
}

impl AgentKind {
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Moderator,
        AgentKind::Translator,
        AgentKind::BreedMatcher,
        AgentKind::ImageGenerator,
        AgentKind::VideoGenerator,
    ];

    /// Short type name used to address the agent
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Moderator => "moderator",
            AgentKind::Translator => "translator",
            AgentKind::BreedMatcher => "breed_matcher",
            AgentKind::ImageGenerator => "image_generator",
            AgentKind::VideoGenerator => "video_generator",
        }
    }

    /// Name reported in results
    pub fn agent_name(&self) -> &'static str {
        match self {
            AgentKind::Moderator => "ContentModeratorAgent",
            AgentKind::Translator => "CatTranslatorAgent",
            AgentKind::BreedMatcher => "BreedMatchAgent",
            AgentKind::ImageGenerator => "ImageGenerationAgent",
            AgentKind::VideoGenerator => "VideoGenerationAgent",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AgentKind::Moderator => "Checks if text is workplace appropriate",
            AgentKind::Translator => "Converts text to cat language (meows)",
            AgentKind::BreedMatcher => "Identifies likely cat breeds from a description",
            AgentKind::ImageGenerator => "Generates cat images from a text prompt",
            AgentKind::VideoGenerator => "Animates cat images (not yet available)",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

/// Outcome of a single agent invocation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Ok,
    Error,
    Skipped, // Capability not available, nothing was attempted
}

/// Classified failure kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    UpstreamTimeout,
    UpstreamError,
    UnknownAgent,
    ParseError,
    ConfigError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => "EmptyInput",
            ErrorKind::UpstreamTimeout => "UpstreamTimeout",
            ErrorKind::UpstreamError => "UpstreamError",
            ErrorKind::UnknownAgent => "UnknownAgent",
            ErrorKind::ParseError => "ParseError",
            ErrorKind::ConfigError => "ConfigError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

/// Result envelope produced by exactly one agent invocation.
///
/// Fields are read-only once built; `error` is present iff `status` is `Error`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentResult {
    agent_name: String,
    status: AgentStatus,
    payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorInfo>,
}

impl AgentResult {
    pub fn ok(agent_name: impl Into<String>, payload: Payload) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: AgentStatus::Ok,
            payload,
            error: None,
        }
    }

    pub fn skipped(agent_name: impl Into<String>, payload: Payload) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: AgentStatus::Skipped,
            payload,
            error: None,
        }
    }

    pub fn error(agent_name: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: AgentStatus::Error,
            payload: Payload::new(),
            error: Some(ErrorInfo {
                kind,
                message: message.into(),
            }),
        }
    }

    /// Attach a payload field before handing the result out
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn error_info(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    pub fn is_ok(&self) -> bool {
        self.status == AgentStatus::Ok
    }

    pub fn is_error(&self) -> bool {
        self.status == AgentStatus::Error
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// String payload field, if present and a string
    pub fn text(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

/// Build a payload from key/value pairs
pub fn payload<const N: usize>(fields: [(&str, Value); N]) -> Payload {
    fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
