// Moderation verdict parsing and the gate built on it

use super::pipeline::{Gate, GateDecision};
use super::types::{AgentKind, AgentResult, ErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl FromStr for Severity {
    type Err = VerdictParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Severity::None),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            other => Err(VerdictParseError::UnknownSeverity(other.to_string())),
        }
    }
}

/// Structured reading of the moderator's output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModerationVerdict {
    pub appropriate: bool,
    pub severity: Severity,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum VerdictParseError {
    #[error("no JSON object found in moderation output")]
    NoObject,

    #[error("invalid verdict JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("verdict has no boolean 'appropriate' field")]
    MissingAppropriate,

    #[error("unknown severity '{0}'")]
    UnknownSeverity(String),
}

impl VerdictParseError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ParseError
    }
}

/// Best-effort extraction of a verdict from free text.
///
/// Models often wrap the JSON in prose or a fenced code block, so only the
/// outermost `{...}` span is parsed.
pub fn parse_verdict(text: &str) -> Result<ModerationVerdict, VerdictParseError> {
    let start = text.find('{').ok_or(VerdictParseError::NoObject)?;
    let end = text.rfind('}').ok_or(VerdictParseError::NoObject)?;
    if end < start {
        return Err(VerdictParseError::NoObject);
    }

    let value: Value = serde_json::from_str(&text[start..=end])?;

    let appropriate = match value.get("appropriate") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => true,
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => false,
        _ => return Err(VerdictParseError::MissingAppropriate),
    };

    let severity = match value.get("severity") {
        None | Some(Value::Null) => Severity::None,
        Some(Value::String(s)) => s.parse()?,
        Some(other) => return Err(VerdictParseError::UnknownSeverity(other.to_string())),
    };

    let reason = value
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(ModerationVerdict {
        appropriate,
        severity,
        reason,
    })
}

/// How a parsed verdict affects later stages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatePolicy {
    /// Always continue; the verdict is informational
    #[default]
    Permissive,
    /// Halt when a parsed verdict marks the input inappropriate
    Strict,
}

/// Parsed verdict stored on a moderator result, if any
pub fn verdict_of(result: &AgentResult) -> Option<ModerationVerdict> {
    result
        .field("verdict")
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// Gate over the most recent moderator result.
///
/// A missing, failed or unparsable moderation never blocks.
pub fn moderation_gate(policy: GatePolicy) -> Gate {
    Arc::new(move |results: &[AgentResult]| {
        if policy == GatePolicy::Permissive {
            return GateDecision::Continue;
        }

        let verdict = results
            .iter()
            .rev()
            .find(|r| r.agent_name() == AgentKind::Moderator.agent_name())
            .and_then(verdict_of);

        match verdict {
            Some(v) if !v.appropriate => {
                tracing::info!(severity = ?v.severity, reason = %v.reason, "moderation gate halted pipeline");
                GateDecision::Halt
            }
            _ => GateDecision::Continue,
        }
    })
}

/// Moderation outcome surfaced alongside a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct ModerationReport {
    pub result: AgentResult,
    pub verdict: Option<ModerationVerdict>,
}

impl ModerationReport {
    pub fn from_stages(stages: &[AgentResult]) -> Option<Self> {
        stages
            .iter()
            .find(|r| r.agent_name() == AgentKind::Moderator.agent_name())
            .map(|result| Self {
                verdict: verdict_of(result),
                result: result.clone(),
            })
    }
}
