// Response shapes returned to callers of the orchestrator

use super::moderation::ModerationReport;
use super::pipeline::{PipelineRun, RunStatus};
use super::types::{AgentKind, AgentResult, AgentStatus, ErrorKind};
use serde::Serialize;
use serde_json::Value;

/// Result of single-agent mode
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SingleResponse {
    Unknown {
        error: String,
        available_agents: Vec<String>,
    },
    Processed(AgentResult),
}

impl From<AgentResult> for SingleResponse {
    fn from(result: AgentResult) -> Self {
        match result.error_info() {
            Some(info) if info.kind == ErrorKind::UnknownAgent => SingleResponse::Unknown {
                error: info.message.clone(),
                available_agents: result
                    .field("available_agents")
                    .and_then(Value::as_array)
                    .map(|names| {
                        names
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            _ => SingleResponse::Processed(result),
        }
    }
}

fn message_of(result: &AgentResult) -> Option<String> {
    result
        .text("message")
        .map(str::to_string)
        .or_else(|| result.error_info().map(|e| e.message.clone()))
}

#[derive(Debug, Clone, Serialize)]
pub struct BreedMatchResponse {
    pub agent: String,
    pub input: String,
    pub breed_analysis: String,
    pub status: &'static str,
}

impl BreedMatchResponse {
    pub fn from_result(input: &str, result: &AgentResult) -> Self {
        let breed_analysis = result
            .text("breed_analysis")
            .map(str::to_string)
            .or_else(|| message_of(result))
            .unwrap_or_default();

        Self {
            agent: result.agent_name().to_string(),
            input: input.to_string(),
            breed_analysis,
            status: if result.is_error() { "error" } else { "analyzed" },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageResponse {
    pub agent: String,
    pub prompt: String,
    pub enhanced_prompt: Option<String>,
    pub image_url: Option<String>,
    pub message: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<String>,
}

impl ImageResponse {
    pub fn from_result(prompt: &str, result: &AgentResult) -> Self {
        Self {
            agent: result.agent_name().to_string(),
            prompt: prompt.to_string(),
            enhanced_prompt: result.text("enhanced_prompt").map(str::to_string),
            image_url: result.text("image_url").map(str::to_string),
            message: message_of(result).unwrap_or_default(),
            status: if result.is_error() { "error" } else { "success" },
            enrichment: result.text("enrichment").map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoResponse {
    pub agent: String,
    pub input_image: String,
    pub format: String,
    pub video_url: Option<String>,
    pub message: String,
    pub status: &'static str,
}

impl VideoResponse {
    pub fn from_result(result: &AgentResult) -> Self {
        Self {
            agent: result.agent_name().to_string(),
            input_image: result.text("input_image").unwrap_or_default().to_string(),
            format: result.text("format").unwrap_or_default().to_string(),
            video_url: result.text("video_url").map(str::to_string),
            message: message_of(result).unwrap_or_default(),
            status: match result.status() {
                AgentStatus::Error => "error",
                AgentStatus::Ok | AgentStatus::Skipped => "placeholder",
            },
        }
    }
}

/// Outcome of the moderate, match, generate flow
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DreamCatResponse {
    Rejected {
        error: String,
        moderation: Option<ModerationReport>,
    },
    Generated {
        image_url: Option<String>,
        prompt: String,
        enhanced_prompt: Option<String>,
        breed_match: Option<String>,
        moderation: Option<ModerationReport>,
        status: &'static str,
        message: String,
    },
}

impl DreamCatResponse {
    pub fn from_run(run: PipelineRun) -> Self {
        if run.status == RunStatus::Halted {
            return DreamCatResponse::Rejected {
                error: "Content not appropriate".to_string(),
                moderation: run.moderation,
            };
        }

        let find = |kind: AgentKind| run.stages.iter().find(|r| r.agent_name() == kind.agent_name());

        let breed_match = find(AgentKind::BreedMatcher).map(|r| {
            r.text("breed_analysis")
                .unwrap_or("Could not determine breed")
                .to_string()
        });

        let image = find(AgentKind::ImageGenerator).map(|r| ImageResponse::from_result(&run.input, r));

        match image {
            Some(image) => DreamCatResponse::Generated {
                image_url: image.image_url,
                prompt: run.input.clone(),
                enhanced_prompt: image.enhanced_prompt,
                breed_match,
                moderation: run.moderation.clone(),
                status: image.status,
                message: image.message,
            },
            None => DreamCatResponse::Generated {
                image_url: None,
                prompt: run.input.clone(),
                enhanced_prompt: None,
                breed_match,
                moderation: run.moderation.clone(),
                status: "error",
                message: "Image generation did not run".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub capabilities: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentsInfo {
    pub agents: Vec<AgentInfo>,
    pub pipeline_mode: String,
    pub single_mode: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::types::payload;
    use serde_json::json;

    #[test]
    fn test_unknown_agent_shape() {
        let result = AgentResult::error("Orchestrator", ErrorKind::UnknownAgent, "Unknown agent type: bogus")
            .with_field("available_agents", json!(["moderator", "translator"]));

        let value = serde_json::to_value(SingleResponse::from(result)).unwrap();
        assert_eq!(
            value,
            json!({"error": "Unknown agent type: bogus", "available_agents": ["moderator", "translator"]})
        );
    }

    #[test]
    fn test_processed_passes_through() {
        let result = AgentResult::ok("CatTranslatorAgent", payload([("cat_translation", json!("mrrp"))]));
        let value = serde_json::to_value(SingleResponse::from(result)).unwrap();
        assert_eq!(value["payload"]["cat_translation"], "mrrp");
    }

    #[test]
    fn test_breed_response_on_error() {
        let result = AgentResult::error("BreedMatchAgent", ErrorKind::UpstreamTimeout, "try again");
        let response = BreedMatchResponse::from_result("tabby", &result);
        assert_eq!(response.status, "error");
        assert_eq!(response.breed_analysis, "try again");
    }

    #[test]
    fn test_video_response_is_placeholder() {
        let result = AgentResult::skipped(
            "VideoGenerationAgent",
            payload([
                ("input_image", json!("cat.png")),
                ("format", json!("gif")),
                ("video_url", Value::Null),
                ("message", json!("soon")),
            ]),
        );
        let value = serde_json::to_value(VideoResponse::from_result(&result)).unwrap();
        assert_eq!(value["status"], "placeholder");
        assert_eq!(value["video_url"], Value::Null);
        assert_eq!(value["format"], "gif");
    }
}
