// Video Generation - placeholder until a video backend is wired in

use super::{Agent, empty_notice, is_blank};
use crate::orchestration::types::{AgentKind, AgentResult, payload};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;

pub const PLACEHOLDER_MESSAGE: &str = "Video generation coming soon! Currently using placeholder.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    #[default]
    Mp4,
    Gif,
}

impl VideoFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Gif => "gif",
        }
    }
}

impl FromStr for VideoFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mp4" => Ok(VideoFormat::Mp4),
            "gif" => Ok(VideoFormat::Gif),
            other => Err(format!("unsupported video format '{other}' (expected mp4 or gif)")),
        }
    }
}

/// Reports what it would animate without calling any service
#[derive(Default)]
pub struct VideoGenerationAgent {}

impl VideoGenerationAgent {
    pub fn new() -> Self {
        Self {}
    }

    pub fn generate(&self, image_ref: &str, format: VideoFormat) -> AgentResult {
        let fields = payload([
            ("input_image", json!(image_ref)),
            ("format", json!(format.as_str())),
            ("video_url", Value::Null),
        ]);

        if is_blank(image_ref) {
            return AgentResult::ok(self.name(), fields)
                .with_field("message", "No image provided")
                .with_field("notice", empty_notice());
        }

        AgentResult::skipped(self.name(), fields).with_field("message", PLACEHOLDER_MESSAGE)
    }
}

#[async_trait]
impl Agent for VideoGenerationAgent {
    async fn process(&self, input: &str) -> AgentResult {
        self.generate(input, VideoFormat::default())
    }

    fn kind(&self) -> AgentKind {
        AgentKind::VideoGenerator
    }

    fn capabilities(&self) -> &str {
        "Placeholder for turning a still cat image into an mp4 or gif"
    }

    fn primary_output(&self) -> &'static str {
        "video_url"
    }
}
