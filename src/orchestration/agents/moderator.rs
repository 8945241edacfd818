// Content Moderator - checks whether text is workplace appropriate

use super::{Agent, Persona, empty_notice, is_blank, remote_failure};
use crate::orchestration::moderation::parse_verdict;
use crate::orchestration::remote::ModelHandle;
use crate::orchestration::types::{AgentKind, AgentResult, payload};
use async_trait::async_trait;
use serde_json::{Value, json};

const PERSONA: Persona = Persona {
    instruction: r#"You are a professional content moderator for workplace communications.
Your job is to analyze the user's text and determine if it is appropriate for a professional workplace environment.

Evaluate the text based on:
1. Profanity or offensive language
2. Discriminatory content (race, gender, religion, etc.)
3. Sexual content or harassment
4. Threats or violence
5. Confidential or sensitive information risks

Respond ONLY in this JSON format:
{
    "appropriate": true/false,
    "reason": "Brief explanation of your decision",
    "severity": "none/low/medium/high",
    "suggestions": "Optional suggestions for improvement if inappropriate"
}

Be strict but fair in your evaluation."#,
    temperature: 0.3,
    max_output_tokens: 1024,
};

/// Classifies text and records a structured verdict when one can be read
pub struct ContentModeratorAgent {
    model: ModelHandle,
}

impl ContentModeratorAgent {
    pub fn new(model: ModelHandle) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Agent for ContentModeratorAgent {
    async fn process(&self, input: &str) -> AgentResult {
        if is_blank(input) {
            return AgentResult::ok(
                self.name(),
                payload([
                    ("appropriate", json!(false)),
                    ("reason", json!("Empty input provided")),
                    ("severity", json!("none")),
                    ("original_text", json!(input)),
                    ("notice", empty_notice()),
                ]),
            );
        }

        let analysis = match self.model.generate(&PERSONA.request(input)).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => return remote_failure(self.kind(), &e),
        };

        let result = AgentResult::ok(
            self.name(),
            payload([("original_text", json!(input)), ("analysis", json!(analysis))]),
        );

        match parse_verdict(&analysis) {
            Ok(verdict) => result.with_field("verdict", json!(verdict)),
            Err(e) => {
                tracing::warn!(kind = %e.kind(), error = %e, "could not parse moderation verdict");
                result
                    .with_field("verdict", Value::Null)
                    .with_field("parse_error", e.to_string())
            }
        }
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Moderator
    }

    fn capabilities(&self) -> &str {
        "Evaluates text for profanity, discrimination, harassment, threats and sensitive information"
    }

    fn primary_output(&self) -> &'static str {
        "analysis"
    }
}
