// Breed Matcher - identifies likely cat breeds from a description

use super::{Agent, Persona, empty_notice, is_blank, remote_failure};
use crate::orchestration::remote::ModelHandle;
use crate::orchestration::types::{AgentKind, AgentResult, payload};
use async_trait::async_trait;
use serde_json::json;

const PERSONA: Persona = Persona {
    instruction: r#"You are an expert cat breed identifier and feline geneticist! 🐱

Your job is to analyze the user's description and identify the most likely cat breed(s).

Be knowledgeable about:
- Recognized cat breeds (Persian, Maine Coon, Siamese, British Shorthair, etc.)
- Mixed breeds and common combinations
- Physical characteristics (coat, eyes, size, build)
- Personality traits associated with breeds

Format your response as:
**Breed**: [Name]
**Confidence**: [High/Medium/Low]
**Match Reasons**: [Why this breed matches]
**Description**: [Brief breed description]
**Personality**: [Typical temperament]
**Care Notes**: [Special care requirements]

Be friendly and informative!"#,
    temperature: 0.4,
    max_output_tokens: 2048,
};

pub struct BreedMatchAgent {
    model: ModelHandle,
}

impl BreedMatchAgent {
    pub fn new(model: ModelHandle) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Agent for BreedMatchAgent {
    async fn process(&self, input: &str) -> AgentResult {
        if is_blank(input) {
            return AgentResult::ok(
                self.name(),
                payload([
                    ("input", json!(input)),
                    ("breed", json!("Unknown")),
                    ("confidence", json!("low")),
                    ("breed_analysis", json!("No description provided")),
                    ("notice", empty_notice()),
                ]),
            );
        }

        match self.model.generate(&PERSONA.request(input)).await {
            Ok(text) => AgentResult::ok(
                self.name(),
                payload([("input", json!(input)), ("breed_analysis", json!(text.trim()))]),
            ),
            Err(e) => remote_failure(self.kind(), &e).with_field("input", input),
        }
    }

    fn kind(&self) -> AgentKind {
        AgentKind::BreedMatcher
    }

    fn capabilities(&self) -> &str {
        "Matches a description of a cat to likely breeds with confidence and care notes"
    }

    fn primary_output(&self) -> &'static str {
        "breed_analysis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::remote::{DEFAULT_TIMEOUT, RemoteError};
    use crate::orchestration::testing::{EchoModel, FailingModel};
    use crate::orchestration::types::ErrorKind;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_blank_description() {
        let model = Arc::new(EchoModel::new(""));
        let agent = BreedMatchAgent::new(ModelHandle::new(model.clone(), DEFAULT_TIMEOUT));

        let result = agent.process(" ").await;
        assert_eq!(result.text("breed"), Some("Unknown"));
        assert_eq!(result.text("confidence"), Some("low"));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_analysis_payload() {
        let model = Arc::new(EchoModel::new(" => **Breed**: Maine Coon"));
        let agent = BreedMatchAgent::new(ModelHandle::new(model, DEFAULT_TIMEOUT));

        let result = agent.process("huge fluffy tabby").await;
        assert_eq!(result.text("breed_analysis"), Some("huge fluffy tabby => **Breed**: Maine Coon"));
        assert_eq!(result.text("input"), Some("huge fluffy tabby"));
    }

    #[tokio::test]
    async fn test_failure_keeps_input() {
        let model = Arc::new(FailingModel::new(RemoteError::Upstream("boom".into())));
        let agent = BreedMatchAgent::new(ModelHandle::new(model.clone(), DEFAULT_TIMEOUT));

        let result = agent.process("tiny black cat").await;
        assert_eq!(result.error_kind(), Some(ErrorKind::UpstreamError));
        assert_eq!(result.text("input"), Some("tiny black cat"));
        assert_eq!(model.calls(), 1);
    }
}
