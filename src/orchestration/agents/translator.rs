// Cat Translator - converts human text into cat language

use super::{Agent, Persona, empty_notice, is_blank, remote_failure};
use crate::orchestration::remote::ModelHandle;
use crate::orchestration::types::{AgentKind, AgentResult, payload};
use async_trait::async_trait;
use serde_json::json;

const EMPTY_TRANSLATION: &str = "Mrow? 😿 (Empty input detected)";

const PERSONA: Persona = Persona {
    instruction: r#"You are a creative cat language translator! 🐱

Your job is to convert the user's text into cat language using meows, purrs, and cat expressions.

Rules for translation:
1. Use variations of "meow", "mrow", "purr", "mrrp", "nya"
2. Match the emotion and tone of the original text
3. Use capitalization for emphasis (MEOW for shouting, meow for normal)
4. Add cat emojis for extra expression (😺, 😸, 😹, 😻, 😼, 😽, 😾, 😿, 🙀)
5. Preserve the general length and structure
6. Make it fun and playful!

Examples:
- "Hello, how are you?" → "Meow meow, mrow mrow? 😺"
- "I'm so excited!" → "MEOW MEOW MEOW! 😻"
- "I'm sad today" → "mrow... purr... 😿"
- "Thank you very much" → "Mrrp mrrp purr purr 😸"

Reply with the translation only."#,
    temperature: 0.9,
    max_output_tokens: 2048,
};

pub struct CatTranslatorAgent {
    model: ModelHandle,
}

impl CatTranslatorAgent {
    pub fn new(model: ModelHandle) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Agent for CatTranslatorAgent {
    async fn process(&self, input: &str) -> AgentResult {
        if is_blank(input) {
            return AgentResult::ok(
                self.name(),
                payload([
                    ("original_text", json!(input)),
                    ("cat_translation", json!(EMPTY_TRANSLATION)),
                    ("notice", empty_notice()),
                ]),
            );
        }

        match self.model.generate(&PERSONA.request(input)).await {
            Ok(text) => AgentResult::ok(
                self.name(),
                payload([
                    ("original_text", json!(input)),
                    ("cat_translation", json!(text.trim())),
                ]),
            ),
            Err(e) => remote_failure(self.kind(), &e),
        }
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Translator
    }

    fn capabilities(&self) -> &str {
        "Translates text into meows, purrs and cat emojis while keeping its tone"
    }

    fn primary_output(&self) -> &'static str {
        "cat_translation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::remote::DEFAULT_TIMEOUT;
    use crate::orchestration::testing::{EchoModel, HangingModel};
    use crate::orchestration::types::ErrorKind;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_blank_input_makes_no_call() {
        let model = Arc::new(EchoModel::new(" 😺"));
        let agent = CatTranslatorAgent::new(ModelHandle::new(model.clone(), DEFAULT_TIMEOUT));

        let first = agent.process("").await;
        let second = agent.process("\n").await;
        assert_eq!(first.text("cat_translation"), Some(EMPTY_TRANSLATION));
        assert_eq!(first.payload()["cat_translation"], second.payload()["cat_translation"]);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_translation_payload() {
        let model = Arc::new(EchoModel::new(" 😺\n"));
        let agent = CatTranslatorAgent::new(ModelHandle::new(model.clone(), DEFAULT_TIMEOUT));

        let result = agent.process("Hello").await;
        assert!(result.is_ok());
        assert_eq!(result.text("cat_translation"), Some("Hello 😺"));
        assert_eq!(result.text("original_text"), Some("Hello"));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_timeout_becomes_error_result() {
        let model = Arc::new(HangingModel::default());
        let agent = CatTranslatorAgent::new(ModelHandle::new(model, Duration::from_millis(20)));

        let result = agent.process("Hello").await;
        assert!(result.is_error());
        assert_eq!(result.error_kind(), Some(ErrorKind::UpstreamTimeout));
    }
}
