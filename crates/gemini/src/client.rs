//! Gemini `generateContent` client

use crate::{GeminiError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash";

/// Connection settings for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client, failing if the key or model is missing
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GeminiError::InvalidConfig("API key is empty".into()));
        }
        if config.model.trim().is_empty() {
            return Err(GeminiError::InvalidConfig("model identifier is empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeminiError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Send one system instruction and one user turn, returning the joined text parts
    pub async fn generate(&self, prompt: &Prompt<'_>) -> Result<String> {
        let url = format!(
            "{}/v1beta/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            qualified_model(&self.config.model)
        );

        tracing::debug!(model = %self.config.model, "sending generateContent request");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&GenerateContentRequest::from(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let body: GenerateContentResponse = response.json().await?;
        body.text()
    }

    /// List models that support `generateContent`
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/v1beta/models", self.config.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .get(url)
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let list: ListModelsResponse = response.json().await?;
        Ok(list
            .models
            .into_iter()
            .filter(|m| m.supported_generation_methods.iter().any(|g| g == "generateContent"))
            .collect())
    }
}

/// A single-turn prompt
#[derive(Debug, Clone)]
pub struct Prompt<'a> {
    pub system_instruction: &'a str,
    pub user_input: &'a str,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn api_error(status: u16, body: &str) -> GeminiError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());
    GeminiError::Api { status, message }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl From<&Prompt<'_>> for GenerateContentRequest {
    fn from(prompt: &Prompt<'_>) -> Self {
        let system_instruction = (!prompt.system_instruction.is_empty())
            .then(|| Content::text(None, prompt.system_instruction));

        Self {
            system_instruction,
            contents: vec![Content::text(Some("user"), prompt.user_input)],
            generation_config: GenerationConfig {
                temperature: prompt.temperature,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: prompt.max_output_tokens,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    fn text(self) -> Result<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::EmptyResponse {
                block_reason: self.prompt_feedback.and_then(|f| f.block_reason),
            });
        }

        Ok(text)
    }
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// A model advertised by the API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let prompt = Prompt {
            system_instruction: "be a cat",
            user_input: "hello",
            temperature: 0.9,
            max_output_tokens: 2048,
        };
        let value = serde_json::to_value(GenerateContentRequest::from(&prompt)).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be a cat");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(value["generationConfig"]["topK"], 40);
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Meow "},{"text":"mrrp"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().unwrap(), "Meow mrrp");
    }

    #[test]
    fn test_blocked_response_is_error() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        match response.text() {
            Err(GeminiError::EmptyResponse { block_reason }) => {
                assert_eq!(block_reason.as_deref(), Some("SAFETY"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        match api_error(400, body) {
            GeminiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_model_name_qualified() {
        assert_eq!(qualified_model("gemini-2.5-flash"), "models/gemini-2.5-flash");
        assert_eq!(qualified_model(DEFAULT_MODEL), DEFAULT_MODEL);
    }

    #[test]
    fn test_missing_key_rejected() {
        let result = GeminiClient::new(GeminiConfig::new("  ", DEFAULT_MODEL));
        assert!(matches!(result, Err(GeminiError::InvalidConfig(_))));
    }
}
