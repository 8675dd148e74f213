//! OpenAI-compatible chat-completions client.
//!
//! Requests a strict JSON object `{"questions": [...]}`. Only sizes and
//! token usage are logged, never the API key or response contents.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::config::AiSettings;
use crate::data::candidate_list;
use crate::error::GenerationError;

use super::QuestionGenerator;

const SYSTEM_PROMPT: &str = "You write multiple-choice quiz questions. Respond ONLY with strict JSON \
of the form {\"questions\": [{\"question\": string, \"options\": [4 strings], \"correctAnswerIndex\": integer 0-3}]}.";

#[derive(Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    /// Build a client from settings; the API key is read from the
    /// environment variable named in `ai.api_key_env`.
    pub fn from_settings(ai: &AiSettings) -> Result<Self, GenerationError> {
        let api_key = std::env::var(&ai.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| GenerationError::MissingApiKey(ai.api_key_env.clone()))?;

        Self::new(api_key, &ai.base_url, &ai.model, Duration::from_secs(ai.timeout_secs))
    }

    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

fn user_prompt(topic: &str, count: usize) -> String {
    format!(
        "Generate {} multiple-choice questions about {}. Each question must have 4 options and one \
         correct answer. The correct answer should be indicated by its index (0-3).",
        count, topic
    )
}

impl QuestionGenerator for OpenAiGenerator {
    #[instrument(level = "info", skip(self, topic), fields(model = %self.model))]
    async fn candidates(&self, topic: &str, count: usize) -> Result<Vec<Value>, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);
        let req = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessageReq {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                ChatMessageReq {
                    role: "user".into(),
                    content: user_prompt(topic, count),
                },
            ],
            temperature: 0.7,
            response_format: ResponseFormat {
                r#type: "json_object".into(),
            },
        };

        let res = self
            .client
            .post(&url)
            .header(USER_AGENT, concat!("questionnaire/", env!("CARGO_PKG_VERSION")))
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            let message = extract_api_error(&body).unwrap_or(body);
            return Err(GenerationError::Service { status, message });
        }

        let body: ChatCompletionResponse = res.json().await?;
        if let Some(usage) = &body.usage {
            info!(
                prompt_tokens = ?usage.prompt_tokens,
                completion_tokens = ?usage.completion_tokens,
                "Generation usage"
            );
        }

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::Malformed("empty response".to_string()))?;
        info!(response_len = content.len(), "Generation response received");

        parse_content(&content)
    }
}

/// Extract the candidate array from the model's JSON reply.
fn parse_content(content: &str) -> Result<Vec<Value>, GenerationError> {
    let root: Value = serde_json::from_str(content.trim())
        .map_err(|e| GenerationError::Malformed(e.to_string()))?;

    candidate_list(root)
        .ok_or_else(|| GenerationError::Malformed("missing \"questions\" array".to_string()))
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessageReq>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessageReq {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    r#type: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResp,
}

#[derive(Deserialize)]
struct ChatMessageResp {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
}

fn extract_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Wrapper {
        error: ErrorBody,
    }
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<Wrapper>(body)
        .ok()
        .map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content() {
        let content = r#" {"questions": [{"question": "q"}, {"question": "r"}]} "#;
        assert_eq!(parse_content(content).unwrap().len(), 2);

        assert!(matches!(
            parse_content("{\"items\": []}"),
            Err(GenerationError::Malformed(_))
        ));
        assert!(matches!(
            parse_content("Sure! Here are your questions"),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn test_extract_api_error() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(
            extract_api_error(body).as_deref(),
            Some("Incorrect API key provided")
        );
        assert_eq!(extract_api_error("<html>"), None);
    }

    #[test]
    fn test_missing_api_key() {
        let ai = AiSettings {
            api_key_env: "QUESTIONNAIRE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..AiSettings::default()
        };
        assert!(matches!(
            OpenAiGenerator::from_settings(&ai),
            Err(GenerationError::MissingApiKey(name)) if name == "QUESTIONNAIRE_TEST_KEY_THAT_IS_NEVER_SET"
        ));
    }

    #[test]
    fn test_prompt_mentions_count_and_topic() {
        let prompt = user_prompt("volcanoes", 7);
        assert!(prompt.starts_with("Generate 7 multiple-choice questions about volcanoes."));
    }
}
