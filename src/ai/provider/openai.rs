//! OpenAI API Provider
//!
//! Reasoning backend using OpenAI's Chat Completions API in JSON mode.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{
    CompletionRequest, LlmProvider, LlmResponse, ProviderConfig, TokenUsage,
};
use crate::constants::llm as llm_constants;
use crate::types::{AuditError, ErrorClassifier, Result};

const PROVIDER_NAME: &str = "openai";

/// OpenAI API Provider with secure API key handling
pub struct OpenAiProvider {
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| llm_constants::DEFAULT_API_BASE.to_string());

        let model = config
            .model
            .unwrap_or_else(|| llm_constants::DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AuditError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            temperature: config.temperature,
            client,
        })
    }

    fn build_request(&self, request: &CompletionRequest<'_>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens: Some(request.max_output_tokens),
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<LlmResponse> {
        let body = self.build_request(request);
        let url = format!("{}/chat/completions", self.api_base);

        debug!(
            "Sending request to OpenAI (model: {}, max_tokens: {})",
            self.model, request.max_output_tokens
        );

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify(&e.to_string(), PROVIDER_NAME))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("OpenAI API error ({}): {}", status, text),
                PROVIDER_NAME,
            )
            .into());
        }

        let response_body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AuditError::LlmApi(format!("Failed to parse OpenAI response: {}", e)))?;

        let usage = response_body
            .usage
            .map(|u| TokenUsage::from_openai(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let choice = response_body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AuditError::LlmApi("No choices in OpenAI response".to_string()))?;

        // A refusal or filtered answer has no content; treat as unparseable text
        let content = choice.message.content.unwrap_or_default();

        Ok(LlmResponse { content, usage })
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(ProviderConfig {
            api_key: Some("sk-test".to_string()),
            api_base: Some("http://localhost:9999/v1/".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let p = provider();
        assert_eq!(p.model(), "gpt-4o-mini");
        assert_eq!(p.name(), "openai");
        assert_eq!(p.api_base, "http://localhost:9999/v1");
        assert!(p.ensure_configured().is_ok());
    }

    #[test]
    fn test_build_request_json_mode() {
        let p = provider();
        let request = CompletionRequest {
            system: "You are a Content Safety Agent.",
            user: "[]",
            max_output_tokens: 1000,
        };
        let body = serde_json::to_value(p.build_request(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a Content Safety Agent.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "[]");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", provider());
        assert!(!debug.contains("sk-test"));
    }

    #[test]
    fn test_response_without_content_deserializes() {
        let raw = r#"{"choices":[{"message":{"content":null}}],"usage":{"prompt_tokens":3,"completion_tokens":0}}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
        assert_eq!(parsed.usage.unwrap().prompt_tokens, 3);
    }
}
