//! LLM Provider Abstraction
//!
//! Defines the `LlmProvider` trait: one request/response exchange with a
//! reasoning backend. Providers return the raw text of the answer; turning it
//! into structured data is the job of [`crate::ai::StructuredReasoningClient`].

mod openai;
#[cfg(test)]
pub(crate) mod testing;

pub use openai::OpenAiProvider;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::constants::llm as llm_constants;
use crate::types::{AuditError, Result};

// =============================================================================
// Request / Response
// =============================================================================

/// A single backend exchange: fixed system directive plus user payload
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// Role instructions, sent as the system-level directive
    pub system: &'a str,
    /// Serialized data payload, sent as user content
    pub user: &'a str,
    /// Output token budget
    pub max_output_tokens: u32,
}

/// Raw backend answer with usage metrics
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Answer text, expected (not guaranteed) to hold one JSON object
    pub content: String,
    pub usage: TokenUsage,
}

impl LlmResponse {
    /// Create response with content only (usage unknown)
    pub fn content_only(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: TokenUsage::default(),
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Create from OpenAI-style usage response
    pub fn from_openai(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            input_tokens: prompt_tokens,
            output_tokens: completion_tokens,
        }
    }
}

/// Shared provider handle injected into the pipeline
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for LLM providers
///
/// The API key is never serialized and is redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "openai"
    pub provider: String,
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub temperature: f32,
    /// API key; falls back to `OPENAI_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for OpenAI-compatible endpoints)
    #[serde(default)]
    pub api_base: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            timeout_secs: llm_constants::DEFAULT_TIMEOUT_SECS,
            temperature: 0.0,
            api_key: None,
            api_base: None,
        }
    }
}

impl ProviderConfig {
    /// Resolve the credential from config, then the environment.
    ///
    /// Missing, blank and placeholder keys are all a configuration error.
    pub fn resolve_api_key(&self) -> Result<SecretString> {
        let key = self
            .api_key
            .clone()
            .or_else(|| std::env::var(llm_constants::API_KEY_ENV).ok());
        validate_credential(key.as_deref())
    }
}

/// Accept only a non-blank, non-placeholder credential
pub fn validate_credential(key: Option<&str>) -> Result<SecretString> {
    match key.map(str::trim) {
        Some(k) if !k.is_empty() && !k.contains(llm_constants::API_KEY_PLACEHOLDER) => {
            Ok(SecretString::from(k.to_string()))
        }
        _ => Err(AuditError::Config(format!(
            "{} is not set. Configure it before running an audit",
            llm_constants::API_KEY_ENV
        ))),
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one exchange and return the raw answer text.
    ///
    /// Transport, auth and quota failures are returned as errors; the
    /// content of the answer is not inspected.
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Fail with `AuditError::Config` if the provider cannot make calls
    fn ensure_configured(&self) -> Result<()> {
        Ok(())
    }
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.clone())?)),
        _ => Err(AuditError::Config(format!(
            "Unknown provider: {}. Supported: openai",
            config.provider
        ))),
    }
}
