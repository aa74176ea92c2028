//! Structured Reasoning Client
//!
//! Wraps an injected [`LlmProvider`] with the structured-output contract:
//! one call per invocation, no retry, and malformed answers degrade to an
//! empty mapping instead of failing.

use serde_json::{Map, Value};
use std::time::Instant;
use tracing::debug;

use super::provider::{CompletionRequest, SharedProvider, TokenUsage};
use super::recovery::{Recovery, recover_object};
use crate::types::Result;

/// Mapping read from one backend answer
#[derive(Debug, Clone)]
pub struct StructuredOutput {
    pub document: Map<String, Value>,
    pub recovery: Recovery,
    pub usage: TokenUsage,
}

#[derive(Clone)]
pub struct StructuredReasoningClient {
    provider: SharedProvider,
}

impl StructuredReasoningClient {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Configuration check; must pass before any agent is invoked
    pub fn ensure_ready(&self) -> Result<()> {
        self.provider.ensure_configured()
    }

    /// Send `role_instructions` + `payload` and return the parsed mapping.
    ///
    /// Backend call failures propagate; unreadable answers yield `{}`.
    pub async fn invoke(
        &self,
        role_instructions: &str,
        payload: &str,
        max_output_tokens: u32,
    ) -> Result<Map<String, Value>> {
        self.invoke_structured(role_instructions, payload, max_output_tokens)
            .await
            .map(|out| out.document)
    }

    /// Like [`invoke`](Self::invoke), also reporting how the mapping was obtained
    pub async fn invoke_structured(
        &self,
        role_instructions: &str,
        payload: &str,
        max_output_tokens: u32,
    ) -> Result<StructuredOutput> {
        let request = CompletionRequest {
            system: role_instructions,
            user: payload,
            max_output_tokens,
        };

        let start = Instant::now();
        let response = self.provider.complete(&request).await?;

        debug!(
            "{} answered in {}ms ({} tokens)",
            self.provider.name(),
            start.elapsed().as_millis(),
            response.usage.total()
        );

        let (document, recovery) = recover_object(&response.content);
        Ok(StructuredOutput {
            document,
            recovery,
            usage: response.usage,
        })
    }
}
