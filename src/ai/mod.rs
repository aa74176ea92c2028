//! AI Integration Layer
//!
//! Reasoning-backend abstraction, JSON recovery and the structured client
//! every audit agent delegates to.

pub mod client;
pub mod provider;
pub mod recovery;

pub use client::{StructuredOutput, StructuredReasoningClient};
pub use provider::{
    CompletionRequest, LlmProvider, LlmResponse, OpenAiProvider, ProviderConfig, SharedProvider,
    TokenUsage, create_provider, validate_credential,
};
pub use recovery::{Recovery, recover_object};
