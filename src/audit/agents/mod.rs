//! Audit Agents
//!
//! One agent per role. An agent owns nothing: it borrows its inputs, shapes
//! them into the payload its role expects and hands off to [`run_agent`].

pub mod content;
pub mod helpers;
pub mod interaction;
pub mod policy;
pub mod prompts;
pub mod report;
pub mod underage;

pub use content::{AxisLevels, ContentAgent, ContentAssessment, PostAssessment};
pub use helpers::run_agent;
pub use interaction::{EvidenceSnippet, InteractionAgent, InteractionAssessment};
pub use policy::{PolicyAgent, PolicyDecision};
pub use report::{ReportAgent, SafetyReport};
pub use underage::{UnderageAgent, UnderageAssessment};

use super::finding::AgentFinding;
use super::roles::AgentRole;
use crate::ai::StructuredReasoningClient;
use crate::types::Result;

/// Trait for audit agents
#[async_trait::async_trait]
pub trait RiskAgent: Send + Sync {
    fn role(&self) -> AgentRole;

    /// Serialized input for the backend
    fn payload(&self) -> Result<String>;

    /// Run the role once and return its finding
    async fn run(
        &self,
        client: &StructuredReasoningClient,
        max_output_tokens: u32,
    ) -> Result<AgentFinding> {
        let payload = self.payload()?;
        run_agent(client, self.role(), &payload, max_output_tokens).await
    }
}
