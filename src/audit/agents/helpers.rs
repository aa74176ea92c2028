//! Audit Agent Helper Functions
//!
//! Every agent follows the same pattern: build the payload, call the
//! backend with the role's instructions, tag the answer with the role and
//! log what came back. `run_agent` holds that pattern once.

use tracing::{debug, warn};

use crate::ai::StructuredReasoningClient;
use crate::audit::finding::AgentFinding;
use crate::audit::roles::AgentRole;
use crate::types::Result;
use crate::types::utils::capitalize_first;

/// Invoke `role` once with `payload` and wrap the answer as a finding.
///
/// Missing keys and non-conforming answers are logged, never fatal.
pub async fn run_agent(
    client: &StructuredReasoningClient,
    role: AgentRole,
    payload: &str,
    max_output_tokens: u32,
) -> Result<AgentFinding> {
    let name = capitalize_first(role.as_str());
    debug!(
        "{}Agent: invoking with {} byte payload, {} max tokens",
        name,
        payload.len(),
        max_output_tokens
    );

    let output = client
        .invoke_structured(role.spec().instructions, payload, max_output_tokens)
        .await?;
    let finding = AgentFinding::new(role, output.document, output.recovery);

    if finding.is_empty() {
        warn!("{}Agent: no usable finding, continuing with empty result", name);
    } else {
        let missing = finding.missing_keys();
        if !missing.is_empty() {
            warn!("{}Agent: answer lacks {}", name, missing.join(", "));
        }
    }

    debug!(
        "{}Agent: {} keys ({:?}, {} output tokens)",
        name,
        finding.document().as_object().map_or(0, |m| m.len()),
        finding.recovery,
        output.usage.output_tokens
    );

    Ok(finding)
}
