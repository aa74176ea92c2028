//! Policy Corpus
//!
//! Loads the free-text policy document the policy stage maps findings onto.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::files::MISSING_POLICIES;
use crate::types::Result;

/// Read the policy corpus. A missing file is not an error: the policy stage
/// then runs against a one-line placeholder.
pub fn load_policies(path: &Path) -> Result<String> {
    if !path.exists() {
        warn!(
            "Policy file {} not found, using placeholder text",
            path.display()
        );
        return Ok(MISSING_POLICIES.to_string());
    }

    let text = fs::read_to_string(path)?;
    debug!("Loaded {} bytes of policy text", text.len());
    Ok(text)
}
