//! Agent roles and the role table.
//!
//! Each role is data: instructions, the keys its answer is expected to
//! carry, and its default output budget.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::agents::prompts;
use crate::constants::tokens;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Underage,
    Content,
    Interaction,
    Policy,
    Report,
}

impl AgentRole {
    /// Pipeline order
    pub const ALL: [AgentRole; 5] = [
        AgentRole::Underage,
        AgentRole::Content,
        AgentRole::Interaction,
        AgentRole::Policy,
        AgentRole::Report,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentRole::Underage => "underage",
            AgentRole::Content => "content",
            AgentRole::Interaction => "interaction",
            AgentRole::Policy => "policy",
            AgentRole::Report => "report",
        }
    }

    pub fn spec(self) -> &'static RoleSpec {
        &ROLE_SPECS[self as usize]
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed contract of one role
#[derive(Debug)]
pub struct RoleSpec {
    pub role: AgentRole,
    pub instructions: &'static str,
    /// Top-level keys a conforming answer carries
    pub expected_keys: &'static [&'static str],
    pub default_max_tokens: u32,
}

/// Indexed by `AgentRole as usize`
static ROLE_SPECS: [RoleSpec; 5] = [
    RoleSpec {
        role: AgentRole::Underage,
        instructions: prompts::UNDERAGE,
        expected_keys: &["is_minor_suspected", "underage_misrepresentation_risk", "reason"],
        default_max_tokens: tokens::UNDERAGE,
    },
    RoleSpec {
        role: AgentRole::Content,
        instructions: prompts::CONTENT,
        expected_keys: &["per_post", "overall"],
        default_max_tokens: tokens::CONTENT,
    },
    RoleSpec {
        role: AgentRole::Interaction,
        instructions: prompts::INTERACTION,
        expected_keys: &["grooming_risk", "evidence", "summary"],
        default_max_tokens: tokens::INTERACTION,
    },
    RoleSpec {
        role: AgentRole::Policy,
        instructions: prompts::POLICY,
        expected_keys: &[
            "violated_sections",
            "overall_severity",
            "recommended_action",
            "explanation",
        ],
        default_max_tokens: tokens::POLICY,
    },
    RoleSpec {
        role: AgentRole::Report,
        instructions: prompts::REPORT,
        expected_keys: &[
            "risk_title",
            "overall_risk_score",
            "risk_summary",
            "markdown_report",
        ],
        default_max_tokens: tokens::REPORT,
    },
];
