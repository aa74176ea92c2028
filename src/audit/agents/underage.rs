//! Underage Agent
//!
//! Compares declared age against the writing in a sample of posts.

use serde::Serialize;
use serde_json::Value;

use super::RiskAgent;
use crate::audit::finding::AgentFinding;
use crate::audit::roles::AgentRole;
use crate::types::{Post, PostExcerpt, Result, UserProfile, json_bool, json_score, json_string_or};

pub struct UnderageAgent<'a> {
    pub profile: &'a UserProfile,
    pub posts: &'a [Post],
}

impl RiskAgent for UnderageAgent<'_> {
    fn role(&self) -> AgentRole {
        AgentRole::Underage
    }

    fn payload(&self) -> Result<String> {
        let sample: Vec<PostExcerpt<'_>> = self.posts.iter().map(Post::excerpt).collect();
        Ok(format!(
            "USER_PROFILE:\n{}\n\nSAMPLE_POSTS:\n{}",
            serde_json::to_string(self.profile)?,
            serde_json::to_string(&sample)?
        ))
    }
}

/// Typed view of an underage finding
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnderageAssessment {
    pub is_minor_suspected: bool,
    /// 0-100
    pub misrepresentation_risk: u8,
    pub reason: String,
}

impl UnderageAssessment {
    pub fn from_finding(finding: &AgentFinding) -> Self {
        Self::parse_result(finding.document())
    }

    fn parse_result(result: &Value) -> Self {
        Self {
            is_minor_suspected: json_bool(result, "is_minor_suspected", false),
            misrepresentation_risk: json_score(result, "underage_misrepresentation_risk")
                .unwrap_or(0),
            reason: json_string_or(result, "reason", ""),
        }
    }
}
