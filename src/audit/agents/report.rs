//! Report Agent
//!
//! Writes the operator-facing report from everything the earlier stages found.

use serde::Serialize;
use serde_json::{Value, json};

use super::RiskAgent;
use crate::audit::aggregate::AggregatedFindings;
use crate::audit::finding::AgentFinding;
use crate::audit::roles::AgentRole;
use crate::constants::files::DEFAULT_REPORT_TITLE;
use crate::types::{Result, UserProfile, json_score, json_string, json_string_or};

pub struct ReportAgent<'a> {
    pub profile: &'a UserProfile,
    pub findings: &'a AggregatedFindings,
    pub policy: &'a AgentFinding,
}

impl RiskAgent for ReportAgent<'_> {
    fn role(&self) -> AgentRole {
        AgentRole::Report
    }

    fn payload(&self) -> Result<String> {
        Ok(serde_json::to_string(&json!({
            "user_profile": self.profile,
            "underage": self.findings.underage,
            "content": self.findings.content,
            "interactions": self.findings.interaction,
            "policy_result": self.policy,
        }))?)
    }
}

/// Typed view of a report finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyReport {
    pub title: String,
    /// 0-100
    pub overall_risk_score: u8,
    pub summary: String,
    /// Markdown
    pub narrative: String,
}

impl Default for SafetyReport {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            overall_risk_score: 0,
            summary: String::new(),
            narrative: String::new(),
        }
    }
}

impl SafetyReport {
    pub fn from_finding(finding: &AgentFinding) -> Self {
        Self::parse_result(finding.document())
    }

    fn parse_result(result: &Value) -> Self {
        Self {
            title: json_string(result, "risk_title")
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string()),
            overall_risk_score: json_score(result, "overall_risk_score").unwrap_or(0),
            summary: json_string_or(result, "risk_summary", ""),
            narrative: json_string_or(result, "markdown_report", ""),
        }
    }

    /// Plain-text export: the title as a heading, then the narrative
    pub fn to_text_export(&self) -> String {
        format!("# {}\n\n{}", self.title, self.narrative)
    }

    pub fn export_file_name(user_id: &str) -> String {
        format!("safety_report_{}.txt", user_id)
    }
}
