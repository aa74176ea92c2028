//! Policy Agent
//!
//! Maps the aggregated findings onto the policy corpus and picks one action.

use serde::Serialize;
use serde_json::{Value, json};

use super::RiskAgent;
use crate::audit::aggregate::AggregatedFindings;
use crate::audit::finding::AgentFinding;
use crate::audit::roles::AgentRole;
use crate::types::{RecommendedAction, Result, RiskLevel, json_string, json_string_array, json_string_or};

pub struct PolicyAgent<'a> {
    pub policy_text: &'a str,
    pub findings: &'a AggregatedFindings,
}

impl RiskAgent for PolicyAgent<'_> {
    fn role(&self) -> AgentRole {
        AgentRole::Policy
    }

    fn payload(&self) -> Result<String> {
        Ok(serde_json::to_string(&json!({
            "policies": self.policy_text,
            "findings": self.findings,
        }))?)
    }
}

/// Typed view of a policy finding
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolicyDecision {
    /// Most serious first
    pub violated_sections: Vec<String>,
    pub overall_severity: RiskLevel,
    /// `None` when the backend gave no action or one outside the enumeration
    pub recommended_action: Option<RecommendedAction>,
    pub explanation: String,
}

impl PolicyDecision {
    pub fn from_finding(finding: &AgentFinding) -> Self {
        Self::parse_result(finding.document())
    }

    fn parse_result(result: &Value) -> Self {
        Self {
            violated_sections: json_string_array(result, "violated_sections"),
            overall_severity: json_string(result, "overall_severity")
                .map(|s| RiskLevel::parse_lenient(&s))
                .unwrap_or_default(),
            recommended_action: json_string(result, "recommended_action")
                .and_then(|s| s.parse().ok()),
            explanation: json_string_or(result, "explanation", ""),
        }
    }

    /// Action label for display
    pub fn action_label(&self) -> &'static str {
        self.recommended_action
            .map_or("no action", RecommendedAction::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Recovery;
    use crate::audit::aggregate::aggregate;

    fn finding(role: AgentRole, value: Value) -> AgentFinding {
        match value {
            Value::Object(map) => AgentFinding::new(role, map, Recovery::Direct),
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_payload_nests_aggregated_findings() {
        let findings = aggregate(
            finding(AgentRole::Underage, json!({"is_minor_suspected": false})),
            AgentFinding::empty(AgentRole::Content),
            finding(AgentRole::Interaction, json!({"grooming_risk": "high"})),
        );
        let payload = PolicyAgent {
            policy_text: "1. No grooming.",
            findings: &findings,
        }
        .payload()
        .unwrap();
        let value: Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(value["policies"], "1. No grooming.");
        assert_eq!(value["findings"]["underage"]["is_minor_suspected"], false);
        assert_eq!(value["findings"]["content"], json!({}));
        assert_eq!(value["findings"]["interaction"]["grooming_risk"], "high");
    }

    #[test]
    fn test_parse_decision() {
        let d = PolicyDecision::parse_result(&json!({
            "violated_sections": ["3.1 Grooming", 4],
            "overall_severity": "critical",
            "recommended_action": "Escalate to safety team",
            "explanation": "adult contacting minor"
        }));
        assert_eq!(d.violated_sections, vec!["3.1 Grooming", "4"]);
        assert_eq!(d.overall_severity, RiskLevel::Critical);
        assert_eq!(
            d.recommended_action,
            Some(RecommendedAction::EscalateToSafetyTeam)
        );
        assert_eq!(d.action_label(), "escalate_to_safety_team");
    }

    #[test]
    fn test_unknown_action_is_no_action() {
        let d = PolicyDecision::parse_result(&json!({"recommended_action": "ban forever"}));
        assert_eq!(d.recommended_action, None);
        assert_eq!(d.action_label(), "no action");
        assert!(d.violated_sections.is_empty());
        assert_eq!(d.overall_severity, RiskLevel::None);
    }
}
