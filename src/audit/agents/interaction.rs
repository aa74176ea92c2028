//! Interaction Agent
//!
//! Looks for grooming patterns in the user's direct messages, each message
//! annotated with the ages of both parties.

use serde::Serialize;
use serde_json::{Value, json};

use super::RiskAgent;
use crate::audit::finding::AgentFinding;
use crate::audit::roles::AgentRole;
use crate::types::{AnnotatedInteraction, Result, RiskLevel, UserProfile, json_string, json_string_or};

pub struct InteractionAgent<'a> {
    pub profile: &'a UserProfile,
    pub interactions: &'a [AnnotatedInteraction],
}

impl RiskAgent for InteractionAgent<'_> {
    fn role(&self) -> AgentRole {
        AgentRole::Interaction
    }

    fn payload(&self) -> Result<String> {
        Ok(serde_json::to_string(&json!({
            "user_profile": self.profile,
            "interactions": self.interactions,
        }))?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceSnippet {
    pub interaction_id: String,
    pub text_snippet: String,
    pub comment: String,
}

/// Typed view of an interaction finding
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InteractionAssessment {
    pub grooming_risk: RiskLevel,
    /// In the order the backend ranked them
    pub evidence: Vec<EvidenceSnippet>,
    pub summary: String,
}

impl InteractionAssessment {
    pub fn from_finding(finding: &AgentFinding) -> Self {
        Self::parse_result(finding.document())
    }

    fn parse_result(result: &Value) -> Self {
        let evidence = result
            .get("evidence")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter(|v| v.is_object())
                    .map(|v| EvidenceSnippet {
                        interaction_id: match v.get("interaction_id") {
                            Some(Value::Number(n)) => n.to_string(),
                            _ => json_string(v, "interaction_id").unwrap_or_default(),
                        },
                        text_snippet: json_string_or(v, "text_snippet", ""),
                        comment: json_string_or(v, "comment", ""),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            grooming_risk: json_string(result, "grooming_risk")
                .map(|s| RiskLevel::parse_lenient(&s))
                .unwrap_or_default(),
            evidence,
            summary: json_string_or(result, "summary", ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgeIndex;
    use crate::types::profile::fixtures::{dm, user};

    #[test]
    fn test_payload_carries_ages_and_sentinel() {
        let users = vec![user("adult", 30), user("kid", 14)];
        let ages = AgeIndex::from_users(&users);
        let annotated = ages.annotate_all(&[
            dm("i1", "adult", "kid", "keep this secret"),
            dm("i2", "ghost", "kid", "hi"),
        ]);

        let payload = InteractionAgent {
            profile: &users[1],
            interactions: &annotated,
        }
        .payload()
        .unwrap();
        let value: Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(value["user_profile"]["user_id"], "kid");
        let list = value["interactions"].as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["interaction_id"], "i1");
        assert_eq!(list[0]["from_age"], 30);
        assert_eq!(list[0]["to_age"], 14);
        assert_eq!(list[0]["type"], "dm");
        assert_eq!(list[1]["from_age"], -1);
    }

    #[test]
    fn test_parse_evidence_in_order() {
        let a = InteractionAssessment::parse_result(&json!({
            "grooming_risk": "HIGH",
            "evidence": [
                {"interaction_id": "i7", "text_snippet": "keep this secret", "comment": "secrecy"},
                {"interaction_id": 3, "text_snippet": "meet alone"},
                42
            ],
            "summary": "pattern of secrecy"
        }));
        assert_eq!(a.grooming_risk, RiskLevel::High);
        assert_eq!(a.evidence.len(), 2);
        assert_eq!(a.evidence[0].interaction_id, "i7");
        assert_eq!(a.evidence[1].interaction_id, "3");
        assert_eq!(a.evidence[1].comment, "");
        assert_eq!(a.summary, "pattern of secrecy");
    }

    #[test]
    fn test_unknown_level_reads_as_none() {
        let a = InteractionAssessment::parse_result(&json!({"grooming_risk": "elevated"}));
        assert_eq!(a.grooming_risk, RiskLevel::None);
        assert!(a.evidence.is_empty());
    }
}
