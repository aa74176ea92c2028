//! Findings Aggregation
//!
//! Packages the three detection findings for the policy stage. Nothing is
//! reconciled here; conflicts are left to the policy role.

use serde::Serialize;

use super::finding::AgentFinding;

/// Exactly three findings, serialized under `underage`, `content` and
/// `interaction` whether or not they are empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedFindings {
    pub underage: AgentFinding,
    pub content: AgentFinding,
    pub interaction: AgentFinding,
}

pub fn aggregate(
    underage: AgentFinding,
    content: AgentFinding,
    interaction: AgentFinding,
) -> AggregatedFindings {
    AggregatedFindings {
        underage,
        content,
        interaction,
    }
}

impl AggregatedFindings {
    pub fn iter(&self) -> impl Iterator<Item = &AgentFinding> {
        [&self.underage, &self.content, &self.interaction].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Recovery;
    use crate::audit::roles::AgentRole;
    use proptest::prelude::*;
    use serde_json::{Map, Value, json};

    fn finding_with(role: AgentRole, keys: &[String]) -> AgentFinding {
        let map: Map<String, Value> = keys.iter().map(|k| (k.clone(), json!(1))).collect();
        AgentFinding::new(role, map, Recovery::Direct)
    }

    #[test]
    fn test_all_empty_still_has_three_keys() {
        let bundle = aggregate(
            AgentFinding::empty(AgentRole::Underage),
            AgentFinding::empty(AgentRole::Content),
            AgentFinding::empty(AgentRole::Interaction),
        );
        assert_eq!(
            serde_json::to_value(&bundle).unwrap(),
            json!({"underage": {}, "content": {}, "interaction": {}})
        );
        assert!(bundle.iter().all(AgentFinding::is_empty));
    }

    #[test]
    fn test_findings_are_passed_through_unmodified() {
        let content = finding_with(AgentRole::Content, &["overall".to_string()]);
        let bundle = aggregate(
            AgentFinding::empty(AgentRole::Underage),
            content.clone(),
            AgentFinding::empty(AgentRole::Interaction),
        );
        assert_eq!(bundle.content, content);
        assert_eq!(bundle.iter().filter(|f| f.is_empty()).count(), 2);
    }

    proptest! {
        #[test]
        fn prop_exactly_three_top_level_keys(
            u in prop::collection::vec("[a-z]{1,6}", 0..4),
            c in prop::collection::vec("[a-z]{1,6}", 0..4),
            i in prop::collection::vec("[a-z]{1,6}", 0..4),
        ) {
            let bundle = aggregate(
                finding_with(AgentRole::Underage, &u),
                finding_with(AgentRole::Content, &c),
                finding_with(AgentRole::Interaction, &i),
            );
            let value = serde_json::to_value(&bundle).unwrap();
            let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
            keys.sort();
            prop_assert_eq!(keys, vec!["content", "interaction", "underage"]);
        }
    }
}
