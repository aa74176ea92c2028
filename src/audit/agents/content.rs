//! Content Agent
//!
//! Scores every post on four harm axes and rolls them up into one level per
//! axis. The roll-up is the backend's; [`ContentAssessment::max_across_posts`]
//! is computed here only to flag an overall level lower than a post's.

use serde::Serialize;
use serde_json::Value;

use super::RiskAgent;
use crate::audit::finding::AgentFinding;
use crate::audit::roles::AgentRole;
use crate::types::{Post, PostExcerpt, Result, RiskLevel, json_string, json_string_or};

pub struct ContentAgent<'a> {
    pub posts: &'a [Post],
}

impl RiskAgent for ContentAgent<'_> {
    fn role(&self) -> AgentRole {
        AgentRole::Content
    }

    fn payload(&self) -> Result<String> {
        let posts: Vec<PostExcerpt<'_>> = self.posts.iter().map(Post::excerpt).collect();
        Ok(serde_json::to_string(&posts)?)
    }
}

// =============================================================================
// Typed view
// =============================================================================

/// Levels on the four content axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AxisLevels {
    pub bullying: RiskLevel,
    pub self_harm: RiskLevel,
    pub sexual_exploitation: RiskLevel,
    pub substance_abuse: RiskLevel,
}

impl AxisLevels {
    pub const LABELS: [&'static str; 4] =
        ["bullying", "self_harm", "sexual_exploitation", "substance_abuse"];

    fn from_value(value: &Value) -> Self {
        let level = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(RiskLevel::parse_lenient)
                .unwrap_or_default()
        };
        Self {
            bullying: level("bullying_risk"),
            self_harm: level("self_harm_risk"),
            sexual_exploitation: level("sexual_exploitation_risk"),
            substance_abuse: level("substance_abuse_risk"),
        }
    }

    pub fn levels(&self) -> [RiskLevel; 4] {
        [
            self.bullying,
            self.self_harm,
            self.sexual_exploitation,
            self.substance_abuse,
        ]
    }

    /// Axis-wise maximum
    pub fn max(self, other: AxisLevels) -> AxisLevels {
        AxisLevels {
            bullying: self.bullying.max(other.bullying),
            self_harm: self.self_harm.max(other.self_harm),
            sexual_exploitation: self.sexual_exploitation.max(other.sexual_exploitation),
            substance_abuse: self.substance_abuse.max(other.substance_abuse),
        }
    }

    pub fn highest(&self) -> RiskLevel {
        self.levels().into_iter().max().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostAssessment {
    pub post_id: String,
    pub text: String,
    pub levels: AxisLevels,
    pub notes: String,
}

/// Typed view of a content finding
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentAssessment {
    pub per_post: Vec<PostAssessment>,
    /// The backend's roll-up; `None` when the answer had no `overall`
    pub overall: Option<AxisLevels>,
    pub summary: String,
}

impl ContentAssessment {
    pub fn from_finding(finding: &AgentFinding) -> Self {
        Self::parse_result(finding.document())
    }

    fn parse_result(result: &Value) -> Self {
        let per_post = result
            .get("per_post")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter(|v| v.is_object())
                    .map(|v| PostAssessment {
                        post_id: json_string(v, "post_id").unwrap_or_default(),
                        text: json_string(v, "text").unwrap_or_default(),
                        levels: AxisLevels::from_value(v),
                        notes: json_string_or(v, "notes", ""),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let overall = result.get("overall").filter(|v| v.is_object());

        Self {
            per_post,
            overall: overall.map(AxisLevels::from_value),
            summary: overall
                .and_then(|v| json_string(v, "summary"))
                .unwrap_or_default(),
        }
    }

    /// Backend roll-up, all `none` when absent
    pub fn overall_levels(&self) -> AxisLevels {
        self.overall.unwrap_or_default()
    }

    /// Mechanical roll-up: the maximum level seen per axis across posts
    pub fn max_across_posts(&self) -> AxisLevels {
        self.per_post
            .iter()
            .fold(AxisLevels::default(), |acc, p| acc.max(p.levels))
    }

    /// Axes where some post is rated above the backend's overall level
    pub fn understated_axes(&self) -> Vec<&'static str> {
        let overall = self.overall_levels().levels();
        let mechanical = self.max_across_posts().levels();
        AxisLevels::LABELS
            .iter()
            .zip(overall.iter().zip(mechanical.iter()))
            .filter(|(_, (o, m))| m > o)
            .map(|(label, _)| *label)
            .collect()
    }

    /// Overall levels as chart points: none=0 .. critical=4
    pub fn chart(&self) -> Vec<(&'static str, u8)> {
        AxisLevels::LABELS
            .iter()
            .copied()
            .zip(self.overall_levels().levels().iter().map(|l| l.ordinal()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::profile::fixtures::post;
    use serde_json::json;

    #[test]
    fn test_payload_is_post_array() {
        let posts = vec![
            post("p1", "u1", "first"),
            post("p2", "u1", "second"),
        ];
        let payload = ContentAgent { posts: &posts }.payload().unwrap();
        let value: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(
            value,
            json!([
                {"post_id": "p1", "text": "first"},
                {"post_id": "p2", "text": "second"}
            ])
        );
    }

    #[test]
    fn test_empty_posts_payload() {
        assert_eq!(ContentAgent { posts: &[] }.payload().unwrap(), "[]");
    }

    fn sample() -> Value {
        json!({
            "per_post": [
                {"post_id": "p1", "text": "a", "bullying_risk": "low", "self_harm_risk": "high",
                 "sexual_exploitation_risk": "none", "substance_abuse_risk": "none", "notes": "n1"},
                {"post_id": "p2", "text": "b", "bullying_risk": "medium", "self_harm_risk": "none",
                 "sexual_exploitation_risk": "bogus", "substance_abuse_risk": "Low"},
                "not an object"
            ],
            "overall": {
                "bullying_risk": "medium",
                "self_harm_risk": "medium",
                "sexual_exploitation_risk": "none",
                "substance_abuse_risk": "low",
                "summary": "concerning"
            }
        })
    }

    #[test]
    fn test_parse_per_post_and_overall() {
        let a = ContentAssessment::parse_result(&sample());
        assert_eq!(a.per_post.len(), 2);
        assert_eq!(a.per_post[0].levels.self_harm, RiskLevel::High);
        assert_eq!(a.per_post[0].notes, "n1");
        assert_eq!(a.per_post[1].levels.sexual_exploitation, RiskLevel::None);
        assert_eq!(a.per_post[1].levels.substance_abuse, RiskLevel::Low);
        assert_eq!(a.overall_levels().bullying, RiskLevel::Medium);
        assert_eq!(a.summary, "concerning");
    }

    #[test]
    fn test_max_across_posts_and_understated_axes() {
        let a = ContentAssessment::parse_result(&sample());
        let max = a.max_across_posts();
        assert_eq!(max.bullying, RiskLevel::Medium);
        assert_eq!(max.self_harm, RiskLevel::High);
        assert_eq!(a.understated_axes(), vec!["self_harm"]);
    }

    #[test]
    fn test_chart_uses_ordinals() {
        let a = ContentAssessment::parse_result(&sample());
        assert_eq!(
            a.chart(),
            vec![
                ("bullying", 2),
                ("self_harm", 2),
                ("sexual_exploitation", 0),
                ("substance_abuse", 1)
            ]
        );
    }

    #[test]
    fn test_missing_overall_defaults_to_none() {
        let a = ContentAssessment::parse_result(&json!({}));
        assert!(a.overall.is_none());
        assert!(a.per_post.is_empty());
        assert_eq!(a.overall_levels().highest(), RiskLevel::None);
        assert!(a.chart().iter().all(|(_, v)| *v == 0));
        assert!(a.understated_axes().is_empty());
    }
}
