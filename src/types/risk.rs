//! Risk levels and enforcement actions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal risk level: none < low < medium < high < critical
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Position on the 0-4 chart scale
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Parse a level as emitted by the backend, tolerating case and padding.
    ///
    /// Unknown words yield `RiskLevel::None` so a confused answer reads as
    /// "no information" rather than as a finding.
    pub fn parse_lenient(s: &str) -> RiskLevel {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(RiskLevel::None),
            "low" => Ok(RiskLevel::Low),
            "medium" | "moderate" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" | "severe" => Ok(RiskLevel::Critical),
            _ => Err(format!(
                "Unknown risk level: {}. Valid values: none, low, medium, high, critical",
                s
            )),
        }
    }
}

/// Enforcement action recommended by the policy stage, mildest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    Monitor,
    Warn,
    RestrictFeatures,
    EscalateToSafetyTeam,
    TemporarySuspension,
}

impl RecommendedAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendedAction::Monitor => "monitor",
            RecommendedAction::Warn => "warn",
            RecommendedAction::RestrictFeatures => "restrict_features",
            RecommendedAction::EscalateToSafetyTeam => "escalate_to_safety_team",
            RecommendedAction::TemporarySuspension => "temporary_suspension",
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendedAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "monitor" => Ok(RecommendedAction::Monitor),
            "warn" | "warning" => Ok(RecommendedAction::Warn),
            "restrict_features" => Ok(RecommendedAction::RestrictFeatures),
            "escalate_to_safety_team" | "escalate" => Ok(RecommendedAction::EscalateToSafetyTeam),
            "temporary_suspension" | "suspend" => Ok(RecommendedAction::TemporarySuspension),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}
