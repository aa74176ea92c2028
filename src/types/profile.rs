//! User, post and interaction records supplied by the data store.
//!
//! All records are plain values: the pipeline borrows them and never mutates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::constants::UNKNOWN_AGE;

// =============================================================================
// Account Type
// =============================================================================

/// Account category; unrecognised values are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountType {
    #[default]
    Standard,
    Creator,
    Business,
    Other(String),
}

impl AccountType {
    pub fn as_str(&self) -> &str {
        match self {
            AccountType::Standard => "standard",
            AccountType::Creator => "creator",
            AccountType::Business => "business",
            AccountType::Other(raw) => raw,
        }
    }
}

impl From<String> for AccountType {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "standard" => AccountType::Standard,
            "creator" => AccountType::Creator,
            "business" => AccountType::Business,
            _ => AccountType::Other(raw),
        }
    }
}

impl From<AccountType> for String {
    fn from(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    /// Declared age
    pub age: i32,
    pub account_type: AccountType,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: String,
    pub user_id: String,
    pub text: String,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
}

impl Post {
    /// The `post_id` + `text` view sent to the backend
    pub fn excerpt(&self) -> PostExcerpt<'_> {
        PostExcerpt {
            post_id: &self.post_id,
            text: &self.text,
        }
    }
}

/// Post fields shared with the reasoning backend
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PostExcerpt<'a> {
    pub post_id: &'a str,
    pub text: &'a str,
}

/// Direct message; directional in meaning (from → to)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub interaction_id: String,
    pub from_user: String,
    pub to_user: String,
    /// Channel, e.g. `dm`; absent when the source has no such column
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub text: String,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
}

impl Interaction {
    /// True if `user_id` is the sender or the receiver
    pub fn involves(&self, user_id: &str) -> bool {
        self.from_user == user_id || self.to_user == user_id
    }
}

/// Interaction plus the ages of both parties, resolved at pipeline entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedInteraction {
    #[serde(flatten)]
    pub interaction: Interaction,
    pub from_age: i32,
    pub to_age: i32,
}

// =============================================================================
// Age Index
// =============================================================================

/// Declared-age lookup over the full user set
#[derive(Debug, Clone, Default)]
pub struct AgeIndex {
    ages: HashMap<String, i32>,
}

impl AgeIndex {
    pub fn from_users(users: &[UserProfile]) -> Self {
        let mut ages = HashMap::with_capacity(users.len());
        for user in users {
            // First row wins, matching Dataset::user
            ages.entry(user.user_id.clone()).or_insert(user.age);
        }
        Self { ages }
    }

    /// Declared age, or `UNKNOWN_AGE` for an id absent from the user set
    pub fn age_of(&self, user_id: &str) -> i32 {
        match self.ages.get(user_id) {
            Some(age) => *age,
            None => {
                tracing::warn!(
                    "Unresolved user reference '{}', using age {}",
                    user_id,
                    UNKNOWN_AGE
                );
                UNKNOWN_AGE
            }
        }
    }

    pub fn annotate(&self, interaction: &Interaction) -> AnnotatedInteraction {
        AnnotatedInteraction {
            from_age: self.age_of(&interaction.from_user),
            to_age: self.age_of(&interaction.to_user),
            interaction: interaction.clone(),
        }
    }

    pub fn annotate_all(&self, interactions: &[Interaction]) -> Vec<AnnotatedInteraction> {
        interactions.iter().map(|i| self.annotate(i)).collect()
    }
}

// =============================================================================
// Timestamps
// =============================================================================

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` (optionally with `T`) or RFC 3339
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in [TIMESTAMP_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(super::TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(
            parse_timestamp("2024-01-01").unwrap().to_string(),
            "2024-01-01 00:00:00"
        );
        assert_eq!(
            parse_timestamp("2024-03-15 10:30:00").unwrap().to_string(),
            "2024-03-15 10:30:00"
        );
        assert_eq!(
            parse_timestamp("2024-03-15T10:30:00Z").unwrap().to_string(),
            "2024-03-15 10:30:00"
        );
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_account_type_serde() {
        let t: AccountType = serde_json::from_str("\"creator\"").unwrap();
        assert_eq!(t, AccountType::Creator);
        let other: AccountType = serde_json::from_str("\"personal\"").unwrap();
        assert_eq!(other, AccountType::Other("personal".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"personal\"");
        assert_eq!(serde_json::to_string(&AccountType::Business).unwrap(), "\"business\"");
    }

    #[test]
    fn test_age_index_sentinel_for_unknown_user() {
        let index = AgeIndex::from_users(&[user("u1", 30), user("u2", 14)]);
        let annotated = index.annotate(&dm("i1", "u1", "ghost", "hi"));
        assert_eq!(annotated.from_age, 30);
        assert_eq!(annotated.to_age, UNKNOWN_AGE);
    }

    #[test]
    fn test_annotated_interaction_serializes_flat() {
        let index = AgeIndex::from_users(&[user("u1", 30), user("u2", 14)]);
        let annotated = index.annotate(&dm("i1", "u1", "u2", "keep this secret"));

        let value = serde_json::to_value(&annotated).unwrap();
        assert_eq!(value["interaction_id"], "i1");
        assert_eq!(value["type"], "dm");
        assert_eq!(value["from_age"], 30);
        assert_eq!(value["to_age"], 14);
        assert_eq!(value["timestamp"], "2024-03-05 00:00:00");
    }

    #[test]
    fn test_post_excerpt_drops_owner_and_time() {
        let p = post("p1", "u1", "Exam went well today.");
        let value = serde_json::to_value(p.excerpt()).unwrap();
        assert_eq!(value, serde_json::json!({"post_id": "p1", "text": "Exam went well today."}));
    }

    #[test]
    fn test_interaction_involves() {
        let i = dm("i1", "u1", "u2", "hey");
        assert!(i.involves("u1"));
        assert!(i.involves("u2"));
        assert!(!i.involves("u3"));
    }
}
