pub mod error;
pub mod profile;
pub mod risk;
pub mod utils;

pub use error::{AuditError, ErrorCategory, ErrorClassifier, LlmError, Result};
pub use profile::{
    AccountType, AgeIndex, AnnotatedInteraction, Interaction, Post, PostExcerpt, UserProfile,
    parse_timestamp,
};
pub use risk::{RecommendedAction, RiskLevel};
pub use utils::{
    capitalize_first, json_bool, json_score, json_string, json_string_array, json_string_or,
    truncate_chars,
};
