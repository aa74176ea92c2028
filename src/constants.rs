//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// Age recorded for an interaction party absent from the user set
pub const UNKNOWN_AGE: i32 = -1;

/// Reasoning backend constants
pub mod llm {
    /// Default OpenAI-compatible endpoint
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

    /// Default model
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

    /// Environment variable holding the backend credential
    pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

    /// Placeholder shipped in sample configs; never a valid credential
    pub const API_KEY_PLACEHOLDER: &str = "YOUR_OPENAI_API_KEY_HERE";

    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
}

/// Output token budgets per agent role
pub mod tokens {
    pub const UNDERAGE: u32 = 400;
    pub const CONTENT: u32 = 1000;
    pub const INTERACTION: u32 = 800;
    pub const POLICY: u32 = 600;
    pub const REPORT: u32 = 900;
}

/// Dataset and report file names
pub mod files {
    pub const USERS_CSV: &str = "users.csv";
    pub const POSTS_CSV: &str = "posts.csv";
    pub const INTERACTIONS_CSV: &str = "interactions.csv";

    /// Policy corpus used when the configured file does not exist
    pub const MISSING_POLICIES: &str = "No policies found.";

    /// Title used when the report stage returned none
    pub const DEFAULT_REPORT_TITLE: &str = "Safety Report";
}
