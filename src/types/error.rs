//! Unified Error Type System
//!
//! Centralized error types for the audit pipeline.
//!
//! ## Taxonomy
//!
//! - **Configuration**: no usable backend credential; raised before any agent runs
//! - **Backend call**: transport/auth/quota failure of a single invocation; fatal
//! - **Stage**: a fatal error annotated with the agent stage that produced it
//!
//! Malformed backend output and unresolved user references are recovered
//! locally and never surface as `AuditError`.

use thiserror::Error;

use crate::audit::AgentRole;

// =============================================================================
// Error Categories
// =============================================================================

/// Categories for backend failures, used to phrase user-visible messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited or quota exhausted
    RateLimit,
    /// Authentication failed
    Auth,
    /// Network/connectivity issues
    Network,
    /// Provider unavailable
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Temporary server issues
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Short hint shown next to the error in the CLI
    pub fn hint(&self) -> &'static str {
        match self {
            Self::RateLimit => "the backend is rate limiting requests; try again later",
            Self::Auth => "check the configured API key",
            Self::Network => "check network connectivity and the configured api_base",
            Self::Unavailable => "the backend is unavailable",
            Self::BadRequest => "the backend rejected the request",
            Self::Transient => "the backend reported a temporary failure",
            Self::Unknown => "unexpected backend failure",
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Backend error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    pub category: ErrorCategory,
    pub message: String,
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw backend failures onto an `ErrorCategory`
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify HTTP status code directly
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify a transport-level failure from its message
    pub fn classify(message: &str, provider: &str) -> LlmError {
        let lower = message.to_lowercase();

        let category = if lower.contains("rate limit")
            || lower.contains("too many requests")
            || lower.contains("quota")
        {
            ErrorCategory::RateLimit
        } else if lower.contains("unauthorized")
            || lower.contains("api key")
            || lower.contains("permission denied")
        {
            ErrorCategory::Auth
        } else if lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("timed out")
            || lower.contains("timeout")
        {
            ErrorCategory::Network
        } else if lower.contains("service unavailable") || lower.contains("overloaded") {
            ErrorCategory::Unavailable
        } else {
            ErrorCategory::Unknown
        };

        LlmError::with_provider(category, message, provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum AuditError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // -------------------------------------------------------------------------
    // Backend Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    /// Structured backend error with category
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Simple backend error
    #[error("LLM API error: {0}")]
    LlmApi(String),

    // -------------------------------------------------------------------------
    // Pipeline Errors
    // -------------------------------------------------------------------------
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: AgentRole,
        #[source]
        source: Box<AuditError>,
    },

    // -------------------------------------------------------------------------
    // Data Errors
    // -------------------------------------------------------------------------
    #[error("Data error: {0}")]
    Data(String),

    #[error("User not found: {0}")]
    UserNotFound(String),
}

impl From<LlmError> for AuditError {
    fn from(err: LlmError) -> Self {
        AuditError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

impl AuditError {
    /// Attach the failing stage to an error
    pub fn at_stage(self, stage: AgentRole) -> Self {
        match self {
            // Configuration problems are not stage failures
            Self::Config(_) | Self::Stage { .. } => self,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// True for missing/invalid credential or configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Stage that failed, if this error came out of the pipeline
    pub fn stage(&self) -> Option<AgentRole> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Backend category of the underlying failure, if known
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Llm(e) => Some(e.category),
            Self::Stage { source, .. } => source.category(),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
