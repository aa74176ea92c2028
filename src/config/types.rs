//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/riskaudit/) and project (.riskaudit/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::ProviderConfig;
use crate::audit::AgentRole;
use crate::constants::llm;
use crate::types::{AuditError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reasoning backend settings
    pub llm: LlmConfig,

    /// Dataset locations
    pub data: DataConfig,

    /// Pipeline settings
    pub audit: AuditConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `AuditError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AuditError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(AuditError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        for role in AgentRole::ALL {
            if self.audit.max_tokens.for_role(role) == 0 {
                return Err(AuditError::Config(format!(
                    "audit.max_tokens.{} must be greater than 0",
                    role
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name
    pub provider: String,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,

    /// Override for the chat-completions endpoint base URL
    pub api_base: Option<String>,

    /// Credential; falls back to the OPENAI_API_KEY environment variable.
    /// Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: llm::DEFAULT_MODEL.to_string(),
            timeout_secs: llm::DEFAULT_TIMEOUT_SECS,
            temperature: 0.0,
            api_base: None,
            api_key: None,
        }
    }
}

impl LlmConfig {
    pub fn to_provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider.clone(),
            model: Some(self.model.clone()),
            timeout_secs: self.timeout_secs,
            temperature: self.temperature,
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
        }
    }
}

// =============================================================================
// Data Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding users.csv, posts.csv and interactions.csv
    pub dir: PathBuf,

    /// Policy corpus file
    pub policies: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            policies: PathBuf::from("policies/safety_policies.txt"),
        }
    }
}

// =============================================================================
// Audit Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Run the three detection agents concurrently
    pub concurrent_detection: bool,

    /// Output token budget per role
    pub max_tokens: TokenBudgets,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            concurrent_detection: true,
            max_tokens: TokenBudgets::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenBudgets {
    pub underage: u32,
    pub content: u32,
    pub interaction: u32,
    pub policy: u32,
    pub report: u32,
}

impl Default for TokenBudgets {
    fn default() -> Self {
        let budget = |role: AgentRole| role.spec().default_max_tokens;
        Self {
            underage: budget(AgentRole::Underage),
            content: budget(AgentRole::Content),
            interaction: budget(AgentRole::Interaction),
            policy: budget(AgentRole::Policy),
            report: budget(AgentRole::Report),
        }
    }
}

impl TokenBudgets {
    pub fn for_role(&self, role: AgentRole) -> u32 {
        match role {
            AgentRole::Underage => self.underage,
            AgentRole::Content => self.content,
            AgentRole::Interaction => self.interaction,
            AgentRole::Policy => self.policy,
            AgentRole::Report => self.report,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
