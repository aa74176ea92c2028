//! CLI Common Utilities
//!
//! Shared configuration handling for command handlers.

use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Output format for commands that can emit JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format '{}'. Valid values: text, json", s)),
        }
    }
}

/// CLI flags that take precedence over every configuration layer
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub policies: Option<PathBuf>,
    pub model: Option<String>,
    pub sequential: bool,
}

/// Command execution context
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Effective configuration, CLI flags applied
    pub config: Config,
}

impl CommandContext {
    /// Load layered configuration and apply CLI overrides
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        Self::from_config(ConfigLoader::load()?, overrides)
    }

    pub fn from_config(mut config: Config, overrides: &ConfigOverrides) -> Result<Self> {
        if let Some(dir) = &overrides.data_dir {
            config.data.dir = dir.clone();
        }
        if let Some(policies) = &overrides.policies {
            config.data.policies = policies.clone();
        }
        if let Some(model) = &overrides.model {
            config.llm.model = model.clone();
        }
        if overrides.sequential {
            config.audit.concurrent_detection = false;
        }

        config.validate()?;
        Ok(Self { config })
    }
}
