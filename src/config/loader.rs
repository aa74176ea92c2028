//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/riskaudit/config.toml)
//! 3. Project config (.riskaudit/config.toml)
//! 4. Environment variables (RISKAUDIT_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::constants::llm;
use crate::types::{AuditError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. RISKAUDIT_LLM_MODEL -> llm.model
        figment = figment.merge(Env::prefixed("RISKAUDIT_").split('_').lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| AuditError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| AuditError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/riskaudit/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("riskaudit"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project settings directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".riskaudit")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());

        let key_state = if env::var(llm::API_KEY_ENV).is_ok() {
            "set"
        } else {
            "not set"
        };
        println!("  {}: {}", llm::API_KEY_ENV, key_state);
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| AuditError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            AuditError::Config("Cannot determine global config directory".to_string())
        })?;
        let config_path = global_dir.join("config.toml");
        Self::write_default(&config_path, force)?;
        Ok(config_path)
    }

    /// Initialize project configuration
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let config_path = Self::project_config_path();
        Self::write_default(&config_path, force)?;
        Ok(config_path)
    }

    fn write_default(config_path: &Path, force: bool) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !config_path.exists() || force {
            fs::write(config_path, Self::default_config())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }
        Ok(())
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Default config content (TOML). The credential is read from the
    /// environment and deliberately absent here.
    fn default_config() -> String {
        format!(
            r#"# RiskAudit Configuration
# Project settings in .riskaudit/config.toml override ~/.config/riskaudit/config.toml.
# The backend credential is read from {key_env}.

[llm]
provider = "openai"
model = "{model}"
timeout_secs = {timeout}
temperature = 0.0

[data]
dir = "data"
policies = "policies/safety_policies.txt"

[audit]
concurrent_detection = true

[audit.max_tokens]
underage = 400
content = 1000
interaction = 800
policy = 600
report = 900
"#,
            key_env = llm::API_KEY_ENV,
            model = llm::DEFAULT_MODEL,
            timeout = llm::DEFAULT_TIMEOUT_SECS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenBudgets;
    use tempfile::TempDir;

    #[test]
    fn test_default_template_matches_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, ConfigLoader::default_config()).unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        let defaults = Config::default();
        assert_eq!(config.llm.model, defaults.llm.model);
        assert_eq!(config.llm.timeout_secs, defaults.llm.timeout_secs);
        assert_eq!(config.data.policies, defaults.data.policies);
        assert_eq!(config.audit.max_tokens, TokenBudgets::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[llm]\nmodel = \"gpt-4o\"\n\n[audit]\nconcurrent_detection = false\n\n[audit.max_tokens]\nreport = 1500\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.provider, "openai");
        assert!(!config.audit.concurrent_detection);
        assert_eq!(config.audit.max_tokens.report, 1500);
        assert_eq!(config.audit.max_tokens.content, 1000);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[llm]\ntemperature = 3.0\n").unwrap();
        assert!(
            ConfigLoader::load_from_file(&path)
                .unwrap_err()
                .is_configuration()
        );
    }

    #[test]
    fn test_write_default_respects_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        ConfigLoader::write_default(&path, false).unwrap();
        assert!(path.exists());

        fs::write(&path, "# edited\n").unwrap();
        ConfigLoader::write_default(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# edited\n");

        ConfigLoader::write_default(&path, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[audit.max_tokens]"));
    }

    #[test]
    fn test_env_override() {
        // SAFETY: no other test reads this variable
        unsafe {
            std::env::set_var("RISKAUDIT_LLM_MODEL", "env-model");
        }
        let config = ConfigLoader::load();
        unsafe {
            std::env::remove_var("RISKAUDIT_LLM_MODEL");
        }
        assert_eq!(config.unwrap().llm.model, "env-model");
    }
}
