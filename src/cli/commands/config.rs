//! Config Command
//!
//! Manage riskaudit configuration.
//!
//! Usage:
//!   riskaudit config show [-g] [-f json]
//!   riskaudit config path
//!   riskaudit config init [-g] [--force]

use crate::cli::ui::Output;
use crate::cli::util::OutputFormat;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show configuration
pub fn show(global: bool, format: OutputFormat) -> Result<()> {
    if global {
        match ConfigLoader::global_config_path() {
            Some(global_path) if global_path.exists() => {
                let content = std::fs::read_to_string(&global_path)?;
                println!("# Global Config: {}\n", global_path.display());
                println!("{}", content);
            }
            Some(_) => {
                println!("No global config found.");
                println!("Run 'riskaudit config init --global' to create one.");
            }
            None => println!("Cannot determine global config directory."),
        }
    } else {
        ConfigLoader::show_config(format == OutputFormat::Json)?;
    }
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global or project configuration
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };
    let scope = if global { "global" } else { "project" };
    Output::new().success(&format!("Initialized {} configuration", scope));
    println!("  Config: {}", path.display());
    Ok(())
}
