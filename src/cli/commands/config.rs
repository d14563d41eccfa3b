//! Config Command
//!
//! Usage:
//!   bizgen config show [-f json|toml]
//!   bizgen config path
//!   bizgen config init [-g] [--force]

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::{BizError, Result};

/// Show the merged effective configuration
pub fn show(format: &str) -> Result<()> {
    match format {
        "json" => ConfigLoader::show_config(true),
        "toml" | "text" => ConfigLoader::show_config(false),
        other => Err(BizError::Config(format!(
            "Unknown format '{}'. Valid values: toml, json",
            other
        ))),
    }
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default config file
pub fn init(global: bool, force: bool) -> Result<()> {
    let output = Output::new();
    let path = if global {
        ConfigLoader::global_config_path()
            .ok_or_else(|| BizError::Config("Cannot determine global config directory".into()))?
    } else {
        ConfigLoader::project_config_path()
    };

    if ConfigLoader::init_at(&path, force)? {
        output.success(&format!("Initialized configuration: {}", path.display()));
    } else {
        output.warning(&format!(
            "Config already exists: {} (use --force to overwrite)",
            path.display()
        ));
    }
    Ok(())
}
