//! Config command implementation
//!
//! Prints the effective configuration or writes a starter file.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, Message};
use crate::config::{Config, ConfigFile};
use crate::error::{ConfigError, Result};

use std::path::{Path, PathBuf};

/// Execute `config show`
pub fn run_config_show(config: &Config, format: OutputFormat) -> Result<()> {
    print_output(config, format)?;
    Ok(())
}

/// Execute `config init`
pub fn run_config_init(path: Option<&Path>, force: bool, format: OutputFormat) -> Result<()> {
    let path = init_target(path)?;

    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.display().to_string()).into());
    }

    ConfigFile::save(&Config::template(), &path)?;
    log::info!("Wrote starter configuration to {}", path.display());

    let msg = Message::success(format!("Configuration written to {}", path.display()));
    print_output(&msg, format)?;

    Ok(())
}

fn init_target(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => ConfigFile::user_path()
            .ok_or_else(|| ConfigError::MissingField("--path".to_string()).into()),
    }
}
