//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod config;
pub mod notify;
pub mod read;
pub mod run;

pub use config::{run_config_init, run_config_show};
pub use notify::run_notify_test;
pub use read::run_read;
pub use run::run_monitor;

use crate::cli::Cli;
use crate::config::{Config, ConfigBuilder};
use crate::error::Result;

/// Effective configuration: file first, then CLI overrides
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_sensor(cli.sensor.clone().into())?
        .with_threshold(cli.alert.threshold)
        .with_hysteresis(cli.alert.hysteresis)
        .with_interval(cli.alert.interval)
        .with_rate_threshold(cli.alert.rate_threshold)
        .with_notify_mode(cli.alert.notify_mode.map(Into::into))
        .build();

    Ok(config)
}
