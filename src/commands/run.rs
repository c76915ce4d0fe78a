//! Run command implementation
//!
//! Builds the sensor, notifier and alert engine from configuration and runs
//! the monitoring loop.

use crate::cli::args::{OutputFormat, RunArgs};
use crate::cli::output::print_output;
use crate::config::Config;
use crate::error::Result;
use crate::services::AlertEngine;

use std::time::Duration;

/// Execute the run command
pub fn run_monitor(args: &RunArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let mut engine = build_engine(config)?;
    let duration = (args.duration > 0).then(|| Duration::from_secs(args.duration));

    engine.start(duration)?;
    engine.wait();

    print_output(&engine.status(), format)?;

    Ok(())
}

/// Construct an engine; every configuration error surfaces here
pub fn build_engine(config: &Config) -> Result<AlertEngine> {
    let policy = config.alert.to_policy()?;
    let state = config.alert.to_state()?;
    let notifier = config.notification.build()?;
    let sensor = config.sensor()?.build()?;

    log::info!(
        "Monitoring {} sensor: threshold {}°C, hysteresis {}°C, rate limit {}°C/min, {} notifications via {}",
        sensor.name(),
        policy.threshold(),
        policy.hysteresis(),
        policy.rate_threshold(),
        policy.notify_mode(),
        notifier.name()
    );

    Ok(AlertEngine::with_state(policy, sensor, notifier, state))
}
