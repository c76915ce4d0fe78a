//! Read command implementation
//!
//! Takes one reading from the configured sensor.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, ReadingOutput};
use crate::config::Config;
use crate::error::{AppError, Result};

/// Execute the read command
pub fn run_read(config: &Config, format: OutputFormat) -> Result<()> {
    let sensor = config.sensor()?.build()?;

    let temperature = sensor
        .read_temperature()
        .ok_or_else(|| AppError::NoReading(format!("{} sensor", sensor.name())))?;

    let reading = ReadingOutput {
        sensor: sensor.name().to_string(),
        temperature,
    };
    print_output(&reading, format)?;

    Ok(())
}
