//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use crate::config::SensorOverrides;
use crate::domain::NotifyMode;
use crate::sensors::SensorKind;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Temperature alert monitor
///
/// Polls a temperature sensor and sends notifications when the reading
/// crosses a threshold or changes too quickly.
#[derive(Parser, Debug)]
#[command(name = "thermwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, global = true, env = "THERMWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub sensor: SensorArgs,

    #[command(flatten)]
    pub alert: AlertArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Sensor selection overrides
#[derive(Args, Debug, Clone, Default)]
pub struct SensorArgs {
    /// Sensor type
    #[arg(long, global = true, value_enum)]
    pub sensor_type: Option<SensorKind>,

    /// Temperature file (file sensor)
    #[arg(long, global = true)]
    pub file_path: Option<PathBuf>,

    /// JSON endpoint (http sensor)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Broker as HOST[:PORT] (mqtt sensor)
    #[arg(long, global = true)]
    pub broker: Option<String>,

    /// Topic to subscribe to (mqtt sensor)
    #[arg(long, global = true)]
    pub topic: Option<String>,

    /// GPIO pin of the 1-wire bus (gpio sensor)
    #[arg(long, global = true)]
    pub pin: Option<u32>,
}

impl From<SensorArgs> for SensorOverrides {
    fn from(args: SensorArgs) -> Self {
        Self {
            sensor_type: args.sensor_type,
            file_path: args.file_path,
            url: args.url,
            broker: args.broker,
            topic: args.topic,
            pin: args.pin,
        }
    }
}

/// Alert setting overrides
#[derive(Args, Debug, Clone, Default)]
pub struct AlertArgs {
    /// Temperature threshold in °C
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub threshold: Option<f64>,

    /// Check interval in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Hysteresis margin in °C
    #[arg(long, global = true)]
    pub hysteresis: Option<f64>,

    /// Rate-of-change threshold in °C per minute
    #[arg(long, global = true)]
    pub rate_threshold: Option<f64>,

    /// When threshold notifications are sent
    #[arg(long, global = true, value_enum)]
    pub notify_mode: Option<NotifyModeArg>,
}

/// Notification mode argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum NotifyModeArg {
    /// Every cycle while the alarm is active
    Level,
    /// Once on alarm and once on recovery
    Edge,
}

impl From<NotifyModeArg> for NotifyMode {
    fn from(arg: NotifyModeArg) -> Self {
        match arg {
            NotifyModeArg::Level => NotifyMode::Level,
            NotifyModeArg::Edge => NotifyMode::Edge,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start monitoring and alerting
    Run(RunArgs),

    /// Take a single reading from the sensor
    Read,

    /// Send a test notification through the configured channel
    NotifyTest(NotifyTestArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Stop after this many seconds (0 = run until interrupted)
    #[arg(short, long, default_value = "0")]
    pub duration: u64,
}

/// Arguments for the notify-test command
#[derive(Parser, Debug)]
pub struct NotifyTestArgs {
    /// Message to send
    #[arg(short, long, default_value = "Test notification from thermwatch")]
    pub message: String,
}

/// Arguments for config commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a starter configuration file
    Init {
        /// Destination (defaults to the per-user config path)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
