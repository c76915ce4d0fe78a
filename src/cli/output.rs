//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::config::Config;
use crate::services::EngineStatus;
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

fn format_reading(reading: Option<f64>) -> String {
    reading
        .map(|t| format!("{}°C", t))
        .unwrap_or_else(|| "n/a".to_string())
}

impl TableDisplay for EngineStatus {
    fn to_table(&self) -> String {
        format!(
            "Monitoring: {}\n  Current Reading: {}\n  Alarm: {}\n  Last Check: {}\n  Readings Recorded: {}",
            if self.running { "running" } else { "stopped" },
            format_reading(self.current_reading),
            if self.alarm_active { "ACTIVE" } else { "inactive" },
            self.last_check
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "never".to_string()),
            self.history_count
        )
    }

    fn to_compact(&self) -> String {
        format!(
            "running={} temp={} alarm={} history={}",
            self.running,
            self.current_reading
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.alarm_active,
            self.history_count
        )
    }
}

/// A single sensor reading for display
#[derive(Debug, Clone, Serialize)]
pub struct ReadingOutput {
    pub sensor: String,
    pub temperature: f64,
}

impl TableDisplay for ReadingOutput {
    fn to_table(&self) -> String {
        format!("Sensor: {}\n  Temperature: {}°C", self.sensor, self.temperature)
    }

    fn to_compact(&self) -> String {
        format!("{}:{}", self.sensor, self.temperature)
    }
}

impl TableDisplay for Config {
    fn to_table(&self) -> String {
        toml::to_string_pretty(self)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|e| format!("<unrenderable configuration: {}>", e))
    }

    fn to_compact(&self) -> String {
        format!(
            "sensor={} threshold={} interval={}s notify={}",
            self.sensor.as_ref().map(|s| s.kind()).unwrap_or("none"),
            self.alert
                .threshold
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.alert.check_interval,
            self.notification.kind()
        )
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl Message {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}
