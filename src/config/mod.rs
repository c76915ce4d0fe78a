//! Configuration system
//!
//! Handles TOML/JSON config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::{ConfigBuilder, SensorOverrides};
pub use file::ConfigFile;

use crate::alerts::{ClassificationState, NotifierConfig};
use crate::domain::{
    AlertPolicy, NotifyMode, ReadingHistory, DEFAULT_CHECK_INTERVAL, DEFAULT_HISTORY_CAPACITY,
    DEFAULT_HYSTERESIS, DEFAULT_RATE_THRESHOLD,
};
use crate::error::{ConfigError, DomainError};
use crate::sensors::SensorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Temperature source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor: Option<SensorConfig>,
    /// Alert thresholds and timing
    pub alert: AlertSettings,
    /// Notification channel
    pub notification: NotifierConfig,
}

impl Config {
    /// Starting point written by `config init`
    pub fn template() -> Self {
        Self {
            sensor: Some(SensorConfig::File {
                path: PathBuf::from("/sys/bus/w1/devices/28-000000000000/w1_slave"),
            }),
            alert: AlertSettings {
                threshold: Some(30.0),
                ..AlertSettings::default()
            },
            notification: NotifierConfig::default(),
        }
    }

    /// Configured sensor, or an error if none was given
    pub fn sensor(&self) -> Result<&SensorConfig, ConfigError> {
        self.sensor
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField("sensor".to_string()))
    }
}

/// Alert settings as written in the `[alert]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Alarm threshold in Celsius (required)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Hysteresis margin in Celsius
    pub hysteresis: f64,
    /// Polling period in seconds
    pub check_interval: u64,
    /// Rate-of-change bound in Celsius per minute
    #[serde(alias = "rate_threshold")]
    pub rate_of_change_threshold: f64,
    /// Threshold notification mode
    pub notify_mode: NotifyMode,
    /// Number of readings kept in memory
    pub history_size: usize,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            threshold: None,
            hysteresis: DEFAULT_HYSTERESIS,
            check_interval: DEFAULT_CHECK_INTERVAL.as_secs(),
            rate_of_change_threshold: DEFAULT_RATE_THRESHOLD,
            notify_mode: NotifyMode::default(),
            history_size: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl AlertSettings {
    /// Convert to a validated AlertPolicy
    pub fn to_policy(&self) -> crate::Result<AlertPolicy> {
        let threshold = self
            .threshold
            .ok_or_else(|| ConfigError::MissingField("alert.threshold".to_string()))?;

        let policy = AlertPolicy::new(
            threshold,
            self.hysteresis,
            Duration::from_secs(self.check_interval),
            self.rate_of_change_threshold,
        )?;

        Ok(policy.with_notify_mode(self.notify_mode))
    }

    /// Fresh classification state with the configured history size
    pub fn to_state(&self) -> Result<ClassificationState, DomainError> {
        let history = ReadingHistory::with_capacity(self.history_size)?;
        Ok(ClassificationState::with_history(history))
    }
}
