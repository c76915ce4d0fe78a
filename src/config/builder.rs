//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::domain::NotifyMode;
use crate::error::ConfigError;
use crate::sensors::{SensorConfig, SensorKind};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Sensor selection given on the command line
///
/// Fields left as `None` fall back to the configured sensor when it is of
/// the same type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorOverrides {
    pub sensor_type: Option<SensorKind>,
    pub file_path: Option<PathBuf>,
    pub url: Option<String>,
    pub broker: Option<String>,
    pub topic: Option<String>,
    pub pin: Option<u32>,
}

impl SensorOverrides {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge onto an existing sensor configuration
    fn apply(self, current: Option<SensorConfig>) -> Result<Option<SensorConfig>, ConfigError> {
        if self.is_empty() {
            return Ok(current);
        }

        let kind = match (self.sensor_type, &current) {
            (Some(kind), _) => kind,
            (None, Some(existing)) => existing.sensor_kind(),
            (None, None) => return Err(ConfigError::MissingField("--sensor-type".to_string())),
        };

        // Only reuse fields from a configured sensor of the same type.
        let base = current.filter(|existing| existing.sensor_kind() == kind);

        let sensor = match kind {
            SensorKind::File => {
                let existing = match base {
                    Some(SensorConfig::File { path }) => Some(path),
                    _ => None,
                };
                SensorConfig::File {
                    path: required(self.file_path.or(existing), "--file-path")?,
                }
            }
            SensorKind::Http => {
                let (existing_url, headers) = match base {
                    Some(SensorConfig::Http { url, headers }) => (Some(url), headers),
                    _ => (None, BTreeMap::new()),
                };
                SensorConfig::Http {
                    url: required(self.url.or(existing_url), "--url")?,
                    headers,
                }
            }
            SensorKind::Mqtt => {
                let (existing_broker, existing_topic) = match base {
                    Some(SensorConfig::Mqtt { broker, topic }) => (Some(broker), Some(topic)),
                    _ => (None, None),
                };
                SensorConfig::Mqtt {
                    broker: required(self.broker.or(existing_broker), "--broker")?,
                    topic: required(self.topic.or(existing_topic), "--topic")?,
                }
            }
            SensorKind::Gpio => {
                let (existing_pin, w1_root) = match base {
                    Some(SensorConfig::Gpio { pin, w1_root }) => (Some(pin), w1_root),
                    _ => (None, crate::sensors::gpio::default_w1_root()),
                };
                SensorConfig::Gpio {
                    pin: required(self.pin.or(existing_pin), "--pin")?,
                    w1_root,
                }
            }
        };

        Ok(Some(sensor))
    }
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingField(flag.to_string()))
}

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Start from an already loaded configuration
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must exist. Without one the default locations are
    /// searched and a missing file leaves the defaults in place.
    pub fn with_file(mut self, path: Option<&Path>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => {
                let config = ConfigFile::load(path)?;
                log::info!("Loaded config from {}", path.display());
                Some(config)
            }
            None => ConfigFile::load_default()?,
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override the sensor from CLI arguments
    pub fn with_sensor(mut self, overrides: SensorOverrides) -> Result<Self, ConfigError> {
        self.config.sensor = overrides.apply(self.config.sensor.take())?;
        Ok(self)
    }

    /// Override with CLI threshold
    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        if let Some(t) = threshold {
            self.config.alert.threshold = Some(t);
        }
        self
    }

    /// Override with CLI hysteresis
    pub fn with_hysteresis(mut self, hysteresis: Option<f64>) -> Self {
        if let Some(h) = hysteresis {
            self.config.alert.hysteresis = h;
        }
        self
    }

    /// Override with CLI interval
    pub fn with_interval(mut self, interval: Option<u64>) -> Self {
        if let Some(i) = interval {
            self.config.alert.check_interval = i;
        }
        self
    }

    /// Override with CLI rate-of-change threshold
    pub fn with_rate_threshold(mut self, rate: Option<f64>) -> Self {
        if let Some(r) = rate {
            self.config.alert.rate_of_change_threshold = r;
        }
        self
    }

    /// Override with CLI notification mode
    pub fn with_notify_mode(mut self, mode: Option<NotifyMode>) -> Self {
        if let Some(m) = mode {
            self.config.alert.notify_mode = m;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
