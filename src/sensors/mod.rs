//! Temperature sources
//!
//! The [`TemperatureSensor`] trait abstracts over where a reading comes from
//! so the alert engine can be driven by files, HTTP endpoints, MQTT topics,
//! 1-wire devices, or mocks in tests.

pub mod file;
pub mod gpio;
pub mod http;
#[cfg(feature = "mqtt")]
pub mod mqtt;

pub use file::FileSensor;
pub use gpio::GpioSensor;
pub use http::HttpSensor;
#[cfg(feature = "mqtt")]
pub use mqtt::MqttSensor;

use crate::error::{ConfigError, Result, SensorError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Trait for temperature sources
///
/// Implementations provide [`try_read`](TemperatureSensor::try_read);
/// [`read_temperature`](TemperatureSensor::read_temperature) turns every
/// failure into `None` after logging it.
pub trait TemperatureSensor: Send + Sync {
    /// Read the current temperature in Celsius
    fn try_read(&self) -> std::result::Result<f64, SensorError>;

    /// Sensor name for identification
    fn name(&self) -> &str;

    /// Read the current temperature, `None` on any failure
    fn read_temperature(&self) -> Option<f64> {
        match self.try_read() {
            Ok(celsius) => Some(celsius),
            Err(e) => {
                log::error!("{} sensor: {}", self.name(), e);
                None
            }
        }
    }
}

/// Sensor transport, as selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    File,
    Http,
    Mqtt,
    Gpio,
}

impl SensorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Http => "http",
            Self::Mqtt => "mqtt",
            Self::Gpio => "gpio",
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temperature source selection (TOML-friendly format)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorConfig {
    /// Plain or 1-wire `w1_slave` formatted file
    File { path: PathBuf },
    /// JSON endpoint polled with GET
    Http {
        url: String,
        #[serde(default)]
        headers: BTreeMap<String, String>,
    },
    /// Latest value published on an MQTT topic
    Mqtt { broker: String, topic: String },
    /// DS18B20 on the w1-gpio bus
    Gpio {
        pin: u32,
        #[serde(default = "gpio::default_w1_root")]
        w1_root: PathBuf,
    },
}

impl SensorConfig {
    /// Sensor type name as used in configuration
    pub fn kind(&self) -> &'static str {
        self.sensor_kind().as_str()
    }

    pub fn sensor_kind(&self) -> SensorKind {
        match self {
            Self::File { .. } => SensorKind::File,
            Self::Http { .. } => SensorKind::Http,
            Self::Mqtt { .. } => SensorKind::Mqtt,
            Self::Gpio { .. } => SensorKind::Gpio,
        }
    }

    /// Build the configured sensor
    ///
    /// MQTT sensors connect and subscribe here, so broker errors surface
    /// before monitoring starts.
    pub fn build(&self) -> Result<Arc<dyn TemperatureSensor>> {
        let sensor: Arc<dyn TemperatureSensor> = match self {
            Self::File { path } => Arc::new(FileSensor::new(path)),
            Self::Http { url, headers } => {
                if url.trim().is_empty() {
                    return Err(ConfigError::MissingField("sensor.url".to_string()).into());
                }
                Arc::new(HttpSensor::new(url).with_headers(headers.clone()))
            }
            Self::Mqtt { broker, topic } => Self::build_mqtt(broker, topic)?,
            Self::Gpio { pin, w1_root } => Arc::new(GpioSensor::new(*pin).with_w1_root(w1_root)),
        };

        Ok(sensor)
    }

    #[cfg(feature = "mqtt")]
    fn build_mqtt(broker: &str, topic: &str) -> Result<Arc<dyn TemperatureSensor>> {
        if topic.trim().is_empty() {
            return Err(ConfigError::MissingField("sensor.topic".to_string()).into());
        }
        Ok(Arc::new(MqttSensor::connect(broker, topic)?))
    }

    #[cfg(not(feature = "mqtt"))]
    fn build_mqtt(_broker: &str, _topic: &str) -> Result<Arc<dyn TemperatureSensor>> {
        Err(ConfigError::Unsupported("mqtt".to_string()).into())
    }
}
