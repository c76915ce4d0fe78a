//! DS18B20 on the Linux w1-gpio bus
//!
//! With the `w1-gpio` overlay bound to a pin, the kernel exposes each
//! DS18B20 (family code `28`) as `<w1_root>/28-*/w1_slave`. The first line
//! ends in `YES` when the CRC matched.

use super::file::parse_reading;
use super::TemperatureSensor;
use crate::error::SensorError;
use std::path::{Path, PathBuf};

const DS18B20_FAMILY: &str = "28-";

pub(crate) fn default_w1_root() -> PathBuf {
    PathBuf::from("/sys/bus/w1/devices")
}

/// Reads the first DS18B20 found on the 1-wire bus
#[derive(Debug, Clone)]
pub struct GpioSensor {
    pin: u32,
    w1_root: PathBuf,
}

impl GpioSensor {
    pub fn new(pin: u32) -> Self {
        Self {
            pin,
            w1_root: default_w1_root(),
        }
    }

    /// Builder: look for devices under a different sysfs root
    pub fn with_w1_root(mut self, root: impl AsRef<Path>) -> Self {
        self.w1_root = root.as_ref().to_path_buf();
        self
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }

    fn device_file(&self) -> Result<PathBuf, SensorError> {
        let entries = std::fs::read_dir(&self.w1_root).map_err(|source| SensorError::Io {
            path: self.w1_root.display().to_string(),
            source,
        })?;

        let mut devices: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(DS18B20_FAMILY))
            })
            .map(|entry| entry.path().join("w1_slave"))
            .collect();
        devices.sort();

        devices
            .into_iter()
            .next()
            .ok_or_else(|| SensorError::DeviceNotFound(self.w1_root.display().to_string()))
    }
}

impl TemperatureSensor for GpioSensor {
    fn try_read(&self) -> Result<f64, SensorError> {
        let path = self.device_file()?;
        let content = std::fs::read_to_string(&path).map_err(|source| SensorError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let crc_ok = content
            .lines()
            .next()
            .is_some_and(|line| line.trim_end().ends_with("YES"));
        if !crc_ok {
            return Err(SensorError::Crc(path.display().to_string()));
        }

        log::debug!("Read DS18B20 on GPIO {} from {}", self.pin, path.display());
        parse_reading(&content).map(f64::from)
    }

    fn name(&self) -> &str {
        "gpio"
    }
}
