//! File-backed temperature sensor
//!
//! Accepts either a bare number (`25.5`) or the Dallas 1-wire `w1_slave`
//! format, where a `t=` field on a later line carries millidegrees:
//!
//! ```text
//! aa 01 4b 46 7f ff 0c 10 12 : crc=12 YES
//! aa 01 4b 46 7f ff 0c 10 12 t=23500
//! ```

use super::TemperatureSensor;
use crate::domain::Celsius;
use crate::error::SensorError;
use std::path::{Path, PathBuf};

/// Reads a temperature from a file on every poll
#[derive(Debug, Clone)]
pub struct FileSensor {
    path: PathBuf,
}

impl FileSensor {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemperatureSensor for FileSensor {
    fn try_read(&self) -> Result<f64, SensorError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SensorError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        parse_reading(&content).map(f64::from)
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Parse file content in either supported format
pub fn parse_reading(content: &str) -> Result<Celsius, SensorError> {
    let content = content.trim();

    // `t=` only counts in multi-line w1_slave output
    let milli = if content.contains('\n') {
        content
            .lines()
            .find_map(|line| line.split_once("t=").map(|(_, value)| value))
    } else {
        None
    };

    if let Some(milli) = milli {
        return milli
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Celsius::from_millidegrees)
            .ok_or_else(|| SensorError::Parse(content.to_string()));
    }

    Celsius::parse(content).ok_or_else(|| SensorError::Parse(content.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_dallas_format() {
        let file = temp_file(
            "aa 01 4b 46 7f ff 0c 10 12 : crc=12 YES\naa 01 4b 46 7f ff 0c 10 12 t=23500\n",
        );
        let sensor = FileSensor::new(file.path());
        let temp = sensor.try_read().unwrap();
        assert!((temp - 23.5).abs() < 1e-9);
    }

    #[test]
    fn test_read_plain_value() {
        let file = temp_file("25.5");
        let sensor = FileSensor::new(file.path());
        assert_eq!(sensor.read_temperature(), Some(25.5));
    }

    #[test]
    fn test_read_plain_value_with_newline() {
        let file = temp_file("  -4.25\n");
        let sensor = FileSensor::new(file.path());
        assert_eq!(sensor.read_temperature(), Some(-4.25));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let sensor = FileSensor::new("/nonexistent/file");
        assert!(matches!(sensor.try_read(), Err(SensorError::Io { .. })));
        assert_eq!(sensor.read_temperature(), None);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(parse_reading("hot"), Err(SensorError::Parse(_))));
        assert!(matches!(parse_reading("line one\nline two"), Err(SensorError::Parse(_))));
        assert!(matches!(parse_reading("t=abc"), Err(SensorError::Parse(_))));
        assert!(matches!(parse_reading("NaN"), Err(SensorError::Parse(_))));
    }

    #[test]
    fn test_single_line_t_value_rejected() {
        assert!(matches!(parse_reading("t=23500"), Err(SensorError::Parse(_))));
        assert!(matches!(
            parse_reading("aa 01 4b 46 7f ff 0c 10 12 t=23500\n"),
            Err(SensorError::Parse(_))
        ));

        let file = temp_file("t=23500");
        assert_eq!(FileSensor::new(file.path()).read_temperature(), None);
    }
}
