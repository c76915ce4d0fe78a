//! Unified error types for thermwatch
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// Error from a temperature sensor
    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    /// Error from a notification channel
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Error from the alert engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Sensor produced no reading
    #[error("No temperature reading available from {0}")]
    NoReading(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Threshold is not a finite number
    #[error("Invalid threshold: {0}°C (must be finite)")]
    InvalidThreshold(f64),

    /// Hysteresis is negative or not finite
    #[error("Invalid hysteresis: {0}°C (must be >= 0)")]
    InvalidHysteresis(f64),

    /// Check interval is zero
    #[error("Invalid check interval: must be greater than 0 seconds")]
    InvalidCheckInterval,

    /// Rate threshold is negative or not finite
    #[error("Invalid rate-of-change threshold: {0}°C/min (must be >= 0)")]
    InvalidRateThreshold(f64),

    /// History capacity is zero
    #[error("History capacity must be at least 1")]
    InvalidHistoryCapacity,
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Failed to write config file
    #[error("Failed to write configuration to {path}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file already exists
    #[error("Configuration file already exists: {0} (use --force to overwrite)")]
    AlreadyExists(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required config field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Sensor support not compiled in
    #[error("Sensor type '{0}' is not available in this build")]
    Unsupported(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Errors from reading a temperature source
#[derive(Error, Debug)]
pub enum SensorError {
    /// Could not read the backing file
    #[error("Error reading temperature file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Content did not contain a usable temperature
    #[error("Could not parse temperature from '{0}'")]
    Parse(String),

    /// HTTP transport or status error
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Response body had no recognised temperature field
    #[error("Could not find temperature in response: {0}")]
    MissingField(String),

    /// 1-wire device reported a CRC failure
    #[error("1-wire CRC check failed for {0}")]
    Crc(String),

    /// No 1-wire device was found on the bus
    #[error("No 1-wire temperature device found under {0}")]
    DeviceNotFound(String),

    /// MQTT client error
    #[error("MQTT error: {0}")]
    Mqtt(String),
}

/// Errors from delivering a notification
#[derive(Error, Debug)]
pub enum NotifyError {
    /// HTTP transport or status error
    #[error("Failed to deliver via {channel}: {message}")]
    Delivery { channel: String, message: String },

    /// Writing to the terminal failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised inside a poll cycle
#[derive(Error, Debug)]
pub enum EngineError {
    /// A collaborator panicked during the cycle
    #[error("Poll cycle panicked: {0}")]
    CyclePanicked(String),

    /// Failed to spawn the monitor thread
    #[error("Failed to spawn monitor thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
