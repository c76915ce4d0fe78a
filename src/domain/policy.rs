//! Alert policy domain types
//!
//! The policy is immutable once built; every invariant is checked in
//! [`AlertPolicy::new`].

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default hysteresis margin in °C
pub const DEFAULT_HYSTERESIS: f64 = 1.0;

/// Default polling period
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Default rate-of-change bound in °C per minute
pub const DEFAULT_RATE_THRESHOLD: f64 = 5.0;

/// When threshold notifications are sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyMode {
    /// Notify on every cycle while the alarm is active
    #[default]
    Level,
    /// Notify once when the alarm engages and once when it clears
    Edge,
}

impl fmt::Display for NotifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level => write!(f, "level"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

/// Threshold, hysteresis and rate settings for the alert engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertPolicy {
    threshold: f64,
    hysteresis: f64,
    check_interval: Duration,
    rate_threshold: f64,
    notify_mode: NotifyMode,
}

impl AlertPolicy {
    /// Create a validated policy
    pub fn new(
        threshold: f64,
        hysteresis: f64,
        check_interval: Duration,
        rate_threshold: f64,
    ) -> Result<Self, DomainError> {
        if !threshold.is_finite() {
            return Err(DomainError::InvalidThreshold(threshold));
        }
        if !hysteresis.is_finite() || hysteresis < 0.0 {
            return Err(DomainError::InvalidHysteresis(hysteresis));
        }
        if check_interval.is_zero() {
            return Err(DomainError::InvalidCheckInterval);
        }
        if !rate_threshold.is_finite() || rate_threshold < 0.0 {
            return Err(DomainError::InvalidRateThreshold(rate_threshold));
        }

        Ok(Self {
            threshold,
            hysteresis,
            check_interval,
            rate_threshold,
            notify_mode: NotifyMode::Level,
        })
    }

    /// Policy with default hysteresis, interval and rate bound
    pub fn with_threshold(threshold: f64) -> Result<Self, DomainError> {
        Self::new(
            threshold,
            DEFAULT_HYSTERESIS,
            DEFAULT_CHECK_INTERVAL,
            DEFAULT_RATE_THRESHOLD,
        )
    }

    /// Builder: set notification mode
    pub fn with_notify_mode(mut self, mode: NotifyMode) -> Self {
        self.notify_mode = mode;
        self
    }

    /// Alarm engages at or above this temperature
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Dead-band below the threshold
    pub fn hysteresis(&self) -> f64 {
        self.hysteresis
    }

    /// Alarm clears strictly below this temperature
    pub fn clear_below(&self) -> f64 {
        self.threshold - self.hysteresis
    }

    /// Polling period
    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Rate-of-change bound in °C per minute
    pub fn rate_threshold(&self) -> f64 {
        self.rate_threshold
    }

    /// Threshold notification mode
    pub fn notify_mode(&self) -> NotifyMode {
        self.notify_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let policy = AlertPolicy::with_threshold(30.0).unwrap();
        assert_eq!(policy.threshold(), 30.0);
        assert_eq!(policy.hysteresis(), 1.0);
        assert_eq!(policy.check_interval(), Duration::from_secs(60));
        assert_eq!(policy.rate_threshold(), 5.0);
        assert_eq!(policy.notify_mode(), NotifyMode::Level);
        assert_eq!(policy.clear_below(), 29.0);
    }

    #[test]
    fn test_custom_values() {
        let policy = AlertPolicy::new(25.0, 2.0, Duration::from_secs(30), 10.0)
            .unwrap()
            .with_notify_mode(NotifyMode::Edge);
        assert_eq!(policy.threshold(), 25.0);
        assert_eq!(policy.hysteresis(), 2.0);
        assert_eq!(policy.check_interval(), Duration::from_secs(30));
        assert_eq!(policy.rate_threshold(), 10.0);
        assert_eq!(policy.notify_mode(), NotifyMode::Edge);
    }

    #[test]
    fn test_zero_hysteresis_allowed() {
        assert!(AlertPolicy::new(30.0, 0.0, Duration::from_secs(1), 5.0).is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let interval = Duration::from_secs(60);
        assert_eq!(
            AlertPolicy::new(30.0, -0.5, interval, 5.0),
            Err(DomainError::InvalidHysteresis(-0.5))
        );
        assert_eq!(
            AlertPolicy::new(30.0, 1.0, Duration::ZERO, 5.0),
            Err(DomainError::InvalidCheckInterval)
        );
        assert!(matches!(
            AlertPolicy::new(f64::NAN, 1.0, interval, 5.0),
            Err(DomainError::InvalidThreshold(_))
        ));
        assert_eq!(
            AlertPolicy::new(30.0, 1.0, interval, -1.0),
            Err(DomainError::InvalidRateThreshold(-1.0))
        );
    }

    #[test]
    fn test_notify_mode_serde() {
        let mode: NotifyMode = serde_json::from_str("\"edge\"").unwrap();
        assert_eq!(mode, NotifyMode::Edge);
        assert_eq!(NotifyMode::Level.to_string(), "level");
    }
}
