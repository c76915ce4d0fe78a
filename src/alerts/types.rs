//! Notification domain types
//!
//! A [`Notification`] is what the engine hands to a notifier: the message,
//! the reading that caused it and whether it signals an alert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a notification was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Reading velocity exceeded the rate bound
    RateExceeded,
    /// Alarm is active
    ThresholdExceeded,
    /// Alarm cleared (edge mode only)
    Recovered,
    /// Sent on request to check a channel
    Test,
    /// Free-form message sent through [`Notifier::send`](super::Notifier::send)
    Custom,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateExceeded => write!(f, "rate_exceeded"),
            Self::ThresholdExceeded => write!(f, "threshold_exceeded"),
            Self::Recovered => write!(f, "recovered"),
            Self::Test => write!(f, "test"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// A message bound for a notification channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Reading in °C that triggered the notification
    pub temperature: f64,
    /// `true` for alert conditions, `false` for all-clear
    pub alert: bool,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Create a notification stamped with the current time
    pub fn new(
        kind: NotificationKind,
        message: impl Into<String>,
        temperature: f64,
        alert: bool,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            temperature,
            alert,
            timestamp: Utc::now(),
        }
    }

    pub fn rate_exceeded(rate: f64, temperature: f64) -> Self {
        Self::new(
            NotificationKind::RateExceeded,
            format!("Temperature changing too fast: {:.1}°C/min", rate),
            temperature,
            true,
        )
    }

    pub fn threshold_exceeded(threshold: f64, temperature: f64) -> Self {
        Self::new(
            NotificationKind::ThresholdExceeded,
            format!("Temperature exceeded threshold: {}°C", threshold),
            temperature,
            true,
        )
    }

    pub fn recovered(clear_below: f64, temperature: f64) -> Self {
        Self::new(
            NotificationKind::Recovered,
            format!("Temperature back below {}°C", clear_below),
            temperature,
            false,
        )
    }

    pub fn test(message: impl Into<String>, temperature: f64) -> Self {
        Self::new(NotificationKind::Test, message, temperature, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_message_rounds_to_one_decimal() {
        let n = Notification::rate_exceeded(7.04, 27.0);
        assert_eq!(n.message, "Temperature changing too fast: 7.0°C/min");
        assert!(n.alert);
        assert_eq!(n.kind, NotificationKind::RateExceeded);
    }

    #[test]
    fn test_threshold_message() {
        let n = Notification::threshold_exceeded(30.5, 31.0);
        assert_eq!(n.message, "Temperature exceeded threshold: 30.5°C");
        assert_eq!(n.temperature, 31.0);
        assert!(n.alert);
    }

    #[test]
    fn test_recovered_is_not_an_alert() {
        let n = Notification::recovered(29.0, 28.5);
        assert!(!n.alert);
        assert_eq!(n.kind, NotificationKind::Recovered);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NotificationKind::ThresholdExceeded.to_string(), "threshold_exceeded");
    }
}
