//! Thermal domain types
//!
//! Provides a validated Celsius reading type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Celsius(f64);

impl Celsius {
    /// Create a new reading, rejecting NaN and infinities
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self(value))
    }

    /// Get the temperature in Celsius
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Parse a reading from text, trimming surrounding whitespace
    pub fn parse(text: &str) -> Option<Self> {
        text.trim().parse::<f64>().ok().and_then(Self::new)
    }

    /// Convert from millidegrees as reported by 1-wire sensors
    pub fn from_millidegrees(milli: f64) -> Option<Self> {
        Self::new(milli / 1000.0)
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.0)
    }
}

impl From<Celsius> for f64 {
    fn from(temp: Celsius) -> Self {
        temp.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_display() {
        let temp = Celsius::new(23.5).unwrap();
        assert_eq!(temp.to_string(), "23.5°C");
    }

    #[test]
    fn test_celsius_rejects_non_finite() {
        assert!(Celsius::new(f64::NAN).is_none());
        assert!(Celsius::new(f64::INFINITY).is_none());
        assert!(Celsius::parse("nan").is_none());
    }

    #[test]
    fn test_celsius_parse() {
        assert_eq!(Celsius::parse(" 25.5\n").map(f64::from), Some(25.5));
        assert!(Celsius::parse("warm").is_none());
    }

    #[test]
    fn test_from_millidegrees() {
        assert_eq!(Celsius::from_millidegrees(23500.0).map(f64::from), Some(23.5));
        assert_eq!(Celsius::from_millidegrees(-1250.0).map(f64::from), Some(-1.25));
    }
}
