//! Domain models for thermwatch
//!
//! This module contains all domain types with validation.
//! Types are validated on construction (fail-fast pattern).

pub mod history;
pub mod policy;
pub mod thermal;

pub use history::{ReadingHistory, DEFAULT_HISTORY_CAPACITY};
pub use policy::{
    AlertPolicy, NotifyMode, DEFAULT_CHECK_INTERVAL, DEFAULT_HYSTERESIS, DEFAULT_RATE_THRESHOLD,
};
pub use thermal::Celsius;
