//! thermwatch - temperature alert library
//!
//! This library provides the core functionality for polling a temperature
//! sensor, classifying readings against a threshold with hysteresis, and
//! delivering alerts.
//!
//! # Modules
//!
//! - [`alerts`]: Classifier, notifications and notification channels
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models with validation
//! - [`error`]: Error types
//! - [`sensors`]: Temperature sources
//! - [`services`]: The alert engine

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod sensors;
pub mod services;

#[cfg(test)]
pub mod mock;

pub use error::{AppError, Result};
