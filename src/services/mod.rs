//! Service layer
//!
//! Services run the long-lived parts of the application on top of the
//! domain and alert types.

pub mod monitor;

pub use monitor::{AlertEngine, CycleReport, EngineStatus, STOP_GRACE_PERIOD};
