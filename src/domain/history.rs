//! Bounded reading history
//!
//! Keeps the most recent readings for diagnostics. Oldest entries are
//! evicted first once capacity is reached.

use crate::error::DomainError;
use std::collections::VecDeque;

/// Number of readings retained by default
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// FIFO window of recent readings
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingHistory {
    readings: VecDeque<f64>,
    capacity: usize,
}

impl ReadingHistory {
    /// Create an empty history with the given capacity
    pub fn with_capacity(capacity: usize) -> Result<Self, DomainError> {
        if capacity == 0 {
            return Err(DomainError::InvalidHistoryCapacity);
        }
        Ok(Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a reading, dropping the oldest when full
    pub fn push(&mut self, reading: f64) {
        if self.readings.len() == self.capacity {
            self.readings.pop_front();
        }
        self.readings.push_back(reading);
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Readings from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().copied()
    }

    /// Copy of the readings from oldest to newest
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

impl Default for ReadingHistory {
    fn default() -> Self {
        Self {
            readings: VecDeque::with_capacity(DEFAULT_HISTORY_CAPACITY),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}
