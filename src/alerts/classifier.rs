//! Threshold/hysteresis classifier with rate-of-change detection
//!
//! [`ClassificationState::classify`] is the only place the alarm flag
//! changes. It never talks to a notifier; the caller decides what to send
//! from the returned [`Classification`].

use crate::domain::{AlertPolicy, ReadingHistory};
use serde::Serialize;
use std::time::SystemTime;

/// Alarm transition produced by a single classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Alarm went from inactive to active
    Engaged,
    /// Alarm went from active to inactive
    Cleared,
    /// Alarm state did not change
    Unchanged,
}

/// Temperature changed faster than the configured bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateEvent {
    /// Absolute rate of change in °C per minute
    pub rate: f64,
}

/// Outcome of classifying one reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub alarm_active: bool,
    pub transition: Transition,
    pub rate_event: Option<RateEvent>,
}

/// Mutable classification state owned by the alert engine
#[derive(Debug, Clone, Default)]
pub struct ClassificationState {
    alarm_active: bool,
    last_reading: Option<f64>,
    last_reading_time: Option<SystemTime>,
    current_reading: Option<f64>,
    last_check: Option<SystemTime>,
    history: ReadingHistory,
}

impl ClassificationState {
    /// Create an empty state: no readings, alarm inactive
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty state with a custom history window
    pub fn with_history(history: ReadingHistory) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    /// Classify a reading taken at `now`
    ///
    /// The rate check compares against the previous poll's baseline and is
    /// reported independently of the alarm. The hysteresis check then
    /// updates `alarm_active`.
    pub fn classify(
        &mut self,
        policy: &AlertPolicy,
        reading: f64,
        now: SystemTime,
    ) -> Classification {
        let rate_event = self
            .rate_of_change(reading, now)
            .filter(|rate| *rate > policy.rate_threshold())
            .map(|rate| RateEvent { rate });

        let transition = if reading >= policy.threshold() && !self.alarm_active {
            self.alarm_active = true;
            Transition::Engaged
        } else if reading < policy.clear_below() && self.alarm_active {
            self.alarm_active = false;
            Transition::Cleared
        } else {
            Transition::Unchanged
        };

        Classification {
            alarm_active: self.alarm_active,
            transition,
            rate_event,
        }
    }

    /// Rate in °C/min against the stored baseline, if one exists
    fn rate_of_change(&self, reading: f64, now: SystemTime) -> Option<f64> {
        let (last, last_time) = self.last_reading.zip(self.last_reading_time)?;

        // A clock that moved backwards counts as no elapsed time.
        let elapsed_minutes = now
            .duration_since(last_time)
            .map(|d| d.as_secs_f64() / 60.0)
            .unwrap_or(0.0);

        (elapsed_minutes > 0.0).then(|| (reading - last).abs() / elapsed_minutes)
    }

    /// Record the outcome of a source read
    ///
    /// A present reading is appended to the history. An absent one clears
    /// the current reading.
    pub fn record_reading(&mut self, reading: Option<f64>) {
        if let Some(value) = reading {
            self.history.push(value);
        }
        self.current_reading = reading;
    }

    /// Overwrite the rate baseline with this poll's values
    pub fn complete_cycle(&mut self, now: SystemTime) {
        self.last_reading = self.current_reading;
        self.last_reading_time = Some(now);
        self.last_check = Some(now);
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm_active
    }

    pub fn current_reading(&self) -> Option<f64> {
        self.current_reading
    }

    pub fn last_reading(&self) -> Option<f64> {
        self.last_reading
    }

    pub fn last_reading_time(&self) -> Option<SystemTime> {
        self.last_reading_time
    }

    pub fn last_check(&self) -> Option<SystemTime> {
        self.last_check
    }

    pub fn history(&self) -> &ReadingHistory {
        &self.history
    }
}
