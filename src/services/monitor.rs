//! Temperature alert engine
//!
//! Polls a [`TemperatureSensor`] every check interval on a background
//! thread, classifies each reading and dispatches notifications.
//!
//! Cycles never overlap: the next read starts only after the previous
//! cycle's notifications have returned. The loop sleeps on a cancellation
//! token, so [`AlertEngine::stop`] wakes it immediately instead of waiting
//! out the interval.

use crate::alerts::{
    Classification, ClassificationState, Notification, Notifier, Transition,
};
use crate::domain::{AlertPolicy, NotifyMode};
use crate::error::EngineError;
use crate::sensors::TemperatureSensor;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

/// How long [`AlertEngine::stop`] waits for the loop to exit
pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Snapshot of the engine's state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineStatus {
    pub running: bool,
    pub current_reading: Option<f64>,
    pub alarm_active: bool,
    pub last_check: Option<DateTime<Utc>>,
    pub history_count: usize,
}

/// What a single poll cycle observed and sent
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Reading from the sensor, `None` on a failed read
    pub reading: Option<f64>,
    /// Classifier output, present only when a reading was obtained
    pub classification: Option<Classification>,
    /// Notifications handed to the notifier, in order
    pub notifications: Vec<Notification>,
}

impl CycleReport {
    pub fn alarm_active(&self) -> bool {
        self.classification.is_some_and(|c| c.alarm_active)
    }
}

/// Cooperative cancellation token the loop sleeps on
#[derive(Debug, Default)]
struct Shutdown {
    triggered: Mutex<bool>,
    signal: Condvar,
}

impl Shutdown {
    fn trigger(&self) {
        *self.flag() = true;
        self.signal.notify_all();
    }

    fn is_triggered(&self) -> bool {
        *self.flag()
    }

    /// Sleep up to `timeout`; returns `true` if cancelled
    fn wait(&self, timeout: Duration) -> bool {
        let guard = self.flag();
        let (guard, _) = self
            .signal
            .wait_timeout_while(guard, timeout, |triggered| !*triggered)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }

    fn flag(&self) -> MutexGuard<'_, bool> {
        self.triggered.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// State shared between the engine handle and its loop thread
struct EngineShared {
    policy: AlertPolicy,
    sensor: Arc<dyn TemperatureSensor>,
    notifier: Arc<dyn Notifier>,
    /// Held for a whole poll cycle so cycles never overlap
    cycle: Mutex<()>,
    state: Mutex<ClassificationState>,
}

impl EngineShared {
    fn lock_state(&self) -> MutexGuard<'_, ClassificationState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            log::warn!("Recovering classification state after a panicked cycle");
            poisoned.into_inner()
        })
    }

    fn poll_once(&self, now: SystemTime) -> CycleReport {
        let _cycle = self.cycle.lock().unwrap_or_else(PoisonError::into_inner);

        let reading = self.sensor.read_temperature();
        if reading.is_none() {
            log::warn!("No temperature reading from {} sensor", self.sensor.name());
        }

        let classification = {
            let mut state = self.lock_state();
            state.record_reading(reading);
            let classification = reading.map(|r| state.classify(&self.policy, r, now));
            state.complete_cycle(now);
            classification
        };

        let notifications = match (reading, classification) {
            (Some(temperature), Some(result)) => {
                log::info!(
                    "Temperature: {}°C, Alert: {}",
                    temperature,
                    result.alarm_active
                );
                self.notifications_for(temperature, &result)
            }
            _ => Vec::new(),
        };

        for notification in &notifications {
            self.notifier.notify(notification);
        }

        CycleReport {
            reading,
            classification,
            notifications,
        }
    }

    fn notifications_for(&self, temperature: f64, result: &Classification) -> Vec<Notification> {
        let mut notifications = Vec::new();

        if let Some(event) = result.rate_event {
            notifications.push(Notification::rate_exceeded(event.rate, temperature));
        }

        let threshold = self.policy.threshold();
        match (self.policy.notify_mode(), result.transition) {
            (NotifyMode::Level, _) if result.alarm_active => {
                notifications.push(Notification::threshold_exceeded(threshold, temperature));
            }
            (NotifyMode::Edge, Transition::Engaged) => {
                notifications.push(Notification::threshold_exceeded(threshold, temperature));
            }
            (NotifyMode::Edge, Transition::Cleared) => {
                notifications.push(Notification::recovered(
                    self.policy.clear_below(),
                    temperature,
                ));
            }
            _ => {}
        }

        notifications
    }

    /// Run one cycle, turning a panic in a collaborator into an error
    fn guarded_cycle(&self, now: SystemTime) -> Result<CycleReport, EngineError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.poll_once(now)))
            .map_err(|payload| EngineError::CyclePanicked(panic_message(payload)))
    }

    fn run_loop(&self, shutdown: &Shutdown, deadline: Option<Instant>) {
        loop {
            if shutdown.is_triggered() {
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                log::info!("Monitoring duration elapsed");
                break;
            }

            if let Err(e) = self.guarded_cycle(SystemTime::now()) {
                log::error!("Error in monitoring loop: {}", e);
            }

            let mut pause = self.policy.check_interval();
            if let Some(d) = deadline {
                pause = pause.min(d.saturating_duration_since(Instant::now()));
            }
            if shutdown.wait(pause) {
                break;
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Background loop handle, one per `start`
struct Worker {
    handle: thread::JoinHandle<()>,
    shutdown: Arc<Shutdown>,
    running: Arc<AtomicBool>,
    /// Disconnects when the loop thread exits
    done: mpsc::Receiver<()>,
}

/// Temperature alert engine
pub struct AlertEngine {
    shared: Arc<EngineShared>,
    worker: Option<Worker>,
}

impl AlertEngine {
    /// Create an engine; nothing runs until [`start`](Self::start)
    pub fn new(
        policy: AlertPolicy,
        sensor: Arc<dyn TemperatureSensor>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_state(policy, sensor, notifier, ClassificationState::new())
    }

    /// Create an engine with a pre-built classification state
    pub fn with_state(
        policy: AlertPolicy,
        sensor: Arc<dyn TemperatureSensor>,
        notifier: Arc<dyn Notifier>,
        state: ClassificationState,
    ) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                policy,
                sensor,
                notifier,
                cycle: Mutex::new(()),
                state: Mutex::new(state),
            }),
            worker: None,
        }
    }

    /// Get the alert policy
    pub fn policy(&self) -> &AlertPolicy {
        &self.shared.policy
    }

    /// Check if the poll loop is running
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| worker.running.load(Ordering::SeqCst))
    }

    /// Run a single poll cycle on the caller's thread
    ///
    /// Waits for a cycle already in progress on the loop thread to finish.
    pub fn poll_once(&self, now: SystemTime) -> CycleReport {
        self.shared.poll_once(now)
    }

    /// Start the poll loop on a background thread
    ///
    /// With a non-zero `duration` the loop stops itself once that much
    /// wall-clock time has passed; otherwise it runs until [`stop`](Self::stop).
    /// Calling this while running only logs a warning.
    pub fn start(&mut self, duration: Option<Duration>) -> Result<(), EngineError> {
        if self.is_running() {
            log::warn!("Already running");
            return Ok(());
        }

        // Reap a loop that already ended on its own.
        if let Some(worker) = self.worker.take() {
            if worker.handle.join().is_err() {
                log::error!("Monitor thread panicked");
            }
        }

        let duration = duration.filter(|d| !d.is_zero());
        let deadline = duration.map(|d| Instant::now() + d);

        let shutdown = Arc::new(Shutdown::default());
        let running = Arc::new(AtomicBool::new(true));
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let handle = {
            let shared = Arc::clone(&self.shared);
            let shutdown = Arc::clone(&shutdown);
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("thermwatch-monitor".to_string())
                .spawn(move || {
                    let _done = done_tx;
                    shared.run_loop(&shutdown, deadline);
                    running.store(false, Ordering::SeqCst);
                })
                .map_err(EngineError::Spawn)?
        };

        self.worker = Some(Worker {
            handle,
            shutdown,
            running,
            done: done_rx,
        });

        log::info!(
            "Temperature monitoring started (interval: {}s, duration: {}s, 0=forever)",
            self.shared.policy.check_interval().as_secs_f64(),
            duration.map(|d| d.as_secs_f64()).unwrap_or(0.0)
        );

        Ok(())
    }

    /// Stop the poll loop
    ///
    /// Wakes the loop and waits up to [`STOP_GRACE_PERIOD`] for an in-flight
    /// cycle to finish. A loop that overruns the grace period is detached
    /// and logged.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.shutdown.trigger();
            match worker.done.recv_timeout(STOP_GRACE_PERIOD) {
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!(
                        "Monitor thread did not stop within {}s",
                        STOP_GRACE_PERIOD.as_secs()
                    );
                }
                _ => {
                    if worker.handle.join().is_err() {
                        log::error!("Monitor thread panicked");
                    }
                }
            }
            log::info!("Temperature monitoring stopped");
        }
    }

    /// Block until the poll loop ends on its own
    pub fn wait(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.handle.join().is_err() {
                log::error!("Monitor thread panicked");
            }
            log::info!("Temperature monitoring stopped");
        }
    }

    /// Get a consistent snapshot of the engine state
    pub fn status(&self) -> EngineStatus {
        let state = self.shared.lock_state();
        EngineStatus {
            running: self.is_running(),
            current_reading: state.current_reading(),
            alarm_active: state.alarm_active(),
            last_check: state.last_check().map(DateTime::<Utc>::from),
            history_count: state.history().len(),
        }
    }

    /// Copy of retained readings, oldest first
    pub fn history(&self) -> Vec<f64> {
        self.shared.lock_state().history().to_vec()
    }
}

impl Drop for AlertEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
