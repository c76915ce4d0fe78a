//! Mock implementations for testing
//!
//! Provides a scripted sensor, a recording notifier and a tiny HTTP server
//! for exercising sensors and notifiers without real hardware or network.

use crate::alerts::{Notification, Notifier};
use crate::error::{NotifyError, SensorError};
use crate::sensors::TemperatureSensor;

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Duration;

/// Sensor that replays a fixed script of readings
///
/// `None` entries simulate read failures. Once the script is exhausted the
/// last entry repeats.
#[derive(Debug)]
pub struct MockSensor {
    script: Mutex<VecDeque<Option<f64>>>,
    last: Mutex<Option<f64>>,
    reads: Mutex<usize>,
}

impl MockSensor {
    pub fn new(script: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(None),
            reads: Mutex::new(0),
        }
    }

    /// Sensor returning the same reading forever
    pub fn constant(celsius: f64) -> Self {
        Self::new([Some(celsius)])
    }

    /// Sensor returning readings in order
    pub fn readings(readings: &[f64]) -> Self {
        Self::new(readings.iter().copied().map(Some))
    }

    /// Number of times the sensor was read
    pub fn read_count(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

impl TemperatureSensor for MockSensor {
    fn try_read(&self) -> Result<f64, SensorError> {
        *self.reads.lock().unwrap() += 1;

        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *last = next;
        }

        last.ok_or_else(|| SensorError::Parse("scripted failure".to_string()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Sensor that panics on every read
pub struct PanickingSensor;

impl TemperatureSensor for PanickingSensor {
    fn try_read(&self) -> Result<f64, SensorError> {
        panic!("sensor exploded");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// Sensor that takes a while to answer and tracks overlapping reads
#[derive(Debug)]
pub struct SlowSensor {
    celsius: f64,
    delay: Duration,
    reads: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowSensor {
    pub fn new(celsius: f64, delay: Duration) -> Self {
        Self {
            celsius,
            delay,
            reads: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Number of reads started
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Most reads ever in progress at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl TemperatureSensor for SlowSensor {
    fn try_read(&self) -> Result<f64, SensorError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.reads.fetch_add(1, Ordering::SeqCst);

        thread::sleep(self.delay);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.celsius)
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Notifier that records everything it is asked to deliver
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records notifications but reports every delivery as failed
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(NotifyError::Delivery {
                channel: "recording".to_string(),
                message: "simulated failure".to_string(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// A request captured by [`MockHttpServer`]
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    /// Path including any query string
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Minimal HTTP/1.1 server answering a fixed number of requests
pub struct MockHttpServer {
    addr: SocketAddr,
    requests: mpsc::Receiver<CapturedRequest>,
}

impl MockHttpServer {
    /// Answer `count` requests with `status` and `body`
    pub fn serve(count: usize, status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        let body = body.to_string();

        thread::spawn(move || {
            for stream in listener.incoming().take(count) {
                let mut stream = stream.unwrap();
                let request = read_request(&mut stream);

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();

                let _ = tx.send(request);
            }
        });

        Self { addr, requests: rx }
    }

    /// Base URL plus `path`
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Next captured request, waiting up to five seconds
    pub fn recv(&self) -> CapturedRequest {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("no request received")
    }
}

fn read_request(stream: &mut std::net::TcpStream) -> CapturedRequest {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = vec![0; length];
    reader.read_exact(&mut body).unwrap();

    CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_sensor_script() {
        let sensor = MockSensor::new([Some(20.0), None, Some(22.0)]);
        assert_eq!(sensor.read_temperature(), Some(20.0));
        assert_eq!(sensor.read_temperature(), None);
        assert_eq!(sensor.read_temperature(), Some(22.0));
        // last entry repeats
        assert_eq!(sensor.read_temperature(), Some(22.0));
        assert_eq!(sensor.read_count(), 4);
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.send("hello", 21.0, false);
        assert_eq!(notifier.count(), 1);
        assert_eq!(notifier.sent()[0].message, "hello");
    }
}
