//! MQTT-subscribed temperature sensor
//!
//! A background thread drives the MQTT connection and keeps the most recent
//! valid payload. Polling returns that value without touching the network.

use super::TemperatureSensor;
use crate::domain::Celsius;
use crate::error::{ConfigError, Result, SensorError};
use rumqttc::{Client, ConnectReturnCode, Connection, ConnectionError, Event, MqttOptions, Packet, QoS};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const DEFAULT_PORT: u16 = 1883;
const KEEP_ALIVE: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Latest temperature seen on an MQTT topic
pub struct MqttSensor {
    topic: String,
    latest: Arc<Mutex<Option<f64>>>,
    client: Client,
    closing: Arc<AtomicBool>,
}

impl MqttSensor {
    /// Connect to `host[:port]` and subscribe to `topic`
    ///
    /// Waits up to five seconds for the broker to accept the connection;
    /// a slow broker is logged, not treated as an error.
    pub fn connect(broker: &str, topic: &str) -> Result<Self> {
        let (host, port) = parse_broker(broker)?;

        let client_id = format!("thermwatch-{}", std::process::id());
        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(KEEP_ALIVE);

        let (client, connection) = Client::new(options, 10);
        let latest = Arc::new(Mutex::new(None));
        let closing = Arc::new(AtomicBool::new(false));
        let (connected_tx, connected_rx) = mpsc::channel();

        let worker = EventLoop {
            client: client.clone(),
            topic: topic.to_string(),
            latest: Arc::clone(&latest),
            closing: Arc::clone(&closing),
            connected: connected_tx,
        };
        thread::Builder::new()
            .name("mqtt-sensor".to_string())
            .spawn(move || worker.run(connection))
            .map_err(|e| SensorError::Mqtt(format!("failed to spawn event loop: {}", e)))?;

        if connected_rx.recv_timeout(CONNECT_TIMEOUT).is_err() {
            log::warn!("MQTT connection timeout ({})", broker);
        }

        Ok(Self {
            topic: topic.to_string(),
            latest,
            client,
            closing,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl TemperatureSensor for MqttSensor {
    fn try_read(&self) -> std::result::Result<f64, SensorError> {
        let latest = self
            .latest
            .lock()
            .map_err(|_| SensorError::Mqtt("reading state poisoned".to_string()))?;

        latest.ok_or_else(|| {
            SensorError::Mqtt(format!("no temperature received yet on '{}'", self.topic))
        })
    }

    fn name(&self) -> &str {
        "mqtt"
    }
}

impl Drop for MqttSensor {
    fn drop(&mut self) {
        self.closing.store(true, Ordering::SeqCst);
        let _ = self.client.try_disconnect();
    }
}

struct EventLoop {
    client: Client,
    topic: String,
    latest: Arc<Mutex<Option<f64>>>,
    closing: Arc<AtomicBool>,
    connected: mpsc::Sender<()>,
}

impl EventLoop {
    fn run(self, mut connection: Connection) {
        for notification in connection.iter() {
            if self.closing.load(Ordering::SeqCst) {
                break;
            }

            match notification {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    if ack.code == ConnectReturnCode::Success {
                        // Subscriptions do not survive a clean-session reconnect.
                        if let Err(e) = self.client.try_subscribe(&self.topic, QoS::AtMostOnce) {
                            log::error!("MQTT subscribe to '{}' failed: {}", self.topic, e);
                        }
                        let _ = self.connected.send(());
                    } else {
                        log::error!("MQTT broker refused connection: {:?}", ack.code);
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    match parse_payload(&publish.payload) {
                        Some(celsius) => {
                            if let Ok(mut latest) = self.latest.lock() {
                                *latest = Some(celsius);
                            }
                        }
                        None => log::error!("Invalid temperature payload: {:?}", publish.payload),
                    }
                }
                Ok(_) => {}
                Err(ConnectionError::RequestsDone) => break,
                Err(e) => {
                    log::warn!("MQTT connection error: {}", e);
                    thread::sleep(RECONNECT_DELAY);
                }
            }
        }

        log::debug!("MQTT event loop for '{}' stopped", self.topic);
    }
}

/// Split `host[:port]`, defaulting to port 1883
fn parse_broker(broker: &str) -> std::result::Result<(String, u16), ConfigError> {
    let broker = broker.trim();
    if broker.is_empty() {
        return Err(ConfigError::MissingField("sensor.broker".to_string()));
    }

    match broker.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "sensor.broker".to_string(),
                message: format!("invalid port in '{}'", broker),
            })?;
            Ok((host.to_string(), port))
        }
        None => Ok((broker.to_string(), DEFAULT_PORT)),
    }
}

fn parse_payload(payload: &[u8]) -> Option<f64> {
    std::str::from_utf8(payload)
        .ok()
        .and_then(Celsius::parse)
        .map(f64::from)
}
