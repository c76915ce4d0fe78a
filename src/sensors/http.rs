//! HTTP-polled temperature sensor
//!
//! Issues a GET per poll and looks for a temperature in the JSON body.

use super::TemperatureSensor;
use crate::domain::Celsius;
use crate::error::SensorError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON keys checked in order; the first one present wins
const TEMPERATURE_KEYS: [&str; 5] = ["temperature", "temp", "temp_c", "celsius", "value"];

/// Reads a temperature from a JSON HTTP endpoint
pub struct HttpSensor {
    url: String,
    headers: BTreeMap<String, String>,
    agent: ureq::Agent,
}

impl HttpSensor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            agent: ureq::AgentBuilder::new().timeout(HTTP_TIMEOUT).build(),
        }
    }

    /// Builder: extra request headers (auth tokens and the like)
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TemperatureSensor for HttpSensor {
    fn try_read(&self) -> Result<f64, SensorError> {
        let mut request = self.agent.get(&self.url);
        for (key, value) in &self.headers {
            request = request.set(key, value);
        }

        let response = request
            .call()
            .map_err(|e| SensorError::Http(e.to_string()))?;
        let body: Value = response
            .into_json()
            .map_err(|e| SensorError::Http(format!("invalid JSON body: {}", e)))?;

        extract_temperature(&body).map(f64::from)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Find the temperature field in a JSON response body
pub fn extract_temperature(body: &Value) -> Result<Celsius, SensorError> {
    let value = TEMPERATURE_KEYS
        .iter()
        .find_map(|key| body.get(key))
        .ok_or_else(|| SensorError::MissingField(body.to_string()))?;

    let celsius = match value {
        Value::Number(n) => n.as_f64().and_then(Celsius::new),
        Value::String(s) => Celsius::parse(s),
        _ => None,
    };

    celsius.ok_or_else(|| SensorError::Parse(value.to_string()))
}
