//! Notify-test command implementation
//!
//! Sends one notification through the configured channel so credentials
//! and URLs can be checked without waiting for an alarm.

use crate::alerts::Notification;
use crate::cli::args::{NotifyTestArgs, OutputFormat};
use crate::cli::output::{print_output, Message};
use crate::config::Config;
use crate::error::Result;

/// Execute the notify-test command
pub fn run_notify_test(args: &NotifyTestArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let notifier = config.notification.build()?;
    let temperature = current_temperature(config);

    let notification = Notification::test(args.message.clone(), temperature);
    notifier.deliver(&notification)?;

    let msg = Message::success(format!("Test notification sent via {}", notifier.name()));
    print_output(&msg, format)?;

    Ok(())
}

/// Best-effort reading to include in the test message
fn current_temperature(config: &Config) -> f64 {
    let Some(sensor_config) = config.sensor.as_ref() else {
        return 0.0;
    };

    match sensor_config.build() {
        Ok(sensor) => sensor.read_temperature().unwrap_or(0.0),
        Err(e) => {
            log::warn!("Sensor unavailable for test notification: {}", e);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::NotifierConfig;
    use crate::error::AppError;
    use crate::mock::MockHttpServer;
    use crate::sensors::SensorConfig;
    use tempfile::TempDir;

    fn args(message: &str) -> NotifyTestArgs {
        NotifyTestArgs {
            message: message.to_string(),
        }
    }

    #[test]
    fn test_notify_test_uses_sensor_reading() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("temp");
        std::fs::write(&path, "24.5").unwrap();

        let server = MockHttpServer::serve(1, 200, "{}");
        let config = Config {
            sensor: Some(SensorConfig::File { path }),
            notification: NotifierConfig::Webhook {
                url: server.url("/hook"),
                method: Default::default(),
            },
            ..Config::default()
        };

        run_notify_test(&args("ping"), &config, OutputFormat::Json).unwrap();

        let request = server.recv();
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["message"], "ping");
        assert_eq!(body["temperature"], 24.5);
        assert_eq!(body["alert"], false);
    }

    #[test]
    fn test_notify_test_without_sensor() {
        assert_eq!(current_temperature(&Config::default()), 0.0);
    }

    #[test]
    fn test_notify_test_delivery_failure() {
        let server = MockHttpServer::serve(1, 500, "{}");
        let config = Config {
            notification: NotifierConfig::Webhook {
                url: server.url("/hook"),
                method: Default::default(),
            },
            ..Config::default()
        };

        let result = run_notify_test(&args("ping"), &config, OutputFormat::Table);
        assert!(matches!(result, Err(AppError::Notify(_))));
    }
}
