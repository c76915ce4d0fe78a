//! Alert notification system
//!
//! Provides notification channels for alerts: terminal, Telegram, Discord
//! and generic webhooks.

use super::types::{Notification, NotificationKind};
use crate::error::NotifyError;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::time::Duration;

/// Timeout applied to every outbound notification request
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Discord embed colours
const COLOR_RED: u32 = 16711680;
const COLOR_GREEN: u32 = 65280;

/// Notification channel trait
///
/// Implementations only provide [`deliver`](Notifier::deliver). The
/// provided [`notify`](Notifier::notify) and [`send`](Notifier::send)
/// swallow delivery failures after logging them, so callers never observe
/// a failed notification.
pub trait Notifier: Send + Sync {
    /// Deliver a notification, reporting transport failures
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Channel name for identification
    fn name(&self) -> &str;

    /// Deliver a notification, logging any failure
    fn notify(&self, notification: &Notification) {
        match self.deliver(notification) {
            Ok(()) => log::debug!(
                "Sent {} notification via {}",
                notification.kind,
                self.name()
            ),
            Err(e) => log::error!("Error sending {} notification: {}", self.name(), e),
        }
    }

    /// Send a free-form message
    fn send(&self, message: &str, temperature: f64, alert: bool) {
        self.notify(&Notification::new(
            NotificationKind::Custom,
            message,
            temperature,
            alert,
        ));
    }
}

fn http_agent() -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(HTTP_TIMEOUT).build()
}

fn delivery_error(channel: &str, err: ureq::Error) -> NotifyError {
    NotifyError::Delivery {
        channel: channel.to_string(),
        message: err.to_string(),
    }
}

/// Terminal/console notifier
///
/// Outputs alerts to stdout/stderr with colored formatting
pub struct TerminalNotifier {
    /// Use stderr instead of stdout
    use_stderr: bool,
    /// Use colors (ANSI escape codes)
    use_colors: bool,
}

impl TerminalNotifier {
    /// Create a new terminal notifier
    pub fn new() -> Self {
        Self {
            use_stderr: true,
            use_colors: Self::supports_color(),
        }
    }

    /// Create a notifier that uses stdout
    pub fn stdout() -> Self {
        Self {
            use_stderr: false,
            use_colors: Self::supports_color(),
        }
    }

    /// Builder: disable colors
    pub fn without_color(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Check if terminal supports colors
    fn supports_color() -> bool {
        std::env::var("TERM")
            .map(|term| term != "dumb")
            .unwrap_or(false)
    }

    fn format_notification(&self, notification: &Notification) -> String {
        let timestamp = notification
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S");

        format!(
            "[{}] {} {} (current: {}°C)",
            timestamp,
            self.format_level(notification.alert),
            notification.message,
            notification.temperature
        )
    }

    fn format_level(&self, alert: bool) -> String {
        let (color_code, text) = if alert {
            ("\x1b[31m", "ALERT") // Red
        } else {
            ("\x1b[32m", "OK") // Green
        };

        if self.use_colors {
            format!("{}{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for TerminalNotifier {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = self.format_notification(notification);

        if self.use_stderr {
            let stderr = io::stderr();
            let mut handle = stderr.lock();
            writeln!(handle, "{}", message)?;
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", message)?;
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

/// Telegram bot notifier
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    api_base: String,
    agent: ureq::Agent,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: TELEGRAM_API.to_string(),
            agent: http_agent(),
        }
    }

    /// Builder: send to a different Bot API host
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }

    fn payload(&self, notification: &Notification) -> serde_json::Value {
        let emoji = if notification.alert { "🔴" } else { "🟢" };
        let text = format!(
            "{} *Temperature Alert*\n\n{}\n\nCurrent: *{}°C*",
            emoji, notification.message, notification.temperature
        );

        serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
        })
    }
}

impl Notifier for TelegramNotifier {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.agent
            .post(&self.endpoint())
            .send_json(self.payload(notification))
            .map_err(|e| delivery_error(self.name(), e))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

/// Discord webhook notifier
pub struct DiscordNotifier {
    webhook_url: String,
    agent: ureq::Agent,
}

impl DiscordNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            agent: http_agent(),
        }
    }

    fn payload(&self, notification: &Notification) -> serde_json::Value {
        let (title, color) = if notification.alert {
            ("🔔 Temperature Alert", COLOR_RED)
        } else {
            ("✅ Temperature Normal", COLOR_GREEN)
        };

        serde_json::json!({
            "embeds": [{
                "title": title,
                "description": notification.message,
                "color": color,
                "fields": [{
                    "name": "Current Temperature",
                    "value": format!("{}°C", notification.temperature),
                    "inline": true,
                }],
                "timestamp": notification.timestamp.to_rfc3339(),
            }]
        })
    }
}

impl Notifier for DiscordNotifier {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.agent
            .post(&self.webhook_url)
            .send_json(self.payload(notification))
            .map_err(|e| delivery_error(self.name(), e))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "discord"
    }
}

/// HTTP method used by the generic webhook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// JSON body
    #[default]
    Post,
    /// Query parameters
    Get,
}

/// Generic webhook notifier
pub struct WebhookNotifier {
    url: String,
    method: HttpMethod,
    agent: ureq::Agent,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            agent: http_agent(),
        }
    }

    fn payload(notification: &Notification) -> serde_json::Value {
        serde_json::json!({
            "alert": notification.alert,
            "temperature": notification.temperature,
            "message": notification.message,
            "timestamp": notification.timestamp.to_rfc3339(),
        })
    }
}

impl Notifier for WebhookNotifier {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        let result = match self.method {
            HttpMethod::Post => self
                .agent
                .post(&self.url)
                .send_json(Self::payload(notification)),
            HttpMethod::Get => self
                .agent
                .get(&self.url)
                .query("alert", &notification.alert.to_string())
                .query("temperature", &notification.temperature.to_string())
                .query("message", &notification.message)
                .query("timestamp", &notification.timestamp.to_rfc3339())
                .call(),
        };

        result.map_err(|e| delivery_error(self.name(), e))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockHttpServer;

    fn alert() -> Notification {
        Notification::threshold_exceeded(30.0, 35.0)
    }

    #[test]
    fn test_terminal_notifier_creation() {
        let notifier = TerminalNotifier::new();
        assert_eq!(notifier.name(), "terminal");
        assert!(notifier.use_stderr);
        assert!(!TerminalNotifier::stdout().use_stderr);
    }

    #[test]
    fn test_terminal_format_without_color() {
        let notifier = TerminalNotifier::stdout().without_color();
        let line = notifier.format_notification(&alert());
        assert!(line.contains("ALERT Temperature exceeded threshold: 30°C"));
        assert!(line.ends_with("(current: 35°C)"));

        let ok = notifier.format_notification(&Notification::recovered(29.0, 28.0));
        assert!(ok.contains(" OK "));
    }

    #[test]
    fn test_terminal_notify() {
        let notifier = TerminalNotifier::stdout().without_color();
        assert!(notifier.deliver(&alert()).is_ok());
    }

    #[test]
    fn test_telegram_payload() {
        let notifier = TelegramNotifier::new("test_token", "123456");
        assert_eq!(
            notifier.endpoint(),
            "https://api.telegram.org/bottest_token/sendMessage"
        );

        let payload = notifier.payload(&alert());
        assert_eq!(payload["chat_id"], "123456");
        assert_eq!(payload["parse_mode"], "Markdown");
        let text = payload["text"].as_str().unwrap();
        assert!(text.starts_with("🔴 *Temperature Alert*"));
        assert!(text.ends_with("Current: *35°C*"));
    }

    #[test]
    fn test_telegram_posts_to_send_message() {
        let server = MockHttpServer::serve(1, 200, "{\"ok\":true}");
        let notifier = TelegramNotifier::new("test_token", "123456").with_api_base(server.url(""));

        notifier.deliver(&alert()).unwrap();

        let request = server.recv();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/bottest_token/sendMessage");
        assert!(request.body.contains("\"chat_id\":\"123456\""));
    }

    #[test]
    fn test_discord_payload_colors() {
        let notifier = DiscordNotifier::new("https://discord.com/api/webhooks/test");

        let red = notifier.payload(&alert());
        assert_eq!(red["embeds"][0]["color"], COLOR_RED);
        assert_eq!(red["embeds"][0]["title"], "🔔 Temperature Alert");
        assert_eq!(red["embeds"][0]["fields"][0]["value"], "35°C");

        let green = notifier.payload(&Notification::recovered(29.0, 28.0));
        assert_eq!(green["embeds"][0]["color"], COLOR_GREEN);
        assert_eq!(green["embeds"][0]["title"], "✅ Temperature Normal");
    }

    #[test]
    fn test_discord_posts_embed() {
        let server = MockHttpServer::serve(1, 204, "");
        let notifier = DiscordNotifier::new(server.url("/api/webhooks/test"));

        notifier.deliver(&alert()).unwrap();

        let request = server.recv();
        assert_eq!(request.method, "POST");
        assert!(request.body.contains("\"embeds\""));
    }

    #[test]
    fn test_webhook_post() {
        let server = MockHttpServer::serve(1, 200, "");
        let notifier = WebhookNotifier::new(server.url("/hook"), HttpMethod::Post);

        notifier.deliver(&alert()).unwrap();

        let request = server.recv();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/hook");
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["alert"], true);
        assert_eq!(body["temperature"], 35.0);
        assert_eq!(body["message"], "Temperature exceeded threshold: 30°C");
    }

    #[test]
    fn test_webhook_get_uses_query() {
        let server = MockHttpServer::serve(1, 200, "");
        let notifier = WebhookNotifier::new(server.url("/hook"), HttpMethod::Get);

        notifier.deliver(&alert()).unwrap();

        let request = server.recv();
        assert_eq!(request.method, "GET");
        assert!(request.path.starts_with("/hook?"));
        assert!(request.path.contains("alert=true"));
        assert!(request.path.contains("temperature=35"));
    }

    #[test]
    fn test_webhook_error_status_is_reported() {
        let server = MockHttpServer::serve(1, 500, "boom");
        let notifier = WebhookNotifier::new(server.url("/hook"), HttpMethod::Post);

        let result = notifier.deliver(&alert());
        assert!(matches!(result, Err(NotifyError::Delivery { .. })));
    }

    #[test]
    fn test_send_swallows_delivery_failure() {
        // Nothing listens on port 1
        let notifier = WebhookNotifier::new("http://127.0.0.1:1/hook", HttpMethod::Post);
        notifier.send("Test message", 35.0, true);
    }

    #[test]
    fn test_http_method_serde() {
        let method: HttpMethod = serde_json::from_str("\"GET\"").unwrap();
        assert_eq!(method, HttpMethod::Get);
        assert_eq!(HttpMethod::default(), HttpMethod::Post);
    }
}
