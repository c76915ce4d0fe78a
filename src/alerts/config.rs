//! Notification channel configuration
//!
//! The `[notification]` table selects one channel by its `type` tag.

use super::notifier::{
    DiscordNotifier, HttpMethod, Notifier, TelegramNotifier, TerminalNotifier, WebhookNotifier,
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Notification channel selection (TOML-friendly format)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifierConfig {
    /// Print to the terminal
    Console {
        /// Write to stdout instead of stderr
        #[serde(default)]
        stdout: bool,
        /// Use ANSI colors when the terminal supports them
        #[serde(default = "default_true")]
        color: bool,
    },
    /// Telegram bot message
    Telegram { bot_token: String, chat_id: String },
    /// Discord webhook embed
    Discord { webhook_url: String },
    /// Generic JSON/query webhook
    Webhook {
        url: String,
        #[serde(default)]
        method: HttpMethod,
    },
}

fn default_true() -> bool {
    true
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self::Console {
            stdout: false,
            color: true,
        }
    }
}

impl NotifierConfig {
    /// Channel type name as used in configuration
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Console { .. } => "console",
            Self::Telegram { .. } => "telegram",
            Self::Discord { .. } => "discord",
            Self::Webhook { .. } => "webhook",
        }
    }

    /// Build the configured notifier
    pub fn build(&self) -> Result<Arc<dyn Notifier>, ConfigError> {
        let notifier: Arc<dyn Notifier> = match self {
            Self::Console { stdout, color } => {
                let terminal = if *stdout {
                    TerminalNotifier::stdout()
                } else {
                    TerminalNotifier::new()
                };
                if *color {
                    Arc::new(terminal)
                } else {
                    Arc::new(terminal.without_color())
                }
            }
            Self::Telegram { bot_token, chat_id } => {
                require("notification.bot_token", bot_token)?;
                require("notification.chat_id", chat_id)?;
                Arc::new(TelegramNotifier::new(bot_token, chat_id))
            }
            Self::Discord { webhook_url } => {
                require_url("notification.webhook_url", webhook_url)?;
                Arc::new(DiscordNotifier::new(webhook_url))
            }
            Self::Webhook { url, method } => {
                require_url("notification.url", url)?;
                Arc::new(WebhookNotifier::new(url, *method))
            }
        };

        Ok(notifier)
    }
}

fn require(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField(key.to_string()));
    }
    Ok(())
}

fn require_url(key: &str, value: &str) -> Result<(), ConfigError> {
    require(key, value)?;
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected an http(s) URL, got '{}'", value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_console() {
        let config = NotifierConfig::default();
        assert_eq!(config.kind(), "console");
        assert_eq!(config.build().unwrap().name(), "terminal");
    }

    #[test]
    fn test_parse_webhook_defaults_to_post() {
        let config: NotifierConfig =
            toml::from_str("type = \"webhook\"\nurl = \"https://test.com/webhook\"").unwrap();
        assert_eq!(
            config,
            NotifierConfig::Webhook {
                url: "https://test.com/webhook".to_string(),
                method: HttpMethod::Post,
            }
        );
    }

    #[test]
    fn test_parse_telegram() {
        let config: NotifierConfig = serde_json::from_str(
            r#"{"type": "telegram", "bot_token": "test_token", "chat_id": "123456"}"#,
        )
        .unwrap();
        assert_eq!(config.build().unwrap().name(), "telegram");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<NotifierConfig, _> = toml::from_str("type = \"pager\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let config = NotifierConfig::Telegram {
            bot_token: String::new(),
            chat_id: "1".to_string(),
        };
        assert!(matches!(
            config.build(),
            Err(ConfigError::MissingField(key)) if key == "notification.bot_token"
        ));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = NotifierConfig::Discord {
            webhook_url: "discord.com/webhook".to_string(),
        };
        assert!(matches!(
            config.build(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
