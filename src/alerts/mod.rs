//! Alert classification and notification system
//!
//! Provides the hysteresis classifier and the notification channels it
//! feeds.

pub mod classifier;
mod config;
mod notifier;
mod types;

pub use classifier::{Classification, ClassificationState, RateEvent, Transition};
pub use config::NotifierConfig;
pub use notifier::{
    DiscordNotifier, HttpMethod, Notifier, TelegramNotifier, TerminalNotifier, WebhookNotifier,
};
pub use types::{Notification, NotificationKind};
