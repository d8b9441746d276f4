//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod listing_csv;
#[cfg(feature = "webhook")]
pub mod slack_webhook;
pub mod stdout_notifier;

/// Environment variable that overrides `[slack] webhook_url`.
pub const WEBHOOK_ENV: &str = "SLACK_WEBHOOK_URL";
