//! Notification backends for Dossier.
//!
//! All backends implement the `dossier_core::Notifier` trait. Tools hold an
//! `Arc<dyn Notifier>` and never know which one they were given.

pub mod log;
pub mod pushover;

use std::sync::Arc;

use dossier_config::{NotificationConfig, NotifierBackend};
use dossier_core::Notifier;
use dossier_core::error::NotifyError;
use tracing::{info, warn};

pub use log::LogNotifier;
pub use pushover::PushoverNotifier;

/// Build the notifier selected by configuration.
///
/// `auto` picks Pushover when both credentials are present and falls back
/// to the log-only notifier otherwise.
pub fn build_from_config(config: &NotificationConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match config.backend {
        NotifierBackend::Log => Ok(Arc::new(LogNotifier)),
        NotifierBackend::Pushover => Ok(Arc::new(PushoverNotifier::from_config(config)?)),
        NotifierBackend::Auto if config.has_pushover_credentials() => {
            info!("Pushover credentials found, push notifications enabled");
            Ok(Arc::new(PushoverNotifier::from_config(config)?))
        }
        NotifierBackend::Auto => {
            warn!("PUSHOVER_TOKEN/PUSHOVER_USER not set, notifications will only be logged");
            Ok(Arc::new(LogNotifier))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_without_credentials_logs() {
        let notifier = build_from_config(&NotificationConfig::default()).unwrap();
        assert_eq!(notifier.name(), "log");
    }

    #[test]
    fn auto_with_credentials_uses_pushover() {
        let config = NotificationConfig {
            pushover_token: Some("tok".into()),
            pushover_user: Some("usr".into()),
            ..NotificationConfig::default()
        };
        let notifier = build_from_config(&config).unwrap();
        assert_eq!(notifier.name(), "pushover");
    }

    #[test]
    fn explicit_pushover_without_credentials_fails() {
        let config = NotificationConfig {
            backend: NotifierBackend::Pushover,
            ..NotificationConfig::default()
        };
        let err = build_from_config(&config).err().unwrap();
        assert!(matches!(err, NotifyError::NotConfigured(_)));
    }

    #[test]
    fn explicit_log_ignores_credentials() {
        let config = NotificationConfig {
            backend: NotifierBackend::Log,
            pushover_token: Some("tok".into()),
            pushover_user: Some("usr".into()),
            ..NotificationConfig::default()
        };
        assert_eq!(build_from_config(&config).unwrap().name(), "log");
    }
}
