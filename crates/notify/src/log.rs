//! Log-only notifier, used when no push service is configured.

use async_trait::async_trait;
use dossier_core::error::NotifyError;
use dossier_core::notifier::{Notification, Notifier};
use tracing::info;

/// Writes notifications to the log and nowhere else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(title = %notification.title, message = %notification.message, "Notification (log only)");
        Ok(())
    }
}
