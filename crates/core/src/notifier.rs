//! Notifier trait: the outbound push-notification boundary.
//!
//! Tools use a notifier to tell the persona's owner that something happened
//! (a lead left an email, a question went unanswered). Sends are
//! fire-and-forget: callers log failures and carry on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::error::NotifyError;

/// A one-line push notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short title shown above the message
    pub title: String,

    /// The message body
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// The core Notifier trait.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A human-readable name for this notifier (e.g., "pushover", "log").
    fn name(&self) -> &str;

    /// Deliver a notification. Implementations must bound how long this waits.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Send a notification and swallow any failure after logging it.
///
/// Notification problems must never change a tool's return value.
pub async fn send_best_effort(notifier: &Arc<dyn Notifier>, notification: Notification) {
    tracing::info!(notifier = notifier.name(), message = %notification.message, "Push");
    if let Err(e) = notifier.send(&notification).await {
        tracing::warn!(notifier = notifier.name(), error = %e, "Notification failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FailingNotifier {
        attempts: Mutex<usize>,
    }

    #[async_trait]
    impl Notifier for FailingNotifier {
        fn name(&self) -> &str { "failing" }
        async fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
            *self.attempts.lock().unwrap() += 1;
            Err(NotifyError::Timeout { timeout_secs: 10 })
        }
    }

    #[tokio::test]
    async fn best_effort_absorbs_failures() {
        let failing = Arc::new(FailingNotifier { attempts: Mutex::new(0) });
        let notifier: Arc<dyn Notifier> = failing.clone();
        send_best_effort(&notifier, Notification::new("t", "m")).await;
        assert_eq!(*failing.attempts.lock().unwrap(), 1);
    }
}
