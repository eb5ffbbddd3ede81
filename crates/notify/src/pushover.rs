//! Pushover notifier.
//!
//! Posts a form to the Pushover messages endpoint. The response body is
//! ignored; only the status code matters.

use std::time::Duration;

use async_trait::async_trait;
use dossier_config::NotificationConfig;
use dossier_core::error::NotifyError;
use dossier_core::notifier::{Notification, Notifier};
use tracing::debug;

/// Sends notifications through the Pushover HTTP API.
pub struct PushoverNotifier {
    url: String,
    token: String,
    user: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl PushoverNotifier {
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        user: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::NotConfigured(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            token: token.into(),
            user: user.into(),
            timeout,
            client,
        })
    }

    /// Build from the `[notifications]` config section. Both credentials
    /// must be present.
    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotifyError> {
        let (Some(token), Some(user)) = (&config.pushover_token, &config.pushover_user) else {
            return Err(NotifyError::NotConfigured(
                "pushover requires PUSHOVER_TOKEN and PUSHOVER_USER".into(),
            ));
        };
        Self::new(
            &config.pushover_url,
            token,
            user,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    fn name(&self) -> &str {
        "pushover"
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let form = [
            ("token", self.token.as_str()),
            ("user", self.user.as_str()),
            ("message", notification.message.as_str()),
            ("title", notification.title.as_str()),
        ];

        let response = self
            .client
            .post(&self.url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                    }
                } else {
                    NotifyError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "Pushover responded");
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status_code: status.as_u16(),
            });
        }
        Ok(())
    }
}
