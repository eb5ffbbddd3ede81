//! `record_user_details`: a visitor left an email address.

use std::sync::Arc;

use async_trait::async_trait;
use dossier_core::error::ToolError;
use dossier_core::notifier::{Notification, Notifier, send_best_effort};
use dossier_core::persona::RECORD_USER_DETAILS;
use dossier_core::tool::Tool;
use serde_json::{Value, json};

const NAME_PLACEHOLDER: &str = "Name not provided";
const NOTES_PLACEHOLDER: &str = "Notes not provided";

pub struct RecordUserDetailsTool {
    notifier: Arc<dyn Notifier>,
    title: String,
}

impl RecordUserDetailsTool {
    pub fn new(notifier: Arc<dyn Notifier>, title: impl Into<String>) -> Self {
        Self {
            notifier,
            title: title.into(),
        }
    }
}

#[async_trait]
impl Tool for RecordUserDetailsTool {
    fn name(&self) -> &str {
        RECORD_USER_DETAILS
    }

    fn description(&self) -> &str {
        "Use this tool to record that a user is interested in being in touch and provided an email address"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "email": {
                    "type": "string",
                    "description": "The email address of this user"
                },
                "name": {
                    "type": "string",
                    "description": "The user's name, if they provided it"
                },
                "notes": {
                    "type": "string",
                    "description": "Any additional information about the conversation that's worth recording to give context"
                }
            },
            "required": ["email"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let email = crate::required_str(&arguments, "email")?;
        let name = arguments["name"].as_str().unwrap_or(NAME_PLACEHOLDER);
        let notes = arguments["notes"].as_str().unwrap_or(NOTES_PLACEHOLDER);

        let message = format!("Recording {name} with email {email} and notes {notes}");
        send_best_effort(&self.notifier, Notification::new(&self.title, message)).await;

        Ok(json!({ "recorded": "ok" }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingNotifier;

    fn tool_with(notifier: &Arc<RecordingNotifier>) -> RecordUserDetailsTool {
        RecordUserDetailsTool::new(notifier.clone(), "Dossier")
    }

    #[tokio::test]
    async fn email_only_uses_placeholders() {
        let notifier = Arc::new(RecordingNotifier::default());
        let result = tool_with(&notifier)
            .execute(json!({"email": "a@b.com"}))
            .await
            .unwrap();

        assert_eq!(result, json!({"recorded": "ok"}));
        let sent = notifier.messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("a@b.com"));
        assert!(sent[0].contains("Name not provided"));
        assert!(sent[0].contains("Notes not provided"));
    }

    #[tokio::test]
    async fn full_details_are_sent_verbatim() {
        let notifier = Arc::new(RecordingNotifier::default());
        tool_with(&notifier)
            .execute(json!({"email": "ada@example.com", "name": "Ada", "notes": "wants a call"}))
            .await
            .unwrap();

        assert_eq!(
            notifier.messages(),
            vec!["Recording Ada with email ada@example.com and notes wants a call"]
        );
        assert_eq!(notifier.sent.lock().unwrap()[0].title, "Dossier");
    }

    #[tokio::test]
    async fn identical_calls_send_twice() {
        let notifier = Arc::new(RecordingNotifier::default());
        let tool = tool_with(&notifier);
        tool.execute(json!({"email": "a@b.com"})).await.unwrap();
        tool.execute(json!({"email": "a@b.com"})).await.unwrap();
        assert_eq!(notifier.messages().len(), 2);
    }

    #[tokio::test]
    async fn notifier_failure_still_records() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let result = tool_with(&notifier)
            .execute(json!({"email": "a@b.com"}))
            .await
            .unwrap();
        assert_eq!(result, json!({"recorded": "ok"}));
    }

    #[tokio::test]
    async fn missing_email_is_invalid() {
        let notifier = Arc::new(RecordingNotifier::default());
        let err = tool_with(&notifier)
            .execute(json!({"name": "Ada"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(notifier.messages().is_empty());
    }
}
