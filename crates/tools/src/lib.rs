//! Tools the persona can invoke during a conversation.
//!
//! Both tools exist to get a message to the persona's owner: one records a
//! visitor who wants to get in touch, the other records a question the
//! persona could not answer. Each sends one push notification per call and
//! never fails because the notification did.

pub mod record_unknown_question;
pub mod record_user_details;

use std::sync::Arc;

use dossier_core::notifier::Notifier;
use dossier_core::tool::ToolRegistry;

pub use record_unknown_question::RecordUnknownQuestionTool;
pub use record_user_details::RecordUserDetailsTool;

/// Create the registry with both built-in tools, sharing one notifier.
pub fn default_registry(notifier: Arc<dyn Notifier>, title: impl Into<String>) -> ToolRegistry {
    let title = title.into();
    ToolRegistry::new()
        .with(Box::new(RecordUserDetailsTool::new(notifier.clone(), title.clone())))
        .with(Box::new(RecordUnknownQuestionTool::new(notifier, title)))
}

/// Pull a required string argument out of the model's payload.
pub(crate) fn required_str<'a>(
    arguments: &'a serde_json::Value,
    key: &str,
) -> Result<&'a str, dossier_core::error::ToolError> {
    arguments[key].as_str().ok_or_else(|| {
        dossier_core::error::ToolError::InvalidArguments(format!("Missing '{key}' argument"))
    })
}
