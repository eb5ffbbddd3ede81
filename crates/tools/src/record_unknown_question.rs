//! `record_unknown_question`: the persona could not answer something.

use std::sync::Arc;

use async_trait::async_trait;
use dossier_core::error::ToolError;
use dossier_core::notifier::{Notification, Notifier, send_best_effort};
use dossier_core::persona::RECORD_UNKNOWN_QUESTION;
use dossier_core::tool::Tool;
use serde_json::{Value, json};

pub struct RecordUnknownQuestionTool {
    notifier: Arc<dyn Notifier>,
    title: String,
}

impl RecordUnknownQuestionTool {
    pub fn new(notifier: Arc<dyn Notifier>, title: impl Into<String>) -> Self {
        Self {
            notifier,
            title: title.into(),
        }
    }
}

#[async_trait]
impl Tool for RecordUnknownQuestionTool {
    fn name(&self) -> &str {
        RECORD_UNKNOWN_QUESTION
    }

    fn description(&self) -> &str {
        "Always use this tool to record any question that couldn't be answered as you didn't know the answer"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The question that couldn't be answered"
                }
            },
            "required": ["question"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let question = crate::required_str(&arguments, "question")?;

        let message = format!("Recording {question} asked that I don't know the answer to");
        send_best_effort(&self.notifier, Notification::new(&self.title, message)).await;

        Ok(Value::String("Unknown Question recorded successfully".into()))
    }
}
