//! Provider trait: the abstraction over the hosted language model.
//!
//! The conversation loop hands a provider the working transcript plus the
//! tool descriptors and gets back either a final answer or a batch of tool
//! invocation requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;
use crate::message::Message;

/// A single model call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gpt-4o-mini")
    pub model: String,

    /// The working transcript, framing message first
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 2.0 = very creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Tools the model may request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A tool descriptor sent to the model so it knows what it can call.
///
/// The schema is advisory: arguments coming back are not validated against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    ToolCalls,
    Length,
    ContentFilter,
    #[serde(untagged)]
    Other(String),
}

impl FinishReason {
    /// Map the wire string onto a reason; unknown values are preserved.
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "stop" => Self::Stop,
            "tool_calls" | "function_call" => Self::ToolCalls,
            "length" => Self::Length,
            "content_filter" => Self::ContentFilter,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated assistant message
    pub message: Message,

    /// Why generation stopped
    pub finish_reason: FinishReason,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

impl ProviderResponse {
    /// Whether this response asks the host to run tools.
    ///
    /// A `tool_calls` finish reason with an empty call list is treated as a
    /// final answer; there would be nothing to execute.
    pub fn requests_tools(&self) -> bool {
        self.message.has_tool_calls()
    }
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The agent loop calls `complete()` without knowing which backend is in use.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai", "openrouter").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<ProviderResponse, ProviderError>;

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageToolCall;

    #[test]
    fn finish_reason_from_wire() {
        assert_eq!(FinishReason::from_wire("tool_calls"), FinishReason::ToolCalls);
        assert_eq!(FinishReason::from_wire("stop"), FinishReason::Stop);
        assert_eq!(
            FinishReason::from_wire("eos"),
            FinishReason::Other("eos".into())
        );
    }

    #[test]
    fn empty_tool_call_list_is_a_final_answer() {
        let response = ProviderResponse {
            message: Message::assistant("done"),
            finish_reason: FinishReason::ToolCalls,
            usage: None,
            model: "m".into(),
        };
        assert!(!response.requests_tools());
    }

    #[test]
    fn tool_calls_request_tools() {
        let response = ProviderResponse {
            message: Message::assistant_tool_calls(
                None,
                vec![MessageToolCall {
                    id: "call_1".into(),
                    name: "record_user_details".into(),
                    arguments: "{}".into(),
                }],
            ),
            finish_reason: FinishReason::ToolCalls,
            usage: None,
            model: "m".into(),
        };
        assert!(response.requests_tools());
    }

    #[test]
    fn tool_definition_serialization() {
        let tool = ToolDefinition {
            name: "record_unknown_question".into(),
            description: "Record a question that could not be answered".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "question": { "type": "string" }
                },
                "required": ["question"]
            }),
        };
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("record_unknown_question"));
        assert!(json.contains("required"));
    }
}
