//! Shared fakes for loop tests.

use async_trait::async_trait;
use dossier_core::error::{ProviderError, ToolError};
use dossier_core::message::{Message, MessageToolCall};
use dossier_core::provider::{FinishReason, Provider, ProviderRequest, ProviderResponse, Usage};
use dossier_core::tool::Tool;
use std::sync::{Arc, Mutex};

enum Script {
    Sequence(Vec<ProviderResponse>),
    Repeat(ProviderResponse),
    Fail(ProviderError),
}

/// A provider that plays back scripted responses and records every request.
///
/// Panics if more calls are made than responses provided.
pub struct ScriptedProvider {
    script: Script,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self::with_script(Script::Sequence(responses))
    }

    /// Answer every call with the same response.
    pub fn repeating(response: ProviderResponse) -> Self {
        Self::with_script(Script::Repeat(response))
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::with_script(Script::Fail(error))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();
        requests.push(request);

        match &self.script {
            Script::Sequence(responses) => match responses.get(call) {
                Some(response) => Ok(response.clone()),
                None => panic!(
                    "ScriptedProvider: no more responses (call #{call}, have {})",
                    responses.len()
                ),
            },
            Script::Repeat(response) => Ok(response.clone()),
            Script::Fail(error) => Err(error.clone()),
        }
    }
}

fn usage() -> Option<Usage> {
    Some(Usage {
        prompt_tokens: 10,
        completion_tokens: 5,
        total_tokens: 15,
    })
}

/// Create a plain text response (no tool calls).
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        finish_reason: FinishReason::Stop,
        usage: usage(),
        model: "mock-model".into(),
    }
}

/// Create a response requesting the given tool calls.
pub fn make_tool_call_response(tool_calls: Vec<MessageToolCall>) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant_tool_calls(None, tool_calls),
        finish_reason: FinishReason::ToolCalls,
        usage: usage(),
        model: "mock-model".into(),
    }
}

pub fn make_tool_call(id: &str, name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: args.to_string(),
    }
}

/// A tool that echoes its arguments back and remembers each call.
pub struct CountingTool {
    name: String,
    seen: Mutex<Vec<serde_json::Value>>,
}

impl CountingTool {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn seen(&self) -> Vec<serde_json::Value> {
        self.seen.lock().unwrap().clone()
    }
}

/// Lets a test keep a handle on a tool after handing it to the registry.
pub struct SharedTool(pub Arc<CountingTool>);

#[async_trait]
impl Tool for SharedTool {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn description(&self) -> &str {
        "Records its arguments"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object" })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        self.0.seen.lock().unwrap().push(arguments.clone());
        Ok(arguments)
    }
}
