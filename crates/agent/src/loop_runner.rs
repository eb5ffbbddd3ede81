//! The conversation loop implementation.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use dossier_config::AppConfig;
use dossier_core::error::ToolError;
use dossier_core::event::{DomainEvent, EventBus};
use dossier_core::message::{Message, MessageToolCall, Role, Transcript};
use dossier_core::provider::{Provider, ProviderRequest};
use dossier_core::tool::{ToolCall, ToolRegistry, UnknownToolPolicy};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Returned instead of a model answer when a turn runs out of rounds.
pub const ROUND_LIMIT_REPLY: &str =
    "I'm sorry, I wasn't able to finish answering that. Could you try rephrasing your question?";

const DEFAULT_MAX_ROUNDS: u32 = 10;

/// Where a turn currently stands.
#[derive(Debug)]
enum LoopState {
    /// The next step is a model call
    AwaitingModel,
    /// The model asked for tools; the message carries the calls
    ExecutingTools(Message),
    /// The model answered with text
    HaveFinalAnswer(String),
}

/// Everything a finished turn produced, for diagnostics and tests.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// The text handed back to the user
    pub reply: String,

    /// Number of model calls made
    pub rounds: u32,

    /// Number of tool calls executed across all rounds
    pub tool_calls: usize,

    /// True when the turn stopped at the round limit
    pub round_limit_hit: bool,

    /// The full working transcript, framing message first
    pub transcript: Transcript,
}

/// Drives one turn at a time against a provider and a fixed tool table.
///
/// Holds only shared, read-only state, so one instance can serve any
/// number of concurrent turns.
pub struct ConversationLoop {
    /// The model provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Max tokens per model response
    max_tokens: Option<u32>,

    /// Tools the model may invoke
    tools: Arc<ToolRegistry>,

    /// The persona's system message, built once at startup
    framing: Arc<str>,

    /// Maximum model calls per turn
    max_rounds: u32,

    /// What to feed back when the model names a tool we don't have
    unknown_tool: UnknownToolPolicy,

    /// Event bus for domain events
    event_bus: Arc<EventBus>,
}

impl ConversationLoop {
    /// Create a new conversation loop.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
        framing: impl Into<String>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            tools,
            framing: Arc::from(framing.into()),
            max_rounds: DEFAULT_MAX_ROUNDS,
            unknown_tool: UnknownToolPolicy::default(),
            event_bus,
        }
    }

    /// Apply model and agent settings from configuration.
    pub fn with_config(self, config: &AppConfig) -> Self {
        let looped = self
            .with_temperature(config.temperature)
            .with_max_rounds(config.agent.max_rounds)
            .with_unknown_tool_policy(config.agent.unknown_tool);
        match config.max_tokens {
            Some(max) => looped.with_max_tokens(max),
            None => looped,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set the maximum number of model calls per turn (at least one).
    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max.max(1);
        self
    }

    pub fn with_unknown_tool_policy(mut self, policy: UnknownToolPolicy) -> Self {
        self.unknown_tool = policy;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn framing(&self) -> &str {
        &self.framing
    }

    /// Answer one user message and return the final text.
    ///
    /// `history` is the visible conversation so far. Only a model call
    /// failure surfaces as an error.
    pub async fn run_turn(
        &self,
        message: &str,
        history: &[Message],
    ) -> Result<String, dossier_core::Error> {
        self.run_turn_detailed(message, history)
            .await
            .map(|outcome| outcome.reply)
    }

    /// Like [`run_turn`](Self::run_turn), but return the whole outcome.
    pub async fn run_turn_detailed(
        &self,
        message: &str,
        history: &[Message],
    ) -> Result<TurnOutcome, dossier_core::Error> {
        let turn_id = uuid::Uuid::new_v4().to_string();
        info!(turn_id = %turn_id, history = history.len(), "Starting turn");
        self.event_bus.publish(DomainEvent::TurnStarted {
            turn_id: turn_id.clone(),
            history_len: history.len(),
            timestamp: Utc::now(),
        });

        let mut transcript = self.working_transcript(message, history);
        let tool_definitions = self.tools.definitions();
        let mut rounds = 0u32;
        let mut tool_calls = 0usize;
        let mut state = LoopState::AwaitingModel;

        let (reply, round_limit_hit) = loop {
            state = match state {
                LoopState::AwaitingModel => {
                    if rounds >= self.max_rounds {
                        warn!(
                            turn_id = %turn_id,
                            rounds,
                            "Max rounds reached, returning fallback reply"
                        );
                        break (ROUND_LIMIT_REPLY.to_string(), true);
                    }
                    rounds += 1;
                    debug!(turn_id = %turn_id, round = rounds, "Calling model");

                    let request = ProviderRequest {
                        model: self.model.clone(),
                        messages: transcript.messages().to_vec(),
                        temperature: self.temperature,
                        max_tokens: self.max_tokens,
                        tools: tool_definitions.clone(),
                    };
                    let response = self.provider.complete(request).await?;

                    self.event_bus.publish(DomainEvent::ModelResponded {
                        turn_id: turn_id.clone(),
                        round: rounds,
                        model: response.model.clone(),
                        tool_calls: response.message.tool_calls.len(),
                        tokens_used: response.usage.as_ref().map(|u| u.total_tokens),
                        timestamp: Utc::now(),
                    });

                    if response.requests_tools() {
                        LoopState::ExecutingTools(response.message)
                    } else {
                        let text = response.message.text().to_string();
                        transcript.push(response.message);
                        LoopState::HaveFinalAnswer(text)
                    }
                }
                LoopState::ExecutingTools(assistant) => {
                    let calls = assistant.tool_calls.clone();
                    transcript.push(assistant);
                    for call in &calls {
                        let content = self.execute_call(&turn_id, call).await;
                        transcript.push(Message::tool_result(&call.id, content));
                        tool_calls += 1;
                    }
                    LoopState::AwaitingModel
                }
                LoopState::HaveFinalAnswer(text) => break (text, false),
            };
        };

        info!(turn_id = %turn_id, rounds, tool_calls, "Turn complete");
        self.event_bus.publish(DomainEvent::TurnCompleted {
            turn_id,
            rounds,
            round_limit_hit,
            timestamp: Utc::now(),
        });

        Ok(TurnOutcome {
            reply,
            rounds,
            tool_calls,
            round_limit_hit,
            transcript,
        })
    }

    /// Framing message first, then the caller's history minus any system
    /// messages, then the new user message.
    fn working_transcript(&self, message: &str, history: &[Message]) -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push(Message::system(self.framing.as_ref()));
        transcript.extend(history.iter().filter(|m| m.role != Role::System).cloned());
        transcript.push(Message::user(message));
        transcript
    }

    /// Run one tool call and render the tool message content. Never fails:
    /// errors become content the model can read.
    async fn execute_call(&self, turn_id: &str, raw: &MessageToolCall) -> String {
        info!(turn_id, tool = %raw.name, arguments = %raw.arguments, "Tool call");
        let start = Instant::now();

        let result = match ToolCall::parse(raw) {
            Ok(call) => self.tools.dispatch(&call).await,
            Err(e) => Err(e),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        self.event_bus.publish(DomainEvent::ToolExecuted {
            turn_id: turn_id.to_string(),
            tool_name: raw.name.clone(),
            call_id: raw.id.clone(),
            success: result.is_ok(),
            duration_ms,
            timestamp: Utc::now(),
        });

        match result {
            Ok(tool_result) => tool_result.to_content(),
            Err(ToolError::NotFound(name)) => {
                warn!(turn_id, tool = %name, "Model requested an unknown tool");
                match self.unknown_tool {
                    UnknownToolPolicy::Null => serde_json::Value::Null.to_string(),
                    UnknownToolPolicy::Report => {
                        serde_json::json!({ "error": format!("unknown tool: {name}") }).to_string()
                    }
                }
            }
            Err(e) => {
                warn!(turn_id, tool = %raw.name, error = %e, "Tool execution failed");
                serde_json::json!({ "error": e.to_string() }).to_string()
            }
        }
    }
}
