//! JSON API handlers used by the chat widget.

use axum::{extract::State, http::StatusCode, response::Json};
use dossier_core::message::Message;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::SharedState;

/// Shown to visitors when the model call fails. The real error is logged.
const MODEL_FAILURE_MESSAGE: &str =
    "Sorry, I'm having trouble answering right now. Please try again in a moment.";

/// Roles the widget may send back as history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Assistant,
}

/// One visible message from earlier in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub content: String,
}

impl From<&HistoryEntry> for Message {
    fn from(entry: &HistoryEntry) -> Self {
        match entry.role {
            HistoryRole::User => Message::user(&entry.content),
            HistoryRole::Assistant => Message::assistant(&entry.content),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct PersonaResponse {
    pub name: String,
    pub greeting: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn persona_handler(State(state): State<SharedState>) -> Json<PersonaResponse> {
    Json(PersonaResponse {
        name: state.persona.name.clone(),
        greeting: state.persona.greeting.clone(),
    })
}

/// Answer one visitor message.
pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "message must not be empty"));
    }

    info!(history = payload.history.len(), "Chat request");
    let history: Vec<Message> = payload.history.iter().map(Message::from).collect();

    match state.conversation.run_turn(&payload.message, &history).await {
        Ok(reply) => Ok(Json(ChatResponse { reply })),
        Err(e) => {
            warn!(error = %e, "Turn failed");
            Err(api_error(StatusCode::BAD_GATEWAY, MODEL_FAILURE_MESSAGE))
        }
    }
}
