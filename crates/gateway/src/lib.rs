//! HTTP chat surface for Dossier.
//!
//! Serves the embedded chat widget and a small JSON API the widget talks
//! to. The server keeps no conversation state: the widget sends the visible
//! history with every message.
//!
//! Built on Axum.

pub mod chat;
pub mod frontend;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    routing::{get, post},
};
use dossier_agent::ConversationLoop;
use dossier_config::GatewayConfig;
use dossier_core::persona::Persona;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Shared, read-only state behind every request.
pub struct AppState {
    pub conversation: Arc<ConversationLoop>,
    pub persona: Persona,
}

pub type SharedState = Arc<AppState>;

/// Build the router with the API routes and the embedded widget.
///
/// Layers applied:
/// - CORS limited to the configured origins (same-origin only when empty)
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/health", get(chat::health_handler))
        .route("/api/persona", get(chat::persona_handler))
        .route("/api/chat", post(chat::chat_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors_layer(&config.allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start(
    config: &GatewayConfig,
    conversation: Arc<ConversationLoop>,
    persona: Persona,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState {
        conversation,
        persona,
    });
    let app = build_router(state, config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Chat widget available at http://{addr}/");
    axum::serve(listener, app).await?;

    Ok(())
}
