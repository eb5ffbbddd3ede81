//! Wires configuration into a ready-to-run conversation loop.

use std::path::Path;
use std::sync::Arc;

use dossier_agent::ConversationLoop;
use dossier_config::AppConfig;
use dossier_core::event::{EventBus, spawn_log_sink};
use dossier_core::persona::{Persona, framing_instructions};
use tracing::info;

/// Everything a command needs to hold a conversation.
pub struct Runtime {
    pub config: AppConfig,
    pub persona: Persona,
    pub conversation: Arc<ConversationLoop>,
    pub provider_name: String,
    pub notifier_name: String,
}

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load(path).map_err(|e| format!("Failed to load config: {e}").into())
}

/// Build provider, notifier, tools, and knowledge once, then the loop.
pub fn build(config: AppConfig) -> Result<Runtime, Box<dyn std::error::Error>> {
    if !config.has_api_key() && !dossier_providers::router::is_local(&config.provider) {
        print_api_key_help();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = dossier_providers::build_from_config(&config)?;
    let notifier = dossier_notify::build_from_config(&config.notifications)?;
    let tools = Arc::new(dossier_tools::default_registry(
        notifier.clone(),
        &config.notifications.title,
    ));

    let persona = config.persona.to_persona();
    let knowledge =
        dossier_knowledge::load_knowledge(&config.persona.profile_path, &config.persona.summary_path)?;
    let framing = framing_instructions(&persona, &knowledge);
    info!(persona = %persona.name, tools = tools.len(), "Persona ready");

    let events = Arc::new(EventBus::default());
    spawn_log_sink(&events);

    let conversation = ConversationLoop::new(
        provider.clone(),
        &config.model,
        tools,
        framing,
        events,
    )
    .with_config(&config);

    Ok(Runtime {
        provider_name: provider.name().to_string(),
        notifier_name: notifier.name().to_string(),
        config,
        persona,
        conversation: Arc::new(conversation),
    })
}

fn print_api_key_help() {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables (or put it in .env):");
    eprintln!("    OPENAI_API_KEY=sk-...          (OpenAI)");
    eprintln!("    OPENROUTER_API_KEY=sk-or-...   (OpenRouter, also set DOSSIER_PROVIDER=openrouter)");
    eprintln!("    DOSSIER_API_KEY=...            (generic)");
    eprintln!();
    eprintln!("  Or add api_key to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
}
