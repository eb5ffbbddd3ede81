//! Provider selection from configuration.
//!
//! Every supported backend speaks the OpenAI chat-completions dialect, so
//! selection reduces to picking a base URL and credentials.

use std::sync::Arc;

use dossier_config::AppConfig;
use dossier_core::error::ProviderError;
use dossier_core::provider::Provider;
use tracing::info;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured provider.
///
/// An explicit `api_url` wins over the well-known base URL for the provider
/// name. Local backends (ollama, vllm, llamacpp) need no API key.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.provider.as_str();
    let base_url = match &config.api_url {
        Some(url) => url.clone(),
        None => default_base_url(name).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "unknown provider '{name}'; set api_url to use a custom OpenAI-compatible endpoint"
            ))
        })?,
    };

    let api_key = match config.api_key.clone() {
        Some(key) => key,
        None if is_local(name) => name.to_string(),
        None => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key for provider '{name}'; set DOSSIER_API_KEY or OPENAI_API_KEY"
            )));
        }
    };

    info!(provider = name, base_url = %base_url, model = %config.model, "Provider configured");
    Ok(Arc::new(OpenAiCompatProvider::new(name, base_url, api_key)?))
}

/// Local backends that accept any API key.
pub fn is_local(provider_name: &str) -> bool {
    matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> Option<String> {
    let url = match provider_name {
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "together" => "https://api.together.xyz/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    };
    Some(url.to_string())
}
