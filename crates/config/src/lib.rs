//! Configuration loading, validation, and management for Dossier.
//!
//! Loads configuration from `~/.dossier/config.toml` (or an explicit path),
//! then applies a `.env` file and environment variable overrides for
//! credentials. Validates all settings at startup.

use dossier_core::UnknownToolPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.dossier/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model provider ("openai", "openrouter", "ollama", ...)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model to call
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per model response (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Conversation loop settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Who the agent speaks as, and where its knowledge lives
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Push notification settings
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// HTTP chat surface settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("agent", &self.agent)
            .field("persona", &self.persona)
            .field("notifications", &self.notifications)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum model calls per turn
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// What to feed back when the model names a tool that doesn't exist
    #[serde(default)]
    pub unknown_tool: UnknownToolPolicy,
}

fn default_max_rounds() -> u32 {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            unknown_tool: UnknownToolPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default = "default_persona_name")]
    pub name: String,

    /// Subject matter, e.g. "career, background, skills and experience"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<String>,

    /// Greeting shown before the first turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,

    /// Profile document (PDF, or plain text / markdown)
    #[serde(default = "default_profile_path")]
    pub profile_path: PathBuf,

    /// Free-form summary (plain text)
    #[serde(default = "default_summary_path")]
    pub summary_path: PathBuf,
}

fn default_persona_name() -> String {
    "Gotham".into()
}
fn default_profile_path() -> PathBuf {
    PathBuf::from("me/profile.pdf")
}
fn default_summary_path() -> PathBuf {
    PathBuf::from("me/summary.txt")
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
            topics: None,
            greeting: None,
            profile_path: default_profile_path(),
            summary_path: default_summary_path(),
        }
    }
}

impl PersonaConfig {
    /// Build the domain persona from this section.
    pub fn to_persona(&self) -> dossier_core::Persona {
        let mut persona = dossier_core::Persona::new(&self.name);
        if let Some(topics) = &self.topics {
            persona = persona.with_topics(topics);
        }
        if let Some(greeting) = &self.greeting {
            persona = persona.with_greeting(greeting);
        }
        persona
    }
}

/// Which notifier backs the tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierBackend {
    /// Pushover when credentials are present, otherwise log only
    #[default]
    Auto,
    Pushover,
    Log,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub backend: NotifierBackend,

    /// Pushover application token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushover_token: Option<String>,

    /// Pushover user key (the recipient)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushover_user: Option<String>,

    #[serde(default = "default_pushover_url")]
    pub pushover_url: String,

    /// Title attached to every notification
    #[serde(default = "default_notification_title")]
    pub title: String,

    /// Upper bound on a single send
    #[serde(default = "default_notification_timeout")]
    pub timeout_secs: u64,
}

fn default_pushover_url() -> String {
    "https://api.pushover.net/1/messages.json".into()
}
fn default_notification_title() -> String {
    "Dossier".into()
}
fn default_notification_timeout() -> u64 {
    10
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            backend: NotifierBackend::default(),
            pushover_token: None,
            pushover_user: None,
            pushover_url: default_pushover_url(),
            title: default_notification_title(),
            timeout_secs: default_notification_timeout(),
        }
    }
}

impl NotificationConfig {
    /// Both Pushover credentials are present.
    pub fn has_pushover_credentials(&self) -> bool {
        self.pushover_token.is_some() && self.pushover_user.is_some()
    }
}

impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("backend", &self.backend)
            .field("pushover_token", &redact(&self.pushover_token))
            .field("pushover_user", &redact(&self.pushover_user))
            .field("pushover_url", &self.pushover_url)
            .field("title", &self.title)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Extra origins allowed to call the chat API from a browser
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    7860
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: vec![],
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or from the default location when `None`.
    ///
    /// A `.env` file in the working directory is read first and its values
    /// replace variables already set in the process. Environment variables
    /// then override file values:
    /// - `DOSSIER_API_KEY`, `OPENAI_API_KEY`, `OPENROUTER_API_KEY` (first found wins)
    /// - `DOSSIER_PROVIDER`, `DOSSIER_MODEL`
    /// - `PUSHOVER_TOKEN`, `PUSHOVER_USER`
    /// - `DOSSIER_PROFILE`, `DOSSIER_SUMMARY`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(env_file) = dotenvy::dotenv_override() {
            tracing::debug!(path = %env_file.display(), "Loaded .env file");
        }

        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Self::config_dir().join("config.toml"));
        Self::load_with(&config_path, |key| std::env::var(key).ok())
    }

    /// Read `path`, apply overrides from `lookup`, then validate the result.
    pub fn load_with(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Parse a specific file path, without environment overrides or validation.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    /// Blank values count as unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(key) = lookup("DOSSIER_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .or_else(|| lookup("OPENROUTER_API_KEY"))
        {
            self.api_key = Some(key);
        }
        if let Some(provider) = lookup("DOSSIER_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = lookup("DOSSIER_MODEL") {
            self.model = model;
        }
        if let Some(token) = lookup("PUSHOVER_TOKEN") {
            self.notifications.pushover_token = Some(token);
        }
        if let Some(user) = lookup("PUSHOVER_USER") {
            self.notifications.pushover_user = Some(user);
        }
        if let Some(profile) = lookup("DOSSIER_PROFILE") {
            self.persona.profile_path = PathBuf::from(profile);
        }
        if let Some(summary) = lookup("DOSSIER_SUMMARY") {
            self.persona.summary_path = PathBuf::from(summary);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".dossier")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_rounds must be at least 1".into(),
            ));
        }

        if self.notifications.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "notifications.timeout_secs must be > 0".into(),
            ));
        }

        if self.notifications.backend == NotifierBackend::Pushover
            && !self.notifications.has_pushover_credentials()
        {
            return Err(ConfigError::ValidationError(
                "notifications.backend = \"pushover\" requires pushover_token and pushover_user".into(),
            ));
        }

        Ok(())
    }

    /// Check if a model API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            agent: AgentConfig::default(),
            persona: PersonaConfig::default(),
            notifications: NotificationConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
