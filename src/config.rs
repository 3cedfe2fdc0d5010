//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`FILER_API_KEY`, `FILER_BASE_URL`, `FILER_MODEL`)
//! 2. TOML file specified via an explicit path
//! 3. ./filer.toml in the current directory
//! 4. $XDG_CONFIG_HOME/filer/filer.toml (or ~/.config/filer/filer.toml)
//! 5. Built-in defaults
//!
//! The resulting [`Config`] is a plain value passed into every entry point;
//! the core keeps no process-wide state.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL_ID: &str = "gpt-4o-mini";
const DEFAULT_API_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_TURNS: usize = 20;
const DEFAULT_TEMPERATURE: f64 = 0.2;

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub agent: AgentConfig,
    pub network: NetworkConfig,
}

/// API endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of an OpenAI-compatible endpoint, without the
    /// `/chat/completions` suffix.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            api_key: String::new(),
            model: DEFAULT_MODEL_ID.into(),
        }
    }
}

/// Agent behavior settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Override for the organizer system prompt. Empty means the built-in
    /// prompt from [`crate::prompt`] is used.
    pub system_prompt: String,
    /// Safety cap on agent loop turns.
    pub max_turns: usize,
    pub temperature: Option<f64>,
    /// Allow the classifier to suggest folder paths that don't exist yet.
    pub allow_new_path: bool,
    /// Ask the classifier to also suggest a cleaned-up bookmark title.
    pub want_title: bool,
    /// Root folder node id under which new classification paths are created.
    /// None means the provider's default root (the first folder child of the
    /// tree's top node).
    pub new_path_root: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            max_turns: DEFAULT_MAX_TURNS,
            temperature: Some(DEFAULT_TEMPERATURE),
            allow_new_path: true,
            want_title: true,
            new_path_root: None,
        }
    }
}

/// Network/HTTP timeout policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Default timeout for model API requests.
    pub api_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path; when given, a missing
/// file is an error instead of a silent fallback.
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    let config_text = if let Some(p) = path_override {
        std::fs::read_to_string(p)?
    } else if let Ok(text) = std::fs::read_to_string("filer.toml") {
        text
    } else if let Some(path) = global_config_path() {
        std::fs::read_to_string(path).unwrap_or_default()
    } else {
        String::new()
    };

    let mut config = parse_config(&config_text)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("filer").join("filer.toml"))
}

/// Parse TOML config text; empty input yields the defaults.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    if text.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(toml::from_str(text)?)
}

fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup("FILER_API_KEY").filter(|v| !v.trim().is_empty()) {
        config.api.api_key = key.trim().to_string();
    }
    if let Some(url) = lookup("FILER_BASE_URL").filter(|v| !v.trim().is_empty()) {
        config.api.base_url = url.trim().to_string();
    }
    if let Some(model) = lookup("FILER_MODEL").filter(|v| !v.trim().is_empty()) {
        config.api.model = model.trim().to_string();
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
    }
    if config.agent.max_turns == 0 {
        return Err(ConfigError::Invalid("agent.max_turns must be at least 1".into()));
    }
    Ok(())
}
