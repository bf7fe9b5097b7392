//! TOML configuration parsing and validation.
//!
//! All settings that the browser extension used to read ad hoc from its
//! storage (chunking constants, model, API key) are loaded here once and
//! passed explicitly into each command.
//!
//! ```toml
//! [db]
//! path = "./data/tcx.sqlite"
//!
//! [context]
//! chunk_size = 2000
//! max_chunks = 3
//!
//! [chat]
//! provider = "openai"
//! model = "gpt-4o-mini"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use transcript_context_core::assemble::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CHUNKS};
use transcript_context_core::ContextParams;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContextConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_max_chunks")]
    pub max_chunks: usize,
    /// Defaults to `chunk_size * max_chunks` when unset.
    #[serde(default)]
    pub threshold_chars: Option<usize>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_chunks: DEFAULT_MAX_CHUNKS,
            threshold_chars: None,
        }
    }
}

impl ContextConfig {
    pub fn params(&self) -> ContextParams {
        let params = ContextParams::new(self.chunk_size, self.max_chunks);
        match self.threshold_chars {
            Some(t) => params.with_threshold(t),
            None => params,
        }
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
fn default_max_chunks() -> usize {
    DEFAULT_MAX_CHUNKS
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl ChatConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_max_tokens() -> u32 {
    512
}
fn default_temperature() -> f64 {
    0.7
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.context.chunk_size == 0 {
        bail!("context.chunk_size must be > 0");
    }

    match config.chat.provider.as_str() {
        "disabled" | "openai" => {}
        other => bail!(
            "Unknown chat provider: '{}'. Must be disabled or openai.",
            other
        ),
    }

    if config.chat.is_enabled() {
        if config.chat.model.trim().is_empty() {
            bail!(
                "chat.model must be specified when provider is '{}'",
                config.chat.provider
            );
        }
        if config.chat.base_url.trim().is_empty() {
            bail!("chat.base_url must not be empty");
        }
    }

    if !(0.0..=2.0).contains(&config.chat.temperature) {
        bail!("chat.temperature must be in [0.0, 2.0]");
    }

    Ok(config)
}
