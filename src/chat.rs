//! Chat-completion client abstraction and implementations.
//!
//! Defines the [`ChatClient`] trait and two implementations:
//! - **[`DisabledChatClient`]** — always errors; used when `chat.provider = "disabled"`.
//! - **[`OpenAIChatClient`]** — calls an OpenAI-compatible `POST /chat/completions`
//!   endpoint with retry and backoff.
//!
//! Only the minimal request (`model`, `messages`, `max_tokens`, `temperature`)
//! and the `choices[0].message.content` reply field are relied on, so any
//! compatible endpoint can be pointed at through `chat.base_url`.
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::ChatConfig;
use crate::models::ChatMessage;

/// A chat-completion backend.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Model identifier sent with each request (e.g. `"gpt-4o-mini"`).
    fn model_name(&self) -> &str;

    /// Send `messages` and return the assistant's reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Instantiate the client selected by `config.provider`.
pub fn create_client(config: &ChatConfig) -> Result<Box<dyn ChatClient>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledChatClient)),
        "openai" => Ok(Box::new(OpenAIChatClient::new(config)?)),
        other => bail!("Unknown chat provider: {}", other),
    }
}

// ============ Disabled Client ============

pub struct DisabledChatClient;

#[async_trait]
impl ChatClient for DisabledChatClient {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
        bail!("Chat provider is disabled. Set [chat] provider in config.")
    }
}

// ============ OpenAI-compatible Client ============

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// The API key is read once, at construction, from the environment
/// variable named by `chat.api_key_env`.
pub struct OpenAIChatClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    max_retries: u32,
}

impl OpenAIChatClient {
    /// # Errors
    ///
    /// Returns an error if the API key variable is unset or empty, or the
    /// HTTP client cannot be built.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "{} environment variable not set. It must hold the chat API key.",
                    config.api_key_env
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: completions_url(&config.base_url),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tracing::warn!(attempt, ?delay, "retrying chat completion");
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&self.endpoint)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        return parse_completion_response(&json);
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow!("Chat API error {}: {}", status, body_text));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    bail!("Chat API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow!("Chat completion failed after retries")))
    }
}

/// Append `/chat/completions` to a base URL, tolerating a trailing slash.
fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Extract `choices[0].message.content` from a completion response.
pub fn parse_completion_response(json: &serde_json::Value) -> Result<String> {
    let content = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| anyhow!("Invalid chat response: missing choices[0].message.content"))?;

    Ok(content.trim().to_string())
}
