//! Language model client
//!
//! [`LanguageModel`] is the seam the synthesizer calls through.
//! [`OllamaClient`] talks to a local Ollama server over its `/api/chat`
//! endpoint with streaming disabled.

use crate::prompt::PromptMessage;
use mosql_core::LlmConfig;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Default Ollama endpoint
pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";

/// Errors from a language model call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestError(String),

    #[error("LLM HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("LLM returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("no completion")]
    NoCompletion,
}

/// Candidate replies from one call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub choices: Vec<String>,
}

impl Completion {
    /// A completion with a single choice
    pub fn single(content: impl Into<String>) -> Self {
        Self { choices: vec![content.into()] }
    }

    /// The first choice, or [`LlmError::NoCompletion`]
    pub fn first(&self) -> Result<&str, LlmError> {
        self.choices.first().map(String::as_str).ok_or(LlmError::NoCompletion)
    }
}

/// A chat model that turns messages into completions
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Backend name for logs (e.g., "ollama")
    fn name(&self) -> &'static str;

    /// Generate a completion for the message sequence
    async fn generate(
        &self,
        messages: &[PromptMessage],
        temperature: f32,
    ) -> Result<Completion, LlmError>;
}

/// Ollama chat client
pub struct OllamaClient {
    client: reqwest::Client,
    host: String,
    model: String,
}

impl OllamaClient {
    /// Create a client for `model` on `host`
    pub fn new(
        host: &str,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::RequestError(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            host: normalize_host(host),
            model: model.into(),
        })
    }

    /// Create a client from the `[llm]` configuration section
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        Self::new(&config.host, config.model.clone(), timeout)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host)
    }
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaChatMessage>,
}

#[derive(Deserialize)]
struct OllamaChatMessage {
    content: String,
}

#[async_trait::async_trait]
impl LanguageModel for OllamaClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(
        &self,
        messages: &[PromptMessage],
        temperature: f32,
    ) -> Result<Completion, LlmError> {
        let url = self.chat_url();
        let body = json!({
            "model": self.model,
            "stream": false,
            "messages": messages,
            "options": {
                "temperature": temperature
            }
        });

        tracing::debug!(%url, model = %self.model, messages = messages.len(), "sending chat request");

        let resp = self.client.post(&url).json(&body).send().await.map_err(|e| {
            LlmError::RequestError(format!(
                "failed to reach ollama at {} (is it running?): {}",
                url, e
            ))
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmError::HttpError { status: status.as_u16(), body: text });
        }

        let out: OllamaChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("ollama returned invalid JSON: {}", e)))?;

        Ok(Completion {
            choices: out.message.map(|m| m.content).into_iter().collect(),
        })
    }
}

/// Add a scheme when missing and drop trailing slashes
fn normalize_host(host: &str) -> String {
    let mut host = host.trim().to_string();
    if host.is_empty() {
        host = DEFAULT_OLLAMA_HOST.to_string();
    }
    if !host.starts_with("http://") && !host.starts_with("https://") {
        host = format!("http://{}", host);
    }
    host.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_normalization() {
        assert_eq!(normalize_host(""), DEFAULT_OLLAMA_HOST);
        assert_eq!(normalize_host("gpu-box:11434"), "http://gpu-box:11434");
        assert_eq!(normalize_host("https://llm.internal/ "), "https://llm.internal");
    }

    #[test]
    fn client_from_config() {
        let config = LlmConfig {
            model: "sqlcoder".to_string(),
            host: "localhost:11434/".to_string(),
            ..LlmConfig::default()
        };
        let client = OllamaClient::from_config(&config).unwrap();
        assert_eq!(client.model(), "sqlcoder");
        assert_eq!(client.chat_url(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn empty_completion_has_no_first_choice() {
        assert_eq!(Completion::default().first(), Err(LlmError::NoCompletion));
        assert_eq!(Completion::single("SELECT 1").first(), Ok("SELECT 1"));
    }

    #[test]
    fn response_without_message_yields_no_choices() {
        let out: OllamaChatResponse = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(out.message.is_none());

        let out: OllamaChatResponse =
            serde_json::from_str(r#"{"message":{"role":"assistant","content":"SELECT 1"}}"#).unwrap();
        assert_eq!(out.message.unwrap().content, "SELECT 1");
    }
}
