//! Ollama provider
//!
//! Connects to a local Ollama instance. The `/api/chat` endpoint streams
//! newline-delimited JSON rather than SSE, needs no credentials, and can take
//! minutes to answer the first request while a model loads, so the request
//! timeout is much longer than the cloud providers' and configurable.

use super::error::LlmError;
use super::stream::{LineDecoder, LineEvent};
use super::{AiProvider, CancelToken, ChatMessage, CompletionStream};
use std::time::Duration;
use tracing::{debug, warn};

pub(crate) const DEFAULT_API_BASE: &str = "http://localhost:11434";
pub(crate) const DEFAULT_MODEL: &str = "llama3.1:8b";
pub(crate) const DEFAULT_KEEP_ALIVE_MINUTES: &str = "15";

/// How long one request may run, model load included.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Provider for local Ollama inference.
pub struct OllamaProvider {
    /// Base URL for the Ollama API, no trailing slash
    api_base: String,

    /// Model identifier (required; Ollama needs no API key)
    model: String,

    /// Minutes to keep the model loaded after the request, sent as `"<n>m"`
    keep_alive: String,

    agent: ureq::Agent,
}

impl OllamaProvider {
    /// Create a new provider. A blank base URL falls back to
    /// `http://localhost:11434`, a blank keep-alive to 15 minutes. The model
    /// is required; a blank model leaves the provider unconfigured.
    pub fn new(api_base: &str, model: &str, keep_alive: &str) -> Self {
        Self::with_request_timeout(api_base, model, keep_alive, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a provider with an explicit request timeout.
    pub fn with_request_timeout(
        api_base: &str,
        model: &str,
        keep_alive: &str,
        timeout: Duration,
    ) -> Self {
        let api_base = if api_base.trim().is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            api_base.trim_end_matches('/').to_string()
        };
        let model = model.trim().to_string();
        let keep_alive = if keep_alive.trim().is_empty() {
            DEFAULT_KEEP_ALIVE_MINUTES.to_string()
        } else {
            keep_alive.trim().to_string()
        };

        Self {
            api_base,
            model,
            keep_alive,
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    /// Get the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, history: &[ChatMessage], system_prompt: &str) -> serde_json::Value {
        let mut messages: Vec<serde_json::Value> = Vec::with_capacity(history.len() + 1);

        if !system_prompt.trim().is_empty() {
            messages.push(serde_json::json!({
                "role": "system",
                "content": system_prompt
            }));
        }

        for msg in history {
            messages.push(serde_json::json!({
                "role": msg.role_str(),
                "content": msg.content
            }));
        }

        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": true,
            "keep_alive": format!("{}m", self.keep_alive)
        })
    }

    fn open_stream(
        &self,
        history: &[ChatMessage],
        system_prompt: &str,
        cancel: CancelToken,
    ) -> Result<CompletionStream, LlmError> {
        let url = format!("{}/api/chat", self.api_base);
        let body = self.request_body(history, system_prompt);

        debug!(model = %self.model, "starting Ollama completion request");

        match self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(&body)
        {
            Ok(response) => Ok(CompletionStream::body(
                response.into_reader(),
                Box::new(OllamaDecoder),
                cancel,
            )),
            Err(ureq::Error::Status(status, response)) => {
                Err(LlmError::from_status("Ollama", status, response))
            }
            Err(ureq::Error::Transport(transport)) => Err(LlmError::OllamaConnect {
                base: self.api_base.clone(),
                message: transport.to_string(),
            }),
        }
    }
}

impl AiProvider for OllamaProvider {
    fn stream_completion(
        &self,
        history: &[ChatMessage],
        system_prompt: &str,
        cancel: CancelToken,
    ) -> CompletionStream {
        if !self.is_configured() {
            return CompletionStream::message(LlmError::MissingModel.to_string());
        }

        match self.open_stream(history, system_prompt, cancel) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "Ollama request failed");
                CompletionStream::message(err.to_string())
            }
        }
    }

    fn name(&self) -> &str {
        "Ollama"
    }

    fn is_configured(&self) -> bool {
        !self.model.is_empty()
    }
}

/// NDJSON decoder for `/api/chat` responses.
///
/// No terminal sentinel: the final `done:true` object carries an empty
/// `message.content` and falls through the ordinary extraction path as a skip;
/// the stream ends when the body closes.
struct OllamaDecoder;

impl LineDecoder for OllamaDecoder {
    fn decode_line(&self, line: &str) -> LineEvent {
        let Ok(json) = serde_json::from_str::<serde_json::Value>(line) else {
            return LineEvent::Skip;
        };

        match json
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
        {
            Some(text) if !text.is_empty() => LineEvent::Chunk(text.to_string()),
            _ => LineEvent::Skip,
        }
    }
}
