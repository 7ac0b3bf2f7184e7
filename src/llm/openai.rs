//! OpenAI-compatible provider
//!
//! Speaks the `/chat/completions` SSE protocol used by OpenAI and
//! API-compatible gateways (Azure, OpenRouter, local proxies).

use super::error::LlmError;
use super::stream::{sse_data, LineDecoder, LineEvent};
use super::{AiProvider, CancelToken, ChatMessage, CompletionStream};
use tracing::{debug, warn};

pub(crate) const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub(crate) const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Provider for OpenAI-compatible chat completion APIs.
pub struct OpenAIProvider {
    /// API key (bearer token)
    api_key: String,

    /// Base URL for the API, no trailing slash
    api_base: String,

    /// Model identifier
    model: String,

    /// Optional `OpenAI-Organization` header value
    organisation: Option<String>,

    /// Optional `OpenAI-Project` header value
    project: Option<String>,

    /// Reused across sequential calls; overlapping streams are out of contract.
    agent: ureq::Agent,
}

impl OpenAIProvider {
    /// Create a new provider. Blank `api_base` or `model` fall back to
    /// `https://api.openai.com/v1` and `gpt-4o-mini`.
    pub fn new(
        api_key: &str,
        api_base: &str,
        model: &str,
        organisation: Option<String>,
        project: Option<String>,
    ) -> Self {
        let api_base = if api_base.trim().is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            api_base.trim_end_matches('/').to_string()
        };
        let model = if model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            model.to_string()
        };

        Self {
            api_key: api_key.to_string(),
            api_base,
            model,
            organisation,
            project,
            agent: ureq::agent(),
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
            "temperature": 0.7
        })
    }

    fn open_stream(
        &self,
        history: &[ChatMessage],
        system_prompt: &str,
        cancel: CancelToken,
    ) -> Result<CompletionStream, LlmError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = self.request_body(history, system_prompt);

        debug!(model = %self.model, "starting OpenAI completion request");

        let mut request = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .set("Authorization", &format!("Bearer {}", self.api_key));

        if let Some(org) = self.organisation.as_deref().filter(|s| !s.trim().is_empty()) {
            request = request.set("OpenAI-Organization", org);
        }
        if let Some(project) = self.project.as_deref().filter(|s| !s.trim().is_empty()) {
            request = request.set("OpenAI-Project", project);
        }

        match request.send_json(&body) {
            Ok(response) => Ok(CompletionStream::body(
                response.into_reader(),
                Box::new(OpenAIDecoder),
                cancel,
            )),
            Err(ureq::Error::Status(status, response)) => {
                Err(LlmError::from_status("OpenAI", status, response))
            }
            Err(ureq::Error::Transport(transport)) => Err(LlmError::Connect {
                provider: "OpenAI",
                message: transport.to_string(),
            }),
        }
    }
}

impl AiProvider for OpenAIProvider {
    fn stream_completion(
        &self,
        history: &[ChatMessage],
        system_prompt: &str,
        cancel: CancelToken,
    ) -> CompletionStream {
        if !self.is_configured() {
            return CompletionStream::message(LlmError::MissingApiKey("OpenAI").to_string());
        }

        match self.open_stream(history, system_prompt, cancel) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "OpenAI request failed");
                CompletionStream::message(err.to_string())
            }
        }
    }

    fn name(&self) -> &str {
        "OpenAI"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// SSE decoder for `/chat/completions` deltas.
///
/// The only wire format here with an explicit terminal sentinel: `data: [DONE]`.
struct OpenAIDecoder;

impl LineDecoder for OpenAIDecoder {
    fn decode_line(&self, line: &str) -> LineEvent {
        let Some(data) = sse_data(line) else {
            return LineEvent::Skip;
        };

        if data == "[DONE]" {
            return LineEvent::Done;
        }

        let Ok(json) = serde_json::from_str::<serde_json::Value>(data) else {
            return LineEvent::Skip;
        };

        match json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("delta"))
            .and_then(|delta| delta.get("content"))
            .and_then(|content| content.as_str())
        {
            Some(text) if !text.is_empty() => LineEvent::Chunk(text.to_string()),
            _ => LineEvent::Skip,
        }
    }
}
