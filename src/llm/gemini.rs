//! Gemini (Google AI) provider
//!
//! Streams from the `:streamGenerateContent` SSE endpoint. Unlike the OpenAI
//! protocol there is no terminal sentinel; the stream ends when the body
//! closes.

use super::error::LlmError;
use super::stream::{sse_data, LineDecoder, LineEvent};
use super::{AiProvider, CancelToken, ChatMessage, CompletionStream, Role};
use tracing::{debug, warn};

pub(crate) const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub(crate) const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Provider for Google's Gemini API.
pub struct GeminiProvider {
    /// API key, sent as a query parameter
    api_key: String,

    /// Base URL for the API
    api_base: String,

    /// Model identifier
    model: String,

    agent: ureq::Agent,
}

impl GeminiProvider {
    /// Create a new provider. A blank `model` falls back to `gemini-2.0-flash`.
    pub fn new(api_key: &str, model: &str) -> Self {
        let model = if model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            model.to_string()
        };

        Self {
            api_key: api_key.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            model,
            agent: ureq::agent(),
        }
    }

    /// Override the base URL (tests, regional endpoints).
    pub fn with_api_base(mut self, url: &str) -> Self {
        self.api_base = url.trim_end_matches('/').to_string();
        self
    }

    /// Get the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, history: &[ChatMessage], system_prompt: &str) -> serde_json::Value {
        // Gemini has no system role in `contents`; assistant maps to "model",
        // everything else to "user".
        let contents: Vec<serde_json::Value> = history
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::Assistant => "model",
                    _ => "user",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": msg.content }]
                })
            })
            .collect();

        serde_json::json!({
            "contents": contents,
            "systemInstruction": {
                "parts": [{ "text": system_prompt }]
            },
            "generationConfig": {
                "temperature": 0.7,
                "maxOutputTokens": 8192
            }
        })
    }

    fn open_stream(
        &self,
        history: &[ChatMessage],
        system_prompt: &str,
        cancel: CancelToken,
    ) -> Result<CompletionStream, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?key={}&alt=sse",
            self.api_base, self.model, self.api_key
        );
        let body = self.request_body(history, system_prompt);

        debug!(model = %self.model, "starting Gemini completion request");

        match self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(&body)
        {
            Ok(response) => Ok(CompletionStream::body(
                response.into_reader(),
                Box::new(GeminiDecoder),
                cancel,
            )),
            Err(ureq::Error::Status(status, response)) => {
                Err(LlmError::from_status("Gemini", status, response))
            }
            Err(ureq::Error::Transport(transport)) => Err(LlmError::Connect {
                provider: "Gemini",
                message: transport.to_string(),
            }),
        }
    }
}

impl AiProvider for GeminiProvider {
    fn stream_completion(
        &self,
        history: &[ChatMessage],
        system_prompt: &str,
        cancel: CancelToken,
    ) -> CompletionStream {
        if !self.is_configured() {
            return CompletionStream::message(LlmError::MissingApiKey("Gemini").to_string());
        }

        match self.open_stream(history, system_prompt, cancel) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "Gemini request failed");
                CompletionStream::message(err.to_string())
            }
        }
    }

    fn name(&self) -> &str {
        "Gemini"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// SSE decoder for `streamGenerateContent` responses. No terminal sentinel.
struct GeminiDecoder;

impl LineDecoder for GeminiDecoder {
    fn decode_line(&self, line: &str) -> LineEvent {
        let Some(data) = sse_data(line) else {
            return LineEvent::Skip;
        };

        let Ok(json) = serde_json::from_str::<serde_json::Value>(data) else {
            return LineEvent::Skip;
        };

        match json
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.get(0))
            .and_then(|part| part.get("text"))
            .and_then(|text| text.as_str())
        {
            Some(text) if !text.is_empty() => LineEvent::Chunk(text.to_string()),
            _ => LineEvent::Skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn decode_all(transcript: &str) -> Vec<String> {
        CompletionStream::body(
            Box::new(Cursor::new(transcript.as_bytes().to_vec())),
            Box::new(GeminiDecoder),
            CancelToken::new(),
        )
        .collect()
    }

    fn chunk_line(text: &str) -> String {
        format!(
            "data: {{\"candidates\":[{{\"content\":{{\"parts\":[{{\"text\":\"{}\"}}]}}}}]}}\n",
            text
        )
    }

    #[test]
    fn test_unconfigured_yields_single_error_chunk() {
        let provider = GeminiProvider::new("", "gemini-2.0-flash");
        assert!(!provider.is_configured());

        let mut stream =
            provider.stream_completion(&[ChatMessage::user("hi")], "", CancelToken::new());
        assert_eq!(
            stream.next(),
            Some("Error: Gemini API key not configured. Please set it in Settings.".to_string())
        );
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn test_blank_model_falls_back_to_default() {
        let provider = GeminiProvider::new("key", "  ");
        assert_eq!(provider.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_request_body_maps_roles() {
        let provider = GeminiProvider::new("key", "");
        let history = [
            ChatMessage::user("draft an email"),
            ChatMessage::assistant("Sure."),
            ChatMessage::system("stray system message"),
        ];
        let body = provider.request_body(&history, "Be concise.");

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        // system messages in history map to "user"; the real system prompt
        // travels in systemInstruction
        assert_eq!(contents[2]["role"], "user");

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be concise.");
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn test_decoder_extracts_candidate_text() {
        let transcript = format!("{}{}", chunk_line("Hel"), chunk_line("lo"));
        let chunks = decode_all(&transcript);
        assert_eq!(chunks.concat(), "Hello");
    }

    #[test]
    fn test_decoder_ends_at_body_close_without_sentinel() {
        let transcript = format!("{}{}", chunk_line("a"), chunk_line("b"));
        let mut stream = CompletionStream::body(
            Box::new(Cursor::new(transcript.into_bytes())),
            Box::new(GeminiDecoder),
            CancelToken::new(),
        );
        assert_eq!(stream.next(), Some("a".to_string()));
        assert_eq!(stream.next(), Some("b".to_string()));
        // no sentinel; end-of-input terminates cleanly with no error chunk
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn test_decoder_skips_malformed_and_fieldless_lines() {
        let transcript = format!(
            "{}data: {{\"candidates\":[]}}\ndata: junk\n{}",
            chunk_line("x"),
            chunk_line("y")
        );
        assert_eq!(decode_all(&transcript), vec!["x", "y"]);
    }
}
