//! LLM error types
//!
//! These never cross the provider boundary as errors: the consuming surface
//! has a single channel (the chunk stream), so providers render them to text
//! with `Display` and yield them as the stream's only chunk.

use thiserror::Error;

/// Failure modes of a completion call, pre-rendered wording included.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Error: {0} API key not configured. Please set it in Settings.")]
    MissingApiKey(&'static str),

    #[error("Error: Ollama model not configured. Please set it in Settings.")]
    MissingModel,

    #[error("Error connecting to {provider}: {message}")]
    Connect {
        provider: &'static str,
        message: String,
    },

    #[error("Error connecting to Ollama at {base}: {message}. Is Ollama running?")]
    OllamaConnect { base: String, message: String },

    #[error("{provider} API error: {status} - {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },
}

impl LlmError {
    /// Build the API-error variant from a rejected `ureq` response.
    pub(crate) fn from_status(provider: &'static str, status: u16, response: ureq::Response) -> Self {
        let body = response.into_string().unwrap_or_default();
        LlmError::Api {
            provider,
            status,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_api_key_display() {
        let err = LlmError::MissingApiKey("Gemini");
        assert_eq!(
            err.to_string(),
            "Error: Gemini API key not configured. Please set it in Settings."
        );
    }

    #[test]
    fn test_missing_model_display() {
        assert_eq!(
            LlmError::MissingModel.to_string(),
            "Error: Ollama model not configured. Please set it in Settings."
        );
    }

    #[test]
    fn test_connect_display() {
        let err = LlmError::Connect {
            provider: "OpenAI",
            message: "dns failure".to_string(),
        };
        assert_eq!(err.to_string(), "Error connecting to OpenAI: dns failure");
    }

    #[test]
    fn test_ollama_connect_display() {
        let err = LlmError::OllamaConnect {
            base: "http://localhost:11434".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error connecting to Ollama at http://localhost:11434: connection refused. Is Ollama running?"
        );
    }

    #[test]
    fn test_api_display_includes_status_and_body() {
        let err = LlmError::Api {
            provider: "Gemini",
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "Gemini API error: 429 - quota exceeded");
    }
}
