//! Multi-provider streaming AI completions
//!
//! Normalizes three wire protocols (OpenAI-compatible SSE, Gemini SSE, Ollama
//! NDJSON) into one lazy, cancellable stream of text chunks. Providers never
//! error across this boundary: configuration, transport, and HTTP failures
//! all degrade to a single human-readable chunk, so the consuming surface has
//! exactly one channel to deal with.

mod error;
mod factory;
mod gemini;
mod message;
mod ollama;
mod openai;
mod provider;
mod stream;

pub use error::LlmError;
pub use factory::{create_provider, provider_from_settings};
pub use gemini::GeminiProvider;
pub use message::{ChatMessage, Role};
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use provider::{AiProvider, CancelToken, SharedProvider};
pub use stream::CompletionStream;
