//! AI provider trait and cancellation token

use super::{ChatMessage, CompletionStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation signal for an in-flight completion stream.
///
/// Cloning shares the underlying flag. The stream checks the flag immediately
/// before each network read, so chunks decoded before `cancel()` is called are
/// still delivered; only future reads are suppressed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// AI provider trait
///
/// Defines the interface for streaming chat providers (Gemini, OpenAI-compatible,
/// Ollama). Implementations never panic and never return errors across this
/// boundary: every failure mode is pre-rendered into the chunk stream as
/// human-readable text.
pub trait AiProvider: Send + Sync {
    /// Open a fresh network stream and return a lazy sequence of text chunks.
    ///
    /// Concatenating the chunks in yield order reconstructs the full response.
    /// The returned stream is finite, single-consumer, and not restartable.
    ///
    /// Failure behavior:
    /// - not configured: one configuration-error chunk, no network request
    /// - transport failure: one descriptive error chunk
    /// - non-success HTTP status: one chunk with status and response body
    ///
    /// Exactly one outstanding call per conversation at a time; overlapping
    /// calls on the same instance are outside the contract.
    fn stream_completion(
        &self,
        history: &[ChatMessage],
        system_prompt: &str,
        cancel: CancelToken,
    ) -> CompletionStream;

    /// Get the provider's display name.
    fn name(&self) -> &str;

    /// Check whether the provider has the settings it needs to make a call.
    ///
    /// Pure predicate: a non-empty API key for the cloud providers, a
    /// non-empty model name for Ollama.
    fn is_configured(&self) -> bool;
}

/// Wrapper to make Box<dyn AiProvider> cloneable via Arc
pub type SharedProvider = Arc<dyn AiProvider>;
