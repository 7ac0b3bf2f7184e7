//! Scribepad - desktop writing assistant core
//!
//! The engine behind the chat surface:
//! - Multi-provider streaming AI completions (Gemini, OpenAI-compatible, Ollama)
//! - One uniform, cancellable, pull-based chunk stream across three wire protocols
//! - Bounded per-session conversation history
//! - Settings loading shared with the desktop shell
//!
//! Window management, hotkeys, clipboard, and rendering live in the shell,
//! not here.

pub mod config;
pub mod conversation;
pub mod llm;

// Re-export commonly used types
pub use conversation::ConversationManager;
pub use llm::{AiProvider, CancelToken, ChatMessage, CompletionStream, Role, SharedProvider};
