//! Application settings
//!
//! Types and loading for the `settings.json` shared with the desktop shell.

mod loader;
mod types;

pub use loader::{default_settings_path, load_from_file, load_settings, ConfigError};
pub use types::{
    ProviderSettings, Settings, GEMINI_SELECTOR, OLLAMA_SELECTOR, OPENAI_SELECTOR,
};
