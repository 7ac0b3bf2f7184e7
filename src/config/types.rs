//! Settings types
//!
//! Mirrors the `settings.json` schema shared with the desktop shell. This
//! subsystem treats settings as read-only input; the settings UI owns writes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Selector value for the Gemini provider (the default).
pub const GEMINI_SELECTOR: &str = "Gemini (Recommended)";

/// Selector value for OpenAI-compatible APIs.
pub const OPENAI_SELECTOR: &str = "OpenAI Compatible (For Experts)";

/// Selector value for local Ollama.
pub const OLLAMA_SELECTOR: &str = "Ollama (For Experts)";

/// Root settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Active provider selector
    #[serde(default = "default_selector")]
    pub provider: String,

    /// Per-provider connection parameters, keyed by selector
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: default_selector(),
            providers: default_providers(),
        }
    }
}

fn default_selector() -> String {
    GEMINI_SELECTOR.to_string()
}

fn default_providers() -> HashMap<String, ProviderSettings> {
    let mut providers = HashMap::new();
    providers.insert(GEMINI_SELECTOR.to_string(), ProviderSettings::default());
    providers.insert(OPENAI_SELECTOR.to_string(), ProviderSettings::default());
    providers.insert(OLLAMA_SELECTOR.to_string(), ProviderSettings::default());
    providers
}

/// Connection parameters for one provider.
///
/// Every field is optional; providers substitute documented defaults for
/// missing or blank values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// API key (supports ${ENV_VAR} syntax)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL for the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// `OpenAI-Organization` header value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_organisation: Option<String>,

    /// `OpenAI-Project` header value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_project: Option<String>,

    /// Ollama keep-alive, in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

impl Settings {
    /// Get the settings block for a provider selector, if present.
    pub fn provider_settings(&self, selector: &str) -> Option<&ProviderSettings> {
        self.providers.get(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings_select_gemini() {
        let settings = Settings::default();
        assert_eq!(settings.provider, GEMINI_SELECTOR);
        assert!(settings.providers.contains_key(GEMINI_SELECTOR));
        assert!(settings.providers.contains_key(OPENAI_SELECTOR));
        assert!(settings.providers.contains_key(OLLAMA_SELECTOR));
    }

    #[test]
    fn test_settings_json_field_names() {
        let json = r#"{
            "provider": "Ollama (For Experts)",
            "providers": {
                "Ollama (For Experts)": {
                    "api_base": "http://127.0.0.1:11434",
                    "model_name": "llama3.1:8b",
                    "keep_alive": "30"
                }
            }
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.provider, OLLAMA_SELECTOR);

        let ollama = settings.provider_settings(OLLAMA_SELECTOR).unwrap();
        assert_eq!(ollama.api_base.as_deref(), Some("http://127.0.0.1:11434"));
        assert_eq!(ollama.model_name.as_deref(), Some("llama3.1:8b"));
        assert_eq!(ollama.keep_alive.as_deref(), Some("30"));
        assert_eq!(ollama.api_key, None);
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        // the desktop shell stores its own keys (theme, shortcut, ...) in the
        // same file
        let json = r#"{"provider": "Gemini (Recommended)", "theme": "mica", "shortcut": "ctrl+space"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.provider, GEMINI_SELECTOR);
    }
}
