//! Provider construction from settings
//!
//! Maps a selector string plus per-provider settings to a constructed
//! provider. Missing or blank fields are replaced by each provider's
//! documented defaults; an unrecognized selector deliberately falls back to
//! Gemini rather than failing.

use super::{GeminiProvider, OllamaProvider, OpenAIProvider, SharedProvider};
use crate::config::{
    ProviderSettings, Settings, GEMINI_SELECTOR, OLLAMA_SELECTOR, OPENAI_SELECTOR,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Create a provider for the selector, using the matching settings block.
pub fn create_provider(
    selector: &str,
    providers: &HashMap<String, ProviderSettings>,
) -> SharedProvider {
    debug!(selector, "creating provider");
    match selector {
        OPENAI_SELECTOR => openai_provider(providers.get(OPENAI_SELECTOR)),
        OLLAMA_SELECTOR => ollama_provider(providers.get(OLLAMA_SELECTOR)),
        // Gemini, and the documented fallback for unrecognized selectors
        _ => gemini_provider(providers.get(GEMINI_SELECTOR)),
    }
}

/// Create a provider from a full settings value.
pub fn provider_from_settings(settings: &Settings) -> SharedProvider {
    create_provider(&settings.provider, &settings.providers)
}

fn str_or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn gemini_provider(settings: Option<&ProviderSettings>) -> SharedProvider {
    let empty = ProviderSettings::default();
    let settings = settings.unwrap_or(&empty);
    Arc::new(GeminiProvider::new(
        str_or_empty(&settings.api_key),
        str_or_empty(&settings.model_name),
    ))
}

fn openai_provider(settings: Option<&ProviderSettings>) -> SharedProvider {
    let empty = ProviderSettings::default();
    let settings = settings.unwrap_or(&empty);
    Arc::new(OpenAIProvider::new(
        str_or_empty(&settings.api_key),
        str_or_empty(&settings.api_base),
        str_or_empty(&settings.model_name),
        settings.api_organisation.clone(),
        settings.api_project.clone(),
    ))
}

fn ollama_provider(settings: Option<&ProviderSettings>) -> SharedProvider {
    let empty = ProviderSettings::default();
    let settings = settings.unwrap_or(&empty);
    // the model is what makes Ollama "configured"; the factory fills in the
    // documented default when settings leave it out
    let model = settings
        .model_name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(super::ollama::DEFAULT_MODEL);
    Arc::new(OllamaProvider::new(
        str_or_empty(&settings.api_base),
        model,
        str_or_empty(&settings.keep_alive),
    ))
}
