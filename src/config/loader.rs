//! Settings loader with environment variable expansion
//!
//! Loads `settings.json` from the user config directory. Any load failure
//! falls back to defaults so the application always starts; the misread is
//! logged, never fatal.

use super::types::{Settings, GEMINI_SELECTOR, OLLAMA_SELECTOR, OPENAI_SELECTOR};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Settings loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load settings from the default location, falling back to defaults.
///
/// Environment overrides are applied either way, so a missing file with
/// `GEMINI_API_KEY` exported still yields a configured provider.
pub fn load_settings() -> Settings {
    let settings = match default_settings_path() {
        Some(path) if path.exists() => match load_from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load settings, using defaults");
                Settings::default()
            }
        },
        _ => Settings::default(),
    };

    apply_env_overrides(settings)
}

/// Path of `settings.json` in the user config directory.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scribepad").join("settings.json"))
}

/// Load settings from a specific file, expanding `${VAR}` patterns.
pub fn load_from_file(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut settings: Settings = serde_json::from_str(&content)?;
    expand_env_vars(&mut settings);
    Ok(settings)
}

/// Expand ${VAR} patterns in credential and endpoint fields.
fn expand_env_vars(settings: &mut Settings) {
    let env_regex = match Regex::new(r"\$\{([^}]+)\}") {
        Ok(regex) => regex,
        Err(_) => return,
    };

    for provider in settings.providers.values_mut() {
        if let Some(ref api_key) = provider.api_key {
            provider.api_key = Some(expand_string(api_key, &env_regex));
        }
        if let Some(ref api_base) = provider.api_base {
            provider.api_base = Some(expand_string(api_base, &env_regex));
        }
    }
}

/// Expand environment variables in a single string. Unknown variables are
/// left as-is.
fn expand_string(s: &str, regex: &Regex) -> String {
    regex
        .replace_all(s, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
}

/// Apply direct environment variable overrides:
/// - GEMINI_API_KEY / GOOGLE_API_KEY -> Gemini api_key
/// - OPENAI_API_KEY -> OpenAI api_key
/// - OLLAMA_BASE_URL -> Ollama api_base
fn apply_env_overrides(mut settings: Settings) -> Settings {
    for env_var in ["GEMINI_API_KEY", "GOOGLE_API_KEY"] {
        if let Ok(key) = std::env::var(env_var) {
            if !key.is_empty() {
                settings
                    .providers
                    .entry(GEMINI_SELECTOR.to_string())
                    .or_default()
                    .api_key = Some(key);
                break;
            }
        }
    }

    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            settings
                .providers
                .entry(OPENAI_SELECTOR.to_string())
                .or_default()
                .api_key = Some(key);
        }
    }

    if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
        if !url.is_empty() {
            settings
                .providers
                .entry(OLLAMA_SELECTOR.to_string())
                .or_default()
                .api_base = Some(url);
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"provider": "Ollama (For Experts)", "providers": {{"Ollama (For Experts)": {{"model_name": "mistral"}}}}}}"#
        )
        .unwrap();

        let settings = load_from_file(&path).unwrap();
        assert_eq!(settings.provider, OLLAMA_SELECTOR);
        assert_eq!(
            settings.providers[OLLAMA_SELECTOR].model_name.as_deref(),
            Some("mistral")
        );
    }

    #[test]
    fn test_load_from_file_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_expand_env_var() {
        let regex = Regex::new(r"\$\{([^}]+)\}").unwrap();
        std::env::set_var("SCRIBEPAD_TEST_VAR", "secret");
        let result = expand_string("prefix_${SCRIBEPAD_TEST_VAR}_suffix", &regex);
        assert_eq!(result, "prefix_secret_suffix");
        std::env::remove_var("SCRIBEPAD_TEST_VAR");
    }

    #[test]
    fn test_missing_env_var_left_as_is() {
        let regex = Regex::new(r"\$\{([^}]+)\}").unwrap();
        let result = expand_string("${SCRIBEPAD_NONEXISTENT_VAR}", &regex);
        assert_eq!(result, "${SCRIBEPAD_NONEXISTENT_VAR}");
    }

    #[test]
    fn test_file_expansion_applies_to_api_key() {
        std::env::set_var("SCRIBEPAD_TEST_KEY", "k-123");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"providers": {"Gemini (Recommended)": {"api_key": "${SCRIBEPAD_TEST_KEY}"}}}"#,
        )
        .unwrap();

        let settings = load_from_file(&path).unwrap();
        assert_eq!(
            settings.providers[GEMINI_SELECTOR].api_key.as_deref(),
            Some("k-123")
        );
        std::env::remove_var("SCRIBEPAD_TEST_KEY");
    }
}
