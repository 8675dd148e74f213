//! Application settings.
//!
//! Settings come from an optional TOML file, then environment overrides,
//! then command-line flags (applied by the binary). Every field has a
//! default so an empty file, or no file, is valid.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Secret code that unlocks the tutor dashboard.
    pub tutor_secret: String,
    /// Directory holding the live test.
    pub store_dir: PathBuf,
    /// Time limit pre-filled on the dashboard, in minutes.
    pub default_time_limit: u32,
    pub ai: AiSettings,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub default_topic: String,
    pub default_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tutor_secret: "tutor".to_string(),
            store_dir: PathBuf::from(".questionnaire"),
            default_time_limit: 30,
            ai: AiSettings::default(),
        }
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
            default_topic: "General Knowledge".to_string(),
            default_count: 5,
        }
    }
}

impl Settings {
    /// Load from `path` (if any) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|name| std::env::var(name).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(secret) = var("QUESTIONNAIRE_SECRET") {
            self.tutor_secret = secret;
        }
        if let Some(dir) = var("QUESTIONNAIRE_STORE_DIR") {
            self.store_dir = PathBuf::from(dir);
        }
        if let Some(url) = var("OPENAI_BASE_URL") {
            self.ai.base_url = url;
        }
        if let Some(model) = var("OPENAI_MODEL") {
            self.ai.model = model;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.tutor_secret, "tutor");
        assert_eq!(settings.default_time_limit, 30);
        assert_eq!(settings.ai.default_topic, "General Knowledge");
        assert_eq!(settings.ai.default_count, 5);
    }

    #[test]
    fn test_partial_toml() {
        let settings = Settings::from_toml(
            r#"
            tutor_secret = "open sesame"
            default_time_limit = 45

            [ai]
            model = "gpt-4o"
            "#,
        )
        .unwrap();

        assert_eq!(settings.tutor_secret, "open sesame");
        assert_eq!(settings.default_time_limit, 45);
        assert_eq!(settings.ai.model, "gpt-4o");
        assert_eq!(settings.ai.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("QUESTIONNAIRE_SECRET", "s3cret"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.tutor_secret, "s3cret");
        assert_eq!(settings.ai.base_url, "http://localhost:8080/v1");
        assert_eq!(settings.ai.model, "gpt-4o-mini");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Settings::from_toml("default_time_limit = \"soon\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = Settings::load(Some(Path::new("/no/such/questionnaire.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
