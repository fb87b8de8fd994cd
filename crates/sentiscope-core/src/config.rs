//! Process configuration
//!
//! Configuration is read once at startup into an [`AppConfig`] and passed to
//! each component, instead of consulting the process environment at arbitrary
//! points. An optional local settings file can override the recognized keys.

use crate::Result;
use std::path::Path;

/// Settings file consulted by default. Optional; absence activates defaults.
pub const DEFAULT_SETTINGS_FILE: &str = ".env.local";

/// Application name override key.
pub const APP_NAME_VAR: &str = "SENTIMENT_APP_NAME";

/// Maximum-concurrent-requests override key.
pub const MAX_CONCURRENT_VAR: &str = "MAX_CONCURRENT_REQUESTS";

/// Pretrained model identifier override key.
pub const MODEL_ID_VAR: &str = "SENTIMENT_MODEL_ID";

pub const DEFAULT_APP_NAME: &str = "sentiment-analyzer";
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: u32 = 10;
pub const DEFAULT_MODEL_ID: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";

/// Process-wide configuration, constructed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Application name reported by the health endpoint and used for
    /// deployment descriptors
    pub app_name: String,

    /// Concurrency limit attached to the analysis function
    pub max_concurrent_requests: u32,

    /// Pretrained model identifier for the classification pipeline
    pub model_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            model_id: DEFAULT_MODEL_ID.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration, applying key=value overrides from the optional
    /// settings file at `path` before reading the recognized keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        apply_env_file(path.as_ref())?;
        Ok(Self::from_env())
    }

    /// Read the recognized keys from the process environment, falling back
    /// to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let app_name =
            std::env::var(APP_NAME_VAR).unwrap_or_else(|_| DEFAULT_APP_NAME.to_string());

        let max_concurrent_requests = std::env::var(MAX_CONCURRENT_VAR)
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    tracing::warn!(value = %raw, "ignoring unparseable {MAX_CONCURRENT_VAR}");
                    None
                }
            })
            .unwrap_or(DEFAULT_MAX_CONCURRENT_REQUESTS);

        let model_id =
            std::env::var(MODEL_ID_VAR).unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());

        Self {
            app_name,
            max_concurrent_requests,
            model_id,
        }
    }
}

/// Apply `KEY=value` lines from an optional settings file to the process
/// environment.
///
/// Returns `Ok(true)` if the file existed and was applied, `Ok(false)` if it
/// was absent. Blank lines and `#` comments are allowed; lines without a `=`
/// are skipped with a warning.
pub fn apply_env_file(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    let content = std::fs::read_to_string(path)?;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => std::env::set_var(key.trim(), value.trim()),
            None => tracing::warn!(line, "skipping malformed settings line"),
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.app_name, "sentiment-analyzer");
        assert_eq!(config.max_concurrent_requests, 10);
        assert_eq!(
            config.model_id,
            "cardiffnlp/twitter-roberta-base-sentiment-latest"
        );
    }

    #[test]
    fn test_missing_settings_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let applied = apply_env_file(&dir.path().join("no-such-file")).unwrap();
        assert!(!applied);
    }

    #[test]
    fn test_env_file_overrides_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# local overrides").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "SENTISCOPE_TEST_OVERRIDE_KEY = overridden").unwrap();
        writeln!(file, "not a key value line").unwrap();

        let applied = apply_env_file(&path).unwrap();
        assert!(applied);
        assert_eq!(
            std::env::var("SENTISCOPE_TEST_OVERRIDE_KEY").unwrap(),
            "overridden"
        );
    }
}
