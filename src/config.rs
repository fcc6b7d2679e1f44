//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// No timeout when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Where the signed-in user is remembered between runs
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_file")]
    pub file: String,
}

fn default_session_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("portal").join("session.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./portal_session.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("portal").join("config.toml")),
            Some(PathBuf::from("./portal.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("PORTAL_API_URL") {
            self.api.base_url = url;
        }
        if let Some(file) = lookup("PORTAL_SESSION_FILE") {
            self.session.file = file;
        }
        if let Some(level) = lookup("PORTAL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("PORTAL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Portal Configuration
#
# Environment variables override these settings:
# - PORTAL_API_URL
# - PORTAL_SESSION_FILE
# - PORTAL_LOG_LEVEL
# - PORTAL_LOG_FORMAT

[api]
# Base URL of the portal backend
base_url = "http://localhost:5000/api"

# Request timeout in seconds (omit to wait indefinitely)
# request_timeout_secs = 30

[session]
# Where the signed-in user and session cookie are kept
# file = "~/.local/share/portal/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.timeout(), None);
        assert!(config.session.file.ends_with("session.json"));
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_generated_template_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portal.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://portal.uni.edu/api\"\nrequest_timeout_secs = 15\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://portal.uni.edu/api");
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[api\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORTAL_API_URL", "http://10.0.0.5:5000/api"),
            ("PORTAL_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.api.base_url, "http://10.0.0.5:5000/api");
        assert!(config.logging.is_json());
        assert_eq!(config.logging.level, "warn");
    }
}
