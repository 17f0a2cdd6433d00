//! services/diary/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub reflect_url: String,
    pub manga_url: String,
    pub data_dir: PathBuf,
    pub log_level: Level,
    pub request_timeout: Option<Duration>,
    pub use_stubs: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Backend Endpoints ---
        let base_url = lookup("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/');
        let reflect_url =
            lookup("REFLECT_URL").unwrap_or_else(|| format!("{}/api/reflect", base_url));
        let manga_url = lookup("MANGA_URL").unwrap_or_else(|| format!("{}/api/manga", base_url));

        // --- Local Storage ---
        let data_dir = match lookup("DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        // --- Logging and Behaviour ---
        let log_level = parse_log_level(&lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string()))?;
        let request_timeout = lookup("REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_timeout(&raw))
            .transpose()?;
        let use_stubs = lookup("USE_MODEL_STUBS")
            .map(|raw| parse_bool("USE_MODEL_STUBS", &raw))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            reflect_url,
            manga_url,
            data_dir,
            log_level,
            request_timeout,
            use_stubs,
        })
    }
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join("manga-diary"))
        .ok_or_else(|| ConfigError::MissingVar("DATA_DIR".to_string()))
}

fn parse_log_level(raw: &str) -> Result<Level, ConfigError> {
    raw.parse::<Level>().map_err(|_| {
        ConfigError::InvalidValue(
            "RUST_LOG".to_string(),
            format!("'{}' is not a valid log level", raw),
        )
    })
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue(
            "REQUEST_TIMEOUT_SECS".to_string(),
            format!("'{}' is not a positive number of seconds", raw),
        )),
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue(
            name.to_string(),
            format!("'{}' is not a boolean", raw),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let config = config_from(&[("DATA_DIR", "/tmp/diary")]).unwrap();
        assert_eq!(config.reflect_url, "http://localhost:5000/api/reflect");
        assert_eq!(config.manga_url, "http://localhost:5000/api/manga");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/diary"));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.request_timeout, None);
        assert!(!config.use_stubs);
    }

    #[test]
    fn base_url_and_explicit_urls() {
        let config = config_from(&[
            ("DATA_DIR", "/tmp/diary"),
            ("API_BASE_URL", "https://diary.example/"),
            ("MANGA_URL", "https://images.example/draw"),
        ])
        .unwrap();
        assert_eq!(config.reflect_url, "https://diary.example/api/reflect");
        assert_eq!(config.manga_url, "https://images.example/draw");
    }

    #[test]
    fn timeout_and_stub_flags_are_parsed() {
        let config = config_from(&[
            ("DATA_DIR", "/tmp/diary"),
            ("REQUEST_TIMEOUT_SECS", "30"),
            ("USE_MODEL_STUBS", "TRUE"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert!(config.use_stubs);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            config_from(&[("DATA_DIR", "/tmp"), ("REQUEST_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidValue(name, _)) if name == "REQUEST_TIMEOUT_SECS"
        ));
        assert!(matches!(
            config_from(&[("DATA_DIR", "/tmp"), ("USE_MODEL_STUBS", "maybe")]),
            Err(ConfigError::InvalidValue(name, _)) if name == "USE_MODEL_STUBS"
        ));
        assert!(matches!(
            config_from(&[("DATA_DIR", "/tmp"), ("RUST_LOG", "loud")]),
            Err(ConfigError::InvalidValue(name, _)) if name == "RUST_LOG"
        ));
    }
}
