//! Runtime configuration, loaded from a JSON file.
//!
//! A missing or unparsable file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "decolagem.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Delivery policy for outbound writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts per write before it is dropped.
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_backoff_ms: 250,
            max_backoff_ms: 8_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`, capped.
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let shift = attempt.saturating_sub(1).min(32);
        self.base_backoff_ms
            .saturating_mul(1u64 << shift)
            .min(self.max_backoff_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend user the game data belongs to.
    pub user_id: String,
    pub game_number: u32,
    pub team: String,
    /// Origin for a team without saved game data.
    pub origin: String,
    /// Where `JsonFileStore` keeps its records.
    pub data_dir: PathBuf,
    pub seed: u64,
    pub time_scale: f64,
    /// Wall-clock seconds the headless runner plays for.
    pub run_secs: u64,
    /// Default `env_logger` filter; `RUST_LOG` overrides it.
    pub log_filter: String,
    pub retry: RetryPolicy,
    /// Let the runner plan, launch, answer challenges and depart on its own.
    pub autopilot: Option<Autopilot>,
}

/// Scripted crew for the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Autopilot {
    pub ship: decolagem_core::enums::ShipType,
    /// Destinations after the origin, in order.
    pub route: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            game_number: 1,
            team: "Equipe 1".to_string(),
            origin: "Terra".to_string(),
            data_dir: PathBuf::from("decolagem-data"),
            seed: 42,
            time_scale: 1.0,
            run_secs: 60,
            log_filter: "info".to_string(),
            retry: RetryPolicy::default(),
            autopilot: None,
        }
    }
}

impl AppConfig {
    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path`, falling back to defaults when it is missing or invalid.
    /// The error is handed back so it can be reported once logging is up.
    pub fn load(path: &Path) -> (Self, Option<ConfigError>) {
        match Self::from_file(path) {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }
}

impl ConfigError {
    /// The file simply isn't there.
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let retry = RetryPolicy {
            max_attempts: 10,
            base_backoff_ms: 100,
            max_backoff_ms: 1_000,
        };
        assert_eq!(retry.backoff_ms(1), 100);
        assert_eq!(retry.backoff_ms(2), 200);
        assert_eq!(retry.backoff_ms(4), 800);
        assert_eq!(retry.backoff_ms(5), 1_000);
        assert_eq!(retry.backoff_ms(60), 1_000);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "team": "Orion", "retry": { "max_attempts": 2 } }"#).unwrap();
        assert_eq!(config.team, "Orion");
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.base_backoff_ms, 250);
        assert_eq!(config.seed, 42);
        assert!(config.autopilot.is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("decolagem_test_config_missing.json");
        let _ = fs::remove_file(&path);
        let (config, err) = AppConfig::load(&path);
        assert_eq!(config, AppConfig::default());
        assert!(err.unwrap().is_missing());
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let path = std::env::temp_dir().join("decolagem_test_config_invalid.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Json { .. })
        ));
        let (config, err) = AppConfig::load(&path);
        assert_eq!(config, AppConfig::default());
        assert!(!err.unwrap().is_missing());
        let _ = fs::remove_file(&path);
    }
}
