//! DocAsk configuration system.
//!
//! Loaded once at startup from `~/.docask/config.toml` (or a path given on the
//! command line), with the inference token overridable from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DocaskError, Result};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocaskConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for DocaskConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            inference: InferenceConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl DocaskConfig {
    /// Load config from the default path (~/.docask/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DocaskError::Config(format!("Failed to read config: {e}")))?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| DocaskError::Config(format!("Failed to parse config: {e}")))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment wins over the config file for the credential.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("HUGGINGFACEHUB_TOKEN") {
            if !token.is_empty() {
                self.inference.api_token = token;
            }
        }
        if let Ok(path) = std::env::var("DOCASK_DB_PATH") {
            if !path.is_empty() {
                self.storage.db_path = path;
            }
        }
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the DocAsk home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".docask")
    }

    /// Storage path with tilde expansion applied.
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.storage.db_path).to_string())
    }
}

/// HTTP server bind configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// Document store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String { "~/.docask/documents.db".into() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self { db_path: default_db_path() }
    }
}

/// Hosted inference API (extractive question answering).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_api_url() -> String {
    "https://api-inference.huggingface.co/models/distilbert-base-uncased-distilled-squad".into()
}
fn default_timeout_secs() -> u64 { 30 }
fn default_chunk_size() -> usize { 1000 }

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: String::new(),
            timeout_secs: default_timeout_secs(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// Fixed-window rate limiting, keyed by client IP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_max_requests() -> u32 { 5 }
fn default_window_secs() -> u64 { 60 }

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DocaskConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.inference.chunk_size, 1000);
        assert!(config.inference.api_url.contains("distilbert"));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [server]
            host = "0.0.0.0"
            port = 9001

            [rate_limit]
            max_requests = 10
        "#;

        let config: DocaskConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.rate_limit.max_requests, 10);
        // Unspecified sections keep their defaults
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.inference.timeout_secs, 30);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let toml_str = "";
        let config: DocaskConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.db_path, "~/.docask/documents.db");
    }

    #[test]
    fn test_home_dir() {
        let home = DocaskConfig::home_dir();
        assert!(home.to_string_lossy().contains("docask"));
    }
}
