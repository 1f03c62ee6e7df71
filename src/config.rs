//! Application configuration
//!
//! Loaded from a JSON file. Every field has a default, so a missing file or
//! an empty object both yield a working configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Server and content configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Route namespace (default: "custom-endpoint/v1")
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Site home URL used to build permalinks
    #[serde(default = "default_home_url")]
    pub home_url: String,

    /// JSON content document served by the in-memory store
    #[serde(default = "default_content_path")]
    pub content_path: PathBuf,

    /// Whether a custom-field provider is available
    #[serde(default = "default_custom_fields")]
    pub custom_fields: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_namespace() -> String {
    "custom-endpoint/v1".to_string()
}

fn default_home_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_content_path() -> PathBuf {
    PathBuf::from("./content.json")
}

fn default_custom_fields() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            namespace: default_namespace(),
            cors_origins: Vec::new(),
            home_url: default_home_url(),
            content_path: default_content_path(),
            custom_fields: default_custom_fields(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
