//! Client configuration.
//!
//! Values come from an optional TOML file, then `PETFINDER_*` environment
//! variables override whatever the file set. Credentials are optional here
//! because listing calls only need a cached token.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::client::DEFAULT_BASE_URL;
use crate::types::{AnimalQuery, Credentials};

pub const ENV_BASE_URL: &str = "PETFINDER_BASE_URL";
pub const ENV_CLIENT_ID: &str = "PETFINDER_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "PETFINDER_CLIENT_SECRET";
pub const ENV_TOKEN_PATH: &str = "PETFINDER_TOKEN_PATH";
pub const ENV_ANIMAL_SIZE: &str = "PETFINDER_ANIMAL_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "PETFINDER_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("missing client credentials (set PETFINDER_CLIENT_ID and PETFINDER_CLIENT_SECRET)")]
    MissingCredentials,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_token_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".petfinder").join("store.json"),
        None => PathBuf::from("petfinder_store.json"),
    }
}

fn default_animal_size() -> Option<String> {
    Some("large".to_string())
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Location of the `FileStore` holding the cached token.
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
    /// Size filter for the listings query. `None` lists every size.
    #[serde(default = "default_animal_size")]
    pub animal_size: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: None,
            client_secret: None,
            token_path: default_token_path(),
            animal_size: default_animal_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// File (if given) overlaid with the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`, which is `std::env::var` outside tests.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = lookup(ENV_BASE_URL) {
            self.base_url = v;
        }
        if let Some(v) = lookup(ENV_CLIENT_ID) {
            self.client_id = Some(v);
        }
        if let Some(v) = lookup(ENV_CLIENT_SECRET) {
            self.client_secret = Some(v);
        }
        if let Some(v) = lookup(ENV_TOKEN_PATH) {
            self.token_path = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_ANIMAL_SIZE) {
            self.animal_size = if v.is_empty() { None } else { Some(v) };
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: v,
            })?;
        }
        Ok(self)
    }

    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Ok(Credentials::new(id.clone(), secret.clone()))
            }
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    pub fn animal_query(&self) -> AnimalQuery {
        AnimalQuery {
            size: self.animal_size.clone(),
            animal_type: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
