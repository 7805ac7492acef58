//! Durable key-value storage for the bearer token.
//!
//! # Design
//! The client owns exactly one piece of durable state: the cached token under
//! [`TOKEN_KEY`]. Storage sits behind [`KeyValueStore`] so the host can plug in
//! whatever it has (a preferences store, a keychain, a file). `MemoryStore` is
//! the test fake; `FileStore` is a JSON file for desktop and CLI use.
//!
//! `get` is infallible: an unreadable backend reads as "no token", which sends
//! the caller back through the token endpoint.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::ApiError;

/// Key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "petfinder_token";

/// Process-wide durable string storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ApiError>;
    fn remove(&self, key: &str) -> Result<(), ApiError>;
}

/// Read the cached token, if any.
pub fn load_token(store: &dyn KeyValueStore) -> Option<String> {
    store.get(TOKEN_KEY)
}

/// Persist a freshly acquired token, replacing any previous one.
pub fn save_token(store: &dyn KeyValueStore, token: &str) -> Result<(), ApiError> {
    store.set(TOKEN_KEY, token)
}

/// Forget the cached token so the next `get_token` hits the network.
pub fn clear_token(store: &dyn KeyValueStore) -> Result<(), ApiError> {
    store.remove(TOKEN_KEY)
}

/// In-memory store backed by a `HashMap` behind a `Mutex`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object in a single file.
///
/// The file is re-read on every access so several processes sharing it see
/// each other's writes. Writes go through a temp file and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Read the whole map. A missing file is empty and a file that is not a
    /// JSON object is discarded; any other read failure is an error.
    fn read_map(&self) -> Result<HashMap<String, String>, ApiError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(ApiError::Storage(format!("{}: {e}", self.path.display()))),
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "token store is not valid JSON, ignoring");
            HashMap::new()
        }))
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<(), ApiError> {
        let storage_err = |e: std::io::Error| ApiError::Storage(format!("{}: {e}", self.path.display()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(storage_err)?;
        }
        let body = serde_json::to_string_pretty(map).map_err(|e| ApiError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body).map_err(storage_err)?;
        fs::rename(&tmp, &self.path).map_err(storage_err)?;
        debug!(path = %self.path.display(), entries = map.len(), "token store written");
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), ApiError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_map()?;
        f(&mut map);
        self.write_map(&map)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_map() {
            Ok(mut map) => map.remove(key),
            Err(e) => {
                warn!(error = %e, "failed to read token store");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.update(|map| {
            map.remove(key);
        })
    }
}
