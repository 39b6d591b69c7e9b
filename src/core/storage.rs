//! Key-value persistence with retry-on-write.
//!
//! The engine treats storage as unreliable: writes are retried a fixed number
//! of times and then dropped with a warning, and reads that fail or decode
//! badly are reported as absent so callers fall back to defaults. In-memory
//! state stays authoritative for the process lifetime either way.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StoreError;

/// Total write attempts before a payload is dropped.
const WRITE_ATTEMPTS: u32 = 3;

/// Raw key-value storage. Implementations may fail transiently.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Best-effort JSON adapter over a raw store.
pub struct RetryingStore {
    inner: Arc<dyn KeyValueStore>,
}

impl RetryingStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Read and decode a value. Store failures and undecodable payloads are
    /// both reported as absent.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.inner.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("read of '{}' failed: {}", key, err);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("discarding corrupt payload for '{}': {}", key, err);
                None
            }
        }
    }

    /// Encode and write a value, retrying with the same payload up to
    /// `WRITE_ATTEMPTS` times, then giving up silently.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::error!("failed to encode '{}': {}", key, err);
                return;
            }
        };
        for attempt in 1..=WRITE_ATTEMPTS {
            match self.inner.set(key, bytes.clone()).await {
                Ok(()) => return,
                Err(err) if attempt < WRITE_ATTEMPTS => {
                    log::warn!("write of '{}' failed (attempt {}): {}", key, attempt, err);
                }
                Err(err) => {
                    log::warn!(
                        "write of '{}' dropped after {} attempts: {}",
                        key,
                        WRITE_ATTEMPTS,
                        err
                    );
                }
            }
        }
    }

    /// Best-effort delete.
    pub async fn remove(&self, key: &str) {
        if let Err(err) = self.inner.remove(key).await {
            log::warn!("remove of '{}' failed: {}", key, err);
        }
    }
}

/// Stores each key as a JSON file in a data directory.
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// # Arguments
    /// * `data_dir` - The app data directory; created on first write.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys are logical names like "safe_zone_event_history"; keep only
        // filename-safe characters in case an embedder passes something else.
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.data_dir.join(format!("{}.json", safe))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(&path)?))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)?;
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and embedders without durable storage.
///
/// Writes can be scripted to fail via `fail_next_sets`, and every `set`
/// attempt is counted, which is how the retry budget is observed in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    failing_sets: AtomicU32,
    set_attempts: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` calls to `set` return an error.
    pub fn fail_next_sets(&self, count: u32) {
        self.failing_sets.store(count, Ordering::SeqCst);
    }

    /// Number of `set` calls seen so far, including failed ones.
    pub fn set_attempts(&self) -> u32 {
        self.set_attempts.load(Ordering::SeqCst)
    }

    /// Raw payload currently stored under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Seed a payload directly, bypassing the trait.
    pub fn put_raw(&self, key: &str, value: Vec<u8>) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.set_attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failing_sets.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_sets.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("scripted failure".to_string()));
        }
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
