//! Key-Value Storage Abstraction
//!
//! Provides the platform-agnostic contract for durable, process-wide key-value
//! storage, plus typed helpers for JSON and plain-string values.
//!
//! Every entry records the kind of value it holds next to its raw text. Typed
//! reads check that kind before decoding, so a caller that expects structured
//! data never receives an unparsed string by accident.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;

use crate::error::{BridgeError, Result};

/// Kind tag stored alongside every value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Plain UTF-8 text, stored verbatim
    String,
    /// A JSON document produced by `serde_json`
    Json,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Json => "json",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "string" => Some(ValueKind::String),
            "json" => Some(ValueKind::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw value as persisted by a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    pub kind: ValueKind,
    pub raw: String,
}

impl StoredValue {
    pub fn string(raw: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::String,
            raw: raw.into(),
        }
    }

    pub fn json(raw: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Json,
            raw: raw.into(),
        }
    }
}

/// A single key with its stored value, as returned by [`KeyValueStore::entries`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub key: String,
    pub value: StoredValue,
}

/// Durable key-value storage trait
///
/// Abstracts platform-specific persistent storage:
/// - iOS: UserDefaults
/// - Android: SharedPreferences / DataStore
/// - Desktop: SQLite-backed table
/// - Web: localStorage / IndexedDB
///
/// Implementations only move raw text around. Encoding and shape checks live
/// in [`KeyValueStoreExt`], which every store gets for free.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::{KeyValueStore, KeyValueStoreExt};
///
/// async fn remember_theme(store: &dyn KeyValueStore) -> Result<()> {
///     store.set_string("theme", "dark").await?;
///     store.set_json("recent_ids", &vec![42, 7]).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Persist `value` under `key`, overwriting any prior value
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::StorageWrite`] when the medium rejects the write.
    async fn set_raw(&self, key: &str, value: StoredValue) -> Result<()>;

    /// Retrieve the raw value for `key`
    ///
    /// Returns `Ok(None)` if the key was never set or has been removed.
    async fn get_raw(&self, key: &str) -> Result<Option<StoredValue>>;

    /// Delete an entry
    ///
    /// Removing an absent key succeeds silently.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check if an entry exists
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_raw(key).await?.is_some())
    }

    /// List all keys, sorted
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Dump every entry, sorted by key
    ///
    /// This may be expensive on large stores.
    async fn entries(&self) -> Result<Vec<StoredEntry>>;

    /// Remove every key
    ///
    /// Intended for full resets and test teardown only.
    async fn clear_all(&self) -> Result<()>;
}

/// Typed helpers layered over [`KeyValueStore`]
#[async_trait]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Serialize `value` as JSON and store it
    async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized;

    /// Read a JSON entry and decode it into `T`
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::StorageRead`] when the entry is a plain string
    /// or its JSON does not match `T`.
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send;

    /// Store a plain string verbatim
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Read a plain string entry
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::StorageRead`] when the entry holds JSON.
    async fn get_string(&self, key: &str) -> Result<Option<String>>;
}

#[async_trait]
impl<S> KeyValueStoreExt for S
where
    S: KeyValueStore + ?Sized,
{
    async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let raw = serde_json::to_string(value)
            .map_err(|e| BridgeError::storage_write(key, format!("Serialization failed: {}", e)))?;
        self.set_raw(key, StoredValue::json(raw)).await
    }

    async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let Some(stored) = self.get_raw(key).await? else {
            return Ok(None);
        };

        if stored.kind != ValueKind::Json {
            return Err(BridgeError::storage_read(
                key,
                format!("Type mismatch: expected json, got {}", stored.kind),
            ));
        }

        serde_json::from_str(&stored.raw)
            .map(Some)
            .map_err(|e| BridgeError::storage_read(key, format!("Malformed JSON: {}", e)))
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.set_raw(key, StoredValue::string(value)).await
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.get_raw(key).await? {
            Some(stored) if stored.kind == ValueKind::String => Ok(Some(stored.raw)),
            Some(stored) => Err(BridgeError::storage_read(
                key,
                format!("Type mismatch: expected string, got {}", stored.kind),
            )),
            None => Ok(None),
        }
    }
}

/// Volatile in-process store
///
/// Useful for tests and for hosts that do not need persistence across
/// restarts.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, StoredValue>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, StoredValue>>> {
        self.entries
            .lock()
            .map_err(|_| BridgeError::OperationFailed("Memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn set_raw(&self, key: &str, value: StoredValue) -> Result<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> Result<Option<StoredValue>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    async fn entries(&self) -> Result<Vec<StoredEntry>> {
        Ok(self
            .lock()?
            .iter()
            .map(|(key, value)| StoredEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    async fn clear_all(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}
