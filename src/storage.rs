//! Pluggable string key-value stores for [`LocalStorage`](crate::adapters::LocalStorage).
//!
//! Implement [`KeyValueStore`] to back the adapter with something else (a
//! browser bridge, a settings registry, a remote cache).

use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A `localStorage`-shaped store: string keys, string values.
///
/// Both calls may block; the adapter on top is synchronous and trusts its
/// caller not to overlap calls.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: String) -> Result<()>;
}

// ---- MemoryStorage -----------------------------------------------------------

/// In-process store, handy for tests and for sharing one store between
/// several adapters (wrap it in an `Arc`).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop `key`, returning its raw value if it was present.
    pub fn remove_item(&self, key: &str) -> Option<String> {
        self.items.write().remove(key)
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.items.get_item(key)
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.items.set_item(key, value)
    }
}

// ---- RwLock<HashMap> ---------------------------------------------------------

impl KeyValueStore for RwLock<HashMap<String, String>> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.write().insert(key.to_owned(), value);
        Ok(())
    }
}

// ---- ShardMap ----------------------------------------------------------------

impl KeyValueStore for shardmap::ShardMap<String, String> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(&key.to_owned()).map(|arc| (*arc).clone()))
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.insert(key.to_owned(), value);
        Ok(())
    }
}

// ---- DashMap (feature-gated) -------------------------------------------------

#[cfg(feature = "dashmap")]
impl KeyValueStore for dashmap::DashMap<String, String> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key).map(|r| r.value().clone()))
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.insert(key.to_owned(), value);
        Ok(())
    }
}

// ---- shared handles ----------------------------------------------------------

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        (**self).set_item(key, value)
    }
}
