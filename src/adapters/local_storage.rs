use crate::adapter::SyncAdapter;
use crate::codec::{Codec, JsonCodec};
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Stores the value as JSON text under one key of a [`KeyValueStore`].
///
/// Uses compact JSON by default; swap the codec with
/// [`with_codec`](Self::with_codec).
pub struct LocalStorage<T, S, C = JsonCodec> {
    key: String,
    store: S,
    codec: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S: KeyValueStore> LocalStorage<T, S> {
    /// Adapter over `store`, reading and writing `key`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            store,
            codec: JsonCodec::new(),
            _marker: PhantomData,
        }
    }
}

impl<T, S: KeyValueStore, C: Codec> LocalStorage<T, S, C> {
    /// Replace the codec.
    pub fn with_codec<D: Codec>(self, codec: D) -> LocalStorage<T, S, D> {
        LocalStorage {
            key: self.key,
            store: self.store,
            codec,
            _marker: PhantomData,
        }
    }

    /// Key this adapter reads and writes.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<T, S, C> SyncAdapter<T> for LocalStorage<T, S, C>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
    C: Codec,
{
    fn read(&self) -> Result<Option<T>> {
        match self.store.get_item(&self.key)? {
            None => Ok(None),
            Some(text) => self.codec.decode(text.as_bytes()),
        }
    }

    fn write(&self, data: Option<&T>) -> Result<()> {
        let bytes = self.codec.encode(data)?;
        let text = String::from_utf8(bytes).map_err(|e| Error::Serialize(e.to_string()))?;
        self.store.set_item(&self.key, text)
    }
}

impl<T, S, C> std::fmt::Debug for LocalStorage<T, S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStorage")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
