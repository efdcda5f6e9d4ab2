use crate::adapter::SyncAdapter;
use crate::codec::{Codec, JsonCodec};
use crate::error::Result;
use crate::persist::{atomic_write, load};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Blocking JSON file adapter.
///
/// A missing or empty file reads as `None`. Writes go through a temporary
/// sibling and a rename, so the file is always either the old or the new
/// version. There is no locking: don't overlap calls on the same file.
pub struct JsonFileSync<T, C = JsonCodec> {
    path: PathBuf,
    codec: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileSync<T> {
    /// Adapter for `path`, writing pretty-printed JSON.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            codec: JsonCodec::pretty(),
            _marker: PhantomData,
        }
    }
}

impl<T, C: Codec> JsonFileSync<T, C> {
    /// Replace the codec.
    pub fn with_codec<D: Codec>(self, codec: D) -> JsonFileSync<T, D> {
        JsonFileSync {
            path: self.path,
            codec,
            _marker: PhantomData,
        }
    }

    /// Path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T, C> SyncAdapter<T> for JsonFileSync<T, C>
where
    T: Serialize + DeserializeOwned,
    C: Codec,
{
    fn read(&self) -> Result<Option<T>> {
        load(&self.path, &self.codec)
    }

    fn write(&self, data: Option<&T>) -> Result<()> {
        let bytes = self.codec.encode(data)?;
        atomic_write(&self.path, &bytes)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "file written");
        Ok(())
    }
}

impl<T, C> std::fmt::Debug for JsonFileSync<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileSync")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
