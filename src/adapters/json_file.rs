use crate::adapter::Adapter;
use crate::codec::{Codec, JsonCodec};
use crate::error::{Error, Result};
use crate::gate::{Gate, Ticket};
use crate::persist::{atomic_write, decode_bytes};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Async JSON file adapter.
///
/// Reads are ungated: a read racing a write sees either the old or the new
/// file, never a torn one, because writes replace the file by rename.
///
/// Writes start when [`write`](Adapter::write) is *called*: the call takes a
/// place on the file's [`Gate`] and spawns a task that waits its turn and then
/// replaces the file on tokio's blocking pool. The returned future only
/// reports the outcome, so writes land on disk in call order however (or
/// whether) their futures are awaited, and the last call wins. Calling
/// `write` outside a tokio runtime fails with [`Error::Io`].
///
/// ```rust,no_run
/// use underdb::adapters::JsonFile;
/// use underdb::Adapter;
///
/// # async fn demo() -> underdb::Result<()> {
/// let file = JsonFile::<u32>::new("counter.json");
/// let values: Vec<u32> = (0..10).collect();
/// let writes: Vec<_> = values.iter().map(|v| file.write(Some(v))).collect();
/// for w in writes {
///     w.await?;
/// }
/// assert_eq!(file.read().await?, Some(9));
/// # Ok(())
/// # }
/// ```
pub struct JsonFile<T, C = JsonCodec> {
    path: PathBuf,
    gate: Arc<Gate>,
    codec: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T> {
    /// Adapter for `path`, writing pretty-printed JSON.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            gate: Gate::for_path(&path),
            path,
            codec: JsonCodec::pretty(),
            _marker: PhantomData,
        }
    }
}

impl<T, C: Codec> JsonFile<T, C> {
    /// Replace the codec.
    pub fn with_codec<D: Codec>(self, codec: D) -> JsonFile<T, D> {
        JsonFile {
            path: self.path,
            gate: self.gate,
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

impl<T, C> Adapter<T> for JsonFile<T, C>
where
    T: Serialize + DeserializeOwned + Send,
    C: Codec,
{
    fn read(&self) -> impl Future<Output = Result<Option<T>>> + Send {
        async move {
            let bytes = match tokio::fs::read(&self.path).await {
                Ok(b) => b,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %self.path.display(), "no file yet, reading as missing");
                    return Ok(None);
                }
                Err(e) => return Err(Error::Io(e.to_string())),
            };
            decode_bytes(&bytes, &self.codec)
        }
    }

    fn write(&self, data: Option<&T>) -> impl Future<Output = Result<()>> + Send {
        let ticket = self.gate.ticket();
        let encoded = self.codec.encode(data);
        let path = self.path.clone();
        let task = tokio::runtime::Handle::try_current()
            .map(|rt| rt.spawn(write_in_turn(ticket, encoded, path)))
            .map_err(|e| Error::Io(format!("async write needs a tokio runtime: {e}")));

        async move {
            match task {
                Ok(handle) => handle.await.map_err(Error::from).and_then(|r| r),
                Err(e) => Err(e),
            }
        }
    }
}

async fn write_in_turn(ticket: Ticket, encoded: Result<Vec<u8>>, path: PathBuf) -> Result<()> {
    let bytes = encoded?;
    let permit = ticket.acquire().await?;
    let len = bytes.len();
    let job_path = path.clone();
    let res = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        atomic_write(&job_path, &bytes)
    })
    .await
    .map_err(Error::from)
    .and_then(|r| r);

    match &res {
        Ok(()) => debug!(path = %path.display(), bytes = len, "file written"),
        Err(e) => warn!(path = %path.display(), error = %e, "file write failed"),
    }
    res
}

impl<T, C> std::fmt::Debug for JsonFile<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFile")
            .field("path", &self.path)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
