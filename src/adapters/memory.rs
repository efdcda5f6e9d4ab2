use crate::adapter::Adapter;
use crate::error::Result;
use parking_lot::Mutex;
use std::future::Future;

/// Async twin of [`MemorySync`](super::MemorySync).
///
/// The value is captured (or stored) when the call is made; the returned
/// future then yields once to the scheduler before completing, so callers get
/// the same suspension shape as a real I/O adapter.
pub struct Memory<T> {
    data: Mutex<Option<T>>,
}

impl<T> Memory<T> {
    /// Empty store.
    pub fn new() -> Self {
        Self {
            data: Mutex::new(None),
        }
    }
}

impl<T> Default for Memory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Adapter<T> for Memory<T>
where
    T: Clone + Send + Sync,
{
    fn read(&self) -> impl Future<Output = Result<Option<T>>> + Send {
        let snapshot = self.data.lock().clone();
        async move {
            tokio::task::yield_now().await;
            Ok(snapshot)
        }
    }

    fn write(&self, data: Option<&T>) -> impl Future<Output = Result<()>> + Send {
        *self.data.lock() = data.cloned();
        async {
            tokio::task::yield_now().await;
            Ok(())
        }
    }
}

impl<T> std::fmt::Debug for Memory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").finish_non_exhaustive()
    }
}
