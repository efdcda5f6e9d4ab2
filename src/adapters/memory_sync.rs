use crate::adapter::SyncAdapter;
use crate::error::Result;
use parking_lot::Mutex;

/// Keeps the value in process. Nothing is serialized; values are cloned in and
/// out as-is. Starts out missing.
pub struct MemorySync<T> {
    data: Mutex<Option<T>>,
}

impl<T> MemorySync<T> {
    /// Empty store.
    pub fn new() -> Self {
        Self {
            data: Mutex::new(None),
        }
    }
}

impl<T> Default for MemorySync<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> SyncAdapter<T> for MemorySync<T> {
    fn read(&self) -> Result<Option<T>> {
        Ok(self.data.lock().clone())
    }

    fn write(&self, data: Option<&T>) -> Result<()> {
        *self.data.lock() = data.cloned();
        Ok(())
    }
}

impl<T> std::fmt::Debug for MemorySync<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySync").finish_non_exhaustive()
    }
}
