//! The two adapter capability sets a façade can sit on.
//!
//! Missing data is `None` on both sides of the boundary: a backing record that
//! was never written reads as `Ok(None)`, and writing `None` stores the
//! missing marker.

use crate::error::Result;
use std::future::Future;

/// Blocking adapter. No internal concurrency control; the caller is trusted
/// not to overlap calls.
pub trait SyncAdapter<T> {
    /// Current persisted value, or `None` if nothing is recorded.
    fn read(&self) -> Result<Option<T>>;

    /// Replace the persisted value.
    fn write(&self, data: Option<&T>) -> Result<()>;
}

/// Non-blocking adapter. Implementations must be safe to call concurrently
/// from one task (e.g. several `write`s joined together).
pub trait Adapter<T>: Send + Sync {
    /// Current persisted value, or `None` if nothing is recorded.
    fn read(&self) -> impl Future<Output = Result<Option<T>>> + Send;

    /// Replace the persisted value. Writes made on one adapter complete on the
    /// backing store in the order the calls were made.
    fn write(&self, data: Option<&T>) -> impl Future<Output = Result<()>> + Send;
}
