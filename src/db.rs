//! The façades: one value slot, one adapter, explicit `read` and `write`.

use crate::adapter::{Adapter, SyncAdapter};
use crate::error::{Error, Result};

/// Async façade over an [`Adapter`].
///
/// `data` starts out `None` and is yours to change freely; nothing is
/// persisted until you call [`write`](Self::write), and [`read`](Self::read)
/// overwrites it with whatever the adapter holds.
///
/// ```rust
/// use underdb::adapters::Memory;
/// use underdb::UnderDb;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> underdb::Result<()> {
/// let mut db = UnderDb::new(Memory::<Vec<String>>::new());
/// db.read().await?;
/// db.data.get_or_insert_with(Vec::new).push("milk".into());
/// db.write().await?;
/// # Ok(())
/// # }
/// ```
pub struct UnderDb<T, A> {
    adapter: A,
    /// Last value read, or whatever you've put here since.
    pub data: Option<T>,
}

impl<T, A: Adapter<T>> UnderDb<T, A> {
    /// Wrap `adapter`. `data` starts out `None`.
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            data: None,
        }
    }

    /// Like [`new`](Self::new) but for an adapter that may not be there.
    /// Fails with [`Error::MissingAdapter`] on `None`.
    pub fn try_from_adapter(adapter: Option<A>) -> Result<Self> {
        adapter.map(Self::new).ok_or(Error::MissingAdapter)
    }

    /// Start configuring a façade. Call [`.build()`](UnderDbBuilder::build)
    /// when ready.
    pub fn builder() -> UnderDbBuilder<T, A> {
        UnderDbBuilder::new()
    }

    /// Replace `data` with the adapter's current value. On error `data` is
    /// left as it was.
    pub async fn read(&mut self) -> Result<()> {
        self.data = self.adapter.read().await?;
        Ok(())
    }

    /// Persist the current `data`. A write before any read persists `None`.
    pub async fn write(&self) -> Result<()> {
        self.adapter.write(self.data.as_ref()).await
    }

    /// The adapter this façade was built with.
    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}

impl<T: std::fmt::Debug, A: std::fmt::Debug> std::fmt::Debug for UnderDb<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnderDb")
            .field("adapter", &self.adapter)
            .field("data", &self.data)
            .finish()
    }
}

/// Blocking façade over a [`SyncAdapter`]. Same contract as [`UnderDb`].
pub struct UnderDbSync<T, A> {
    adapter: A,
    /// Last value read, or whatever you've put here since.
    pub data: Option<T>,
}

impl<T, A: SyncAdapter<T>> UnderDbSync<T, A> {
    /// Wrap `adapter`. `data` starts out `None`.
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            data: None,
        }
    }

    /// Fails with [`Error::MissingAdapter`] on `None`.
    pub fn try_from_adapter(adapter: Option<A>) -> Result<Self> {
        adapter.map(Self::new).ok_or(Error::MissingAdapter)
    }

    /// Start configuring a façade. Call
    /// [`.build_sync()`](UnderDbBuilder::build_sync) when ready.
    pub fn builder() -> UnderDbBuilder<T, A> {
        UnderDbBuilder::new()
    }

    /// Replace `data` with the adapter's current value. On error `data` is
    /// left as it was.
    pub fn read(&mut self) -> Result<()> {
        self.data = self.adapter.read()?;
        Ok(())
    }

    /// Persist the current `data`.
    pub fn write(&self) -> Result<()> {
        self.adapter.write(self.data.as_ref())
    }

    /// The adapter this façade was built with.
    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}

impl<T: std::fmt::Debug, A: std::fmt::Debug> std::fmt::Debug for UnderDbSync<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnderDbSync")
            .field("adapter", &self.adapter)
            .field("data", &self.data)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Assembles an [`UnderDb`] or [`UnderDbSync`].
///
/// ```rust
/// use underdb::adapters::MemorySync;
/// use underdb::{Error, UnderDbSync};
///
/// let missing = UnderDbSync::<u8, MemorySync<u8>>::builder().build_sync();
/// assert_eq!(missing.err(), Some(Error::MissingAdapter));
///
/// let db = UnderDbSync::<u8, _>::builder()
///     .adapter(MemorySync::<u8>::new())
///     .initial(Some(7))
///     .build_sync()
///     .unwrap();
/// assert_eq!(db.data, Some(7));
/// ```
pub struct UnderDbBuilder<T, A> {
    adapter: Option<A>,
    initial: Option<T>,
}

impl<T, A> UnderDbBuilder<T, A> {
    fn new() -> Self {
        Self {
            adapter: None,
            initial: None,
        }
    }

    /// Set the adapter. Required.
    pub fn adapter(mut self, adapter: A) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Seed `data` before the first read (default: `None`). Nothing is
    /// persisted until `write`.
    pub fn initial(mut self, data: Option<T>) -> Self {
        self.initial = data;
        self
    }

    /// Build the async façade.
    pub fn build(self) -> Result<UnderDb<T, A>>
    where
        A: Adapter<T>,
    {
        let adapter = self.adapter.ok_or(Error::MissingAdapter)?;
        Ok(UnderDb {
            adapter,
            data: self.initial,
        })
    }

    /// Build the blocking façade.
    pub fn build_sync(self) -> Result<UnderDbSync<T, A>>
    where
        A: SyncAdapter<T>,
    {
        let adapter = self.adapter.ok_or(Error::MissingAdapter)?;
        Ok(UnderDbSync {
            adapter,
            data: self.initial,
        })
    }
}

impl<T, A> std::fmt::Debug for UnderDbBuilder<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnderDbBuilder")
            .field("has_adapter", &self.adapter.is_some())
            .finish_non_exhaustive()
    }
}
