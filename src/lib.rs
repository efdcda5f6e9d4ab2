//! Tiny JSON document persistence with pluggable adapters.
//!
//! Hold one value in `data`, pick an adapter (memory, a key-value store, or a
//! JSON file), and call `read()` / `write()` when you want to sync.
//!
//! ```rust,no_run
//! use underdb::adapters::JsonFileSync;
//! use underdb::UnderDbSync;
//!
//! let mut db = UnderDbSync::new(JsonFileSync::<Vec<String>>::new("todos.json"));
//! db.read().unwrap();
//! db.data.get_or_insert_with(Vec::new).push("write docs".into());
//! db.write().unwrap();
//! ```
//!
//! File writes are atomic (temp file + rename). The async [`JsonFile`]
//! adapter also serializes writes per file in call order.
//!
//! **Single-process only.** The write gate is process-local. Two processes
//! writing the same file each produce a complete file, but which one wins is
//! up to the filesystem.
//!
//! [`JsonFile`]: adapters::JsonFile

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod adapters;
pub mod codec;
pub mod db;
pub mod error;
pub mod gate;
pub mod persist;
pub mod storage;

pub use adapter::{Adapter, SyncAdapter};
pub use codec::{Codec, JsonCodec};
pub use db::{UnderDb, UnderDbBuilder, UnderDbSync};
pub use error::{Error, Result};
pub use storage::{KeyValueStore, MemoryStorage};
