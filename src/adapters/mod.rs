//! Concrete adapters.
//!
//! | Adapter | Kind | Backing |
//! |---|---|---|
//! | [`MemorySync`] | sync | in-process value |
//! | [`LocalStorage`] | sync | [`KeyValueStore`](crate::storage::KeyValueStore) under one key |
//! | [`JsonFileSync`] | sync | JSON file, atomic replace |
//! | [`Memory`] | async | in-process value |
//! | [`JsonFile`] | async | JSON file, atomic replace behind a per-file [`Gate`](crate::gate::Gate) |

mod json_file;
mod json_file_sync;
mod local_storage;
mod memory;
mod memory_sync;

pub use json_file::JsonFile;
pub use json_file_sync::JsonFileSync;
pub use local_storage::LocalStorage;
pub use memory::Memory;
pub use memory_sync::MemorySync;
