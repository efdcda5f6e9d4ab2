//! File load and atomic replace.
//!
//! A write goes to a uniquely named hidden sibling (`.<name>.<pid>.<seq>.tmp`),
//! is fsynced, then renamed over the target. A crash at any point leaves either
//! the old file or the new one; a failed write removes its temp file. The
//! halves are exposed as [`write_temp`] and [`commit`]. Unique temp names only
//! keep concurrent writers off each other's temp files; ordering between
//! writers in one process is the gate's job, and other processes are not
//! coordinated at all.

use crate::codec::Codec;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Reads and decodes the file at `path`. Returns `None` if the file is missing
/// or empty (not an error).
pub fn load<T, C>(path: &Path, codec: &C) -> Result<Option<T>>
where
    T: DeserializeOwned,
    C: Codec,
{
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e.to_string())),
    };
    decode_bytes(&bytes, codec)
}

/// Decode file contents that were already read. Empty contents count as
/// missing.
pub fn decode_bytes<T, C>(bytes: &[u8], codec: &C) -> Result<Option<T>>
where
    T: DeserializeOwned,
    C: Codec,
{
    if bytes.is_empty() {
        return Ok(None);
    }
    codec.decode(bytes)
}

/// Write `bytes` to a temporary sibling of `path` and then rename it over
/// `path`. Readers see either the previous file or the new one, never a
/// partial write; a crash before the rename leaves the old file intact.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = write_temp(path, bytes)?;
    commit(&tmp, path)
}

/// First half of [`atomic_write`]: create a uniquely named temporary file next
/// to `path`, write `bytes` and fsync it. The target is untouched.
pub fn write_temp(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let tmp = temp_path(path)?;
    let res = File::create(&tmp).and_then(|mut f| {
        f.write_all(bytes)?;
        f.sync_all()
    });
    if let Err(e) = res {
        let _ = std::fs::remove_file(&tmp);
        return Err(Error::Io(e.to_string()));
    }
    Ok(tmp)
}

/// Second half of [`atomic_write`]: rename the temporary file over `path`.
/// The temporary is removed if the rename fails.
pub fn commit(tmp: &Path, path: &Path) -> Result<()> {
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(Error::Io(e.to_string()));
    }
    Ok(())
}

/// `.<name>.<pid>.<seq>.tmp` in the same directory as `path`, so the final
/// rename never crosses filesystems.
fn temp_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| Error::Config(format!("{} has no file name", path.display())))?;
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        ".{}.{}.{seq}.tmp",
        name.to_string_lossy(),
        std::process::id()
    );
    Ok(path.with_file_name(tmp_name))
}
