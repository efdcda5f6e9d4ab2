//! Per-file write gate.
//!
//! A [`Gate`] is a FIFO ticket queue: [`Gate::ticket`] hands out increasing
//! numbers synchronously, so queue position is fixed when a write is *called*,
//! not when its future is first polled. A ticket turns into a [`Permit`] once
//! every earlier ticket has been released. Dropping a ticket or permit always
//! releases its slot, including a ticket dropped while still waiting.
//!
//! Gates are process-local and keyed by resolved path through
//! [`Gate::for_path`]; every adapter pointing at the same file shares one.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, Weak};
use tokio::sync::watch;
use tracing::trace;

/// FIFO mutual-exclusion gate for one file.
pub struct Gate {
    path: PathBuf,
    queue: Mutex<Queue>,
    serving: watch::Sender<u64>,
}

#[derive(Default)]
struct Queue {
    next: u64,
    // tickets dropped before their turn; skipped when the line reaches them
    abandoned: BTreeSet<u64>,
}

impl Gate {
    /// A fresh gate that is not shared through the registry.
    pub fn new(path: impl Into<PathBuf>) -> Arc<Self> {
        let (serving, _) = watch::channel(0);
        Arc::new(Self {
            path: path.into(),
            queue: Mutex::new(Queue::default()),
            serving,
        })
    }

    /// The shared gate for `path`. The path is resolved first (current
    /// directory, `..`, symlinks in existing directories) so different
    /// spellings of one file share a gate.
    pub fn for_path(path: &Path) -> Arc<Self> {
        let key = resolve(path);
        let mut gates = registry().lock();
        if let Some(gate) = gates.get(&key).and_then(Weak::upgrade) {
            return gate;
        }
        gates.retain(|_, g| g.strong_count() > 0);
        let gate = Gate::new(key.clone());
        gates.insert(key, Arc::downgrade(&gate));
        gate
    }

    /// Take the next place in line.
    pub fn ticket(self: &Arc<Self>) -> Ticket {
        let mut queue = self.queue.lock();
        let id = queue.next;
        queue.next += 1;
        trace!(path = %self.path.display(), ticket = id, "gate ticket issued");
        Ticket {
            gate: Arc::clone(self),
            id,
        }
    }

    /// Path this gate guards.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tickets issued and not yet released (including the current holder).
    #[must_use]
    pub fn pending(&self) -> u64 {
        let queue = self.queue.lock();
        let serving = *self.serving.borrow();
        queue.next - serving - queue.abandoned.len() as u64
    }

    fn release(&self, id: u64) {
        let mut queue = self.queue.lock();
        let serving = *self.serving.borrow();
        if serving != id {
            queue.abandoned.insert(id);
            return;
        }
        let mut next = id + 1;
        while queue.abandoned.remove(&next) {
            next += 1;
        }
        trace!(path = %self.path.display(), released = id, next, "gate advanced");
        self.serving.send_replace(next);
    }
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate")
            .field("path", &self.path)
            .field("serving", &*self.serving.borrow())
            .finish_non_exhaustive()
    }
}

/// A place in a gate's line. Dropping it gives the place up.
#[must_use = "a ticket does nothing unless acquired"]
pub struct Ticket {
    gate: Arc<Gate>,
    id: u64,
}

impl Ticket {
    /// Position in line, starting at 0 for the gate's first ticket.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait until every earlier ticket is released.
    pub async fn acquire(self) -> Result<Permit> {
        let mut rx = self.gate.serving.subscribe();
        let id = self.id;
        let reached = rx.wait_for(|serving| *serving == id).await.is_ok();
        if !reached {
            return Err(Error::Io(format!(
                "write gate for {} closed",
                self.gate.path.display()
            )));
        }
        trace!(path = %self.gate.path.display(), ticket = id, "gate acquired");
        Ok(Permit { ticket: self })
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.gate.release(self.id);
    }
}

impl std::fmt::Debug for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticket")
            .field("path", &self.gate.path)
            .field("id", &self.id)
            .finish()
    }
}

/// Exclusive right to write the gated file. Released on drop.
#[derive(Debug)]
pub struct Permit {
    ticket: Ticket,
}

impl Permit {
    /// Path this permit guards.
    pub fn path(&self) -> &Path {
        self.ticket.gate.path()
    }
}

fn registry() -> &'static Mutex<HashMap<PathBuf, Weak<Gate>>> {
    static GATES: OnceLock<Mutex<HashMap<PathBuf, Weak<Gate>>>> = OnceLock::new();
    GATES.get_or_init(Default::default)
}

/// Registry key for `path`: fully resolved when the file exists, otherwise
/// the resolved parent directory joined with the file name, so `..` segments
/// and symlinked directories land on the same gate.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(full) = path.canonicalize() {
        return full;
    }
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(dir) => dir.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    match (joined.parent(), joined.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(dir) => dir.join(name),
            Err(_) => joined,
        },
        _ => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn permits_follow_ticket_order() {
        let gate = Gate::new("order.json");
        let t0 = gate.ticket();
        let t1 = gate.ticket();
        let t2 = gate.ticket();
        assert_eq!((t0.id(), t1.id(), t2.id()), (0, 1, 2));

        let first = t0.acquire().await.unwrap();
        let second = tokio::time::timeout(Duration::from_millis(20), t1.acquire()).await;
        assert!(second.is_err(), "second ticket ran while first was held");

        drop(first);
        let third = t2.acquire().await.unwrap();
        assert_eq!(gate.pending(), 1);
        drop(third);
        assert_eq!(gate.pending(), 0);
    }

    #[tokio::test]
    async fn abandoned_ticket_is_skipped() {
        let gate = Gate::new("skip.json");
        let t0 = gate.ticket();
        let t1 = gate.ticket();
        let t2 = gate.ticket();

        let held = t0.acquire().await.unwrap();
        drop(t1);
        drop(held);
        let permit = tokio::time::timeout(Duration::from_secs(1), t2.acquire())
            .await
            .expect("abandoned ticket blocked the line")
            .unwrap();
        drop(permit);
        assert_eq!(gate.pending(), 0);
    }

    #[test]
    fn same_path_shares_gate() {
        let dir = std::env::temp_dir().join("underdb_gate_shared");
        let a = Gate::for_path(&dir.join("db.json"));
        let b = Gate::for_path(&dir.join("db.json"));
        let c = Gate::for_path(&dir.join("other.json"));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn dot_dot_spelling_shares_gate() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let direct = Gate::for_path(&dir.path().join("db.json"));
        let detour = Gate::for_path(&dir.path().join("sub").join("..").join("db.json"));
        assert!(Arc::ptr_eq(&direct, &detour));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_shares_gate() {
        let dir = tempfile::TempDir::new().unwrap();
        let real = dir.path().join("real");
        std::fs::create_dir(&real).unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("link")).unwrap();
        let a = Gate::for_path(&real.join("db.json"));
        let b = Gate::for_path(&dir.path().join("link").join("db.json"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.path(), b.path());
    }

    #[test]
    fn relative_path_is_resolved() {
        let gate = Gate::for_path(Path::new("relative_gate.json"));
        assert!(gate.path().is_absolute());
    }
}
