//! The sink registry: handle allocation, registration, snapshots.

use ahash::AHashMap;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::backend::sink::SinkEntry;
use crate::utils::error::{Error, Result};

/// Opaque identifier for a registered sink.
///
/// Handles are unique for the life of the logger that issued them; a
/// retired handle is never re-issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkHandle(u64);

impl SinkHandle {
    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        SinkHandle(raw)
    }
}

impl fmt::Display for SinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scratch buffer for per-record dispatch snapshots. Sized so the common
/// handful-of-sinks case stays off the heap.
pub type Snapshot = SmallVec<[Arc<SinkEntry>; 8]>;

/// Thread-safe mapping from handle to sink.
///
/// Sinks are reference-shared: a snapshot clones `Arc`s under a short read
/// lock and releases it before any sink body runs, so registration never
/// waits on a slow sink and a sink removed mid-dispatch stays alive until
/// the in-flight dispatch drops its reference.
pub struct SinkRegistry {
    entries: RwLock<AHashMap<SinkHandle, Arc<SinkEntry>>>,
    next_handle: AtomicU64,
}

impl SinkRegistry {
    pub fn new() -> Self {
        SinkRegistry {
            entries: RwLock::new(AHashMap::new()),
            // Start at 1 so handle 0 is never issued.
            next_handle: AtomicU64::new(1),
        }
    }

    /// Insert a sink under a freshly allocated handle.
    pub fn insert(&self, entry_fn: impl FnOnce(SinkHandle) -> SinkEntry) -> SinkHandle {
        let handle = SinkHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let entry = Arc::new(entry_fn(handle));
        self.entries.write().insert(handle, entry);
        handle
    }

    /// Remove the binding for `handle`. The sink itself is dropped once
    /// the last in-flight dispatch releases it.
    pub fn remove(&self, handle: SinkHandle) -> Result<()> {
        match self.entries.write().remove(&handle) {
            Some(_) => Ok(()),
            None => Err(Error::HandleNotFound(handle)),
        }
    }

    /// Fill `out` with a consistent view of the current sinks.
    pub fn snapshot(&self, out: &mut Snapshot) {
        out.clear();
        let guard = self.entries.read();
        out.extend(guard.values().cloned());
    }

    /// Remove and return every sink. Used once, at logger shutdown, to
    /// flush file sinks deterministically.
    pub fn drain(&self) -> Vec<Arc<SinkEntry>> {
        self.entries.write().drain().map(|(_, e)| e).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::sink::SinkKind;
    use crate::filter::Filter;

    fn noop_entry(handle: SinkHandle) -> SinkEntry {
        SinkEntry::new(handle, Filter::AcceptAll, SinkKind::Callback(Box::new(|_| {})))
    }

    #[test]
    fn test_handles_are_unique_and_never_reused() {
        let registry = SinkRegistry::new();
        let a = registry.insert(noop_entry);
        let b = registry.insert(noop_entry);
        assert_ne!(a, b);

        registry.remove(a).unwrap();
        let c = registry.insert(noop_entry);
        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn test_remove_unknown_handle_fails() {
        let registry = SinkRegistry::new();
        let err = registry.remove(SinkHandle::from_raw(0)).unwrap_err();
        assert!(matches!(err, Error::HandleNotFound(_)));
    }

    #[test]
    fn test_double_remove_fails() {
        let registry = SinkRegistry::new();
        let handle = registry.insert(noop_entry);
        registry.remove(handle).unwrap();
        assert!(matches!(
            registry.remove(handle),
            Err(Error::HandleNotFound(h)) if h == handle
        ));
    }

    #[test]
    fn test_snapshot_reflects_membership() {
        let registry = SinkRegistry::new();
        let mut snapshot = Snapshot::new();

        registry.snapshot(&mut snapshot);
        assert!(snapshot.is_empty());

        let handle = registry.insert(noop_entry);
        registry.snapshot(&mut snapshot);
        assert_eq!(snapshot.len(), 1);

        registry.remove(handle).unwrap();
        registry.snapshot(&mut snapshot);
        assert!(snapshot.is_empty());
    }
}
