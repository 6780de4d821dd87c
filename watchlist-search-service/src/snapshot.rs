//! The shared snapshot handle.

use parking_lot::RwLock;
use std::sync::Arc;

use watchlist_core::Index;

/// The one mutable cell in the service: the currently-installed index.
///
/// Discipline: the refresher is the single writer; every search calls
/// [`load`](SnapshotHandle::load) exactly once at entry and keeps the
/// returned `Arc` for its whole lifetime. The swap is a single pointer
/// store under a short write lock, so readers never observe a torn or
/// partially-built index, and an index stays alive until the last query
/// holding it completes.
#[derive(Debug)]
pub struct SnapshotHandle {
    current: RwLock<Arc<Index>>,
}

impl SnapshotHandle {
    /// Create a handle holding an empty placeholder index.
    pub fn new() -> Self {
        Self::with_index(Arc::new(Index::empty()))
    }

    pub fn with_index(index: Arc<Index>) -> Self {
        Self {
            current: RwLock::new(index),
        }
    }

    /// Capture the current snapshot.
    pub fn load(&self) -> Arc<Index> {
        Arc::clone(&self.current.read())
    }

    /// Install a new snapshot. Queries that already captured the old one
    /// keep it; queries starting after this call see the new one.
    pub fn store(&self, index: Arc<Index>) {
        *self.current.write() = index;
    }
}

impl Default for SnapshotHandle {
    fn default() -> Self {
        Self::new()
    }
}
