//! Application state shared across handlers.

use std::sync::Arc;

use watchlist_prepare::Preparer;
use watchlist_search_service::{Refresher, Searcher, SnapshotHandle};

/// State behind every route handler.
pub struct AppState {
    /// Query execution over the current snapshot.
    pub searcher: Searcher,
    /// Refresh subsystem, shared with the periodic task.
    pub refresher: Arc<Refresher>,
    /// Snapshot handle, used directly by the debug endpoint.
    pub handle: Arc<SnapshotHandle>,
    /// Query-side name preparation.
    pub preparer: Preparer,
    /// Log every normalization stage of prepared query names.
    pub debug_name_pipeline: bool,
}
