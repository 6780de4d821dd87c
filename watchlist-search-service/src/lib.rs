//! # Watchlist Search Service
//!
//! Orchestration around the matching engine:
//!
//! - [`SnapshotHandle`]: the single mutable cell, the current index,
//!   swapped atomically by the refresher, read once per query
//! - [`Searcher`]: per-query fan-out over partitioned candidate shards,
//!   bounded by one process-wide worker semaphore
//! - [`Refresher`]: periodic and manually-triggered index rebuilds with
//!   trigger coalescing and a non-blocking stats channel
//!
//! # Concurrency Model
//!
//! Single-writer (the refresher), many-readers (searchers). A query
//! captures its snapshot once at entry and uses it for its whole
//! lifetime; a refresh completing mid-query never changes what that
//! query sees.

pub mod error;
pub mod refresh;
pub mod search;
pub mod snapshot;

pub use error::{Result, ServiceError};
pub use refresh::{RefreshPhase, RefreshStats, Refresher};
pub use search::{Searcher, SearcherConfig};
pub use snapshot::SnapshotHandle;
