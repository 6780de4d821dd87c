//! # Watchlist Query
//!
//! The scored matching engine. Scoring iterates candidates from one
//! immutable index snapshot:
//!
//! - [`Matcher`]: field-wise weighted similarity between a query entity
//!   and one candidate, always in `[0.0, 1.0]`
//! - [`scan_shard`]: scan one contiguous candidate range keeping a local
//!   top-K, with early min-match discard and per-candidate cancellation
//! - [`merge_hits`]: deterministic fan-in of per-shard top-K lists
//!
//! The matcher and scanner are synchronous and never block; parallel
//! fan-out across shards lives in the service layer.

pub mod cancel;
pub mod scan;
pub mod score;
pub mod similarity;

pub use cancel::{CancelToken, Cancelled};
pub use scan::{merge_hits, scan_shard, SearchHit};
pub use score::{Matcher, ScoreWeights};
pub use similarity::name_similarity;
