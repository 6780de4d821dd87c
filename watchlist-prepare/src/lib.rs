//! # Watchlist Prepare
//!
//! The name normalization pipeline. Both indexed records and incoming
//! queries run through the same stages, so canonical forms are directly
//! comparable:
//!
//! 1. Unicode-aware lowercase
//! 2. Diacritic stripping / ASCII transliteration
//! 3. Whitespace collapse and trim
//! 4. Corporate/legal-form stop-word removal (whole tokens)
//! 5. Punctuation removal (spaces and digits kept)
//! 6. Abbreviation expansion from a fixed table
//!
//! The pipeline is pure and idempotent: `prepare(prepare(s)) == prepare(s)`.
//! It never fails; empty output for non-empty input is legal, and ingest
//! drops such records before they reach the index.
//!
//! Stage-by-stage output can be captured through the [`StageObserver`]
//! capability for offline diagnosis; the production path uses a no-op
//! observer so the hot path does no logging work.

pub mod debug;
pub mod pipeline;
mod tables;

pub use debug::{DebugObserver, NopObserver, RecordingObserver, Stage, StageObserver};
pub use pipeline::Preparer;
