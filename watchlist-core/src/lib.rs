//! # Watchlist Core
//!
//! Runtime-agnostic core library for the watchlist search service.
//!
//! This crate provides:
//! - The entity data model: [`Entity`], its per-type payloads, addresses,
//!   crypto addresses, and tri-precision [`EntityDate`]s
//! - The immutable [`Index`] snapshot with per-type sub-slices and
//!   per-list [`IndexStats`]
//! - [`partition`]: contiguous range splitting for parallel scans
//!
//! ## Design Principles
//!
//! 1. **Runtime-agnostic**: No tokio, no forced `Send + Sync`
//! 2. **Snapshot-immutable**: An [`Index`] is never mutated after
//!    construction; a refresh allocates a new one
//! 3. **Deterministic ordering**: Index assembly and all accessors are
//!    order-stable so identical queries yield identical results

pub mod address;
pub mod date;
pub mod entity;
pub mod error;
pub mod index;
pub mod index_stats;
pub mod partition;
pub mod source;

pub use address::{Address, CryptoAddress};
pub use date::EntityDate;
pub use entity::{
    Affiliation, Aircraft, Business, Entity, EntityDetails, EntityType, Gender, GovernmentId,
    HistoricalInfo, Organization, Person, SanctionsInfo, Vessel,
};
pub use error::{Error, Result};
pub use index::{Index, IndexedEntity};
pub use index_stats::IndexStats;
pub use partition::partition;
pub use source::SourceList;
