//! # Watchlist Ingest
//!
//! The seam between external list parsers and the search core.
//!
//! The CSV/XML parsers for each list format are external collaborators;
//! this crate specifies the shape of the records they yield
//! ([`records`]), the async fetch seam ([`ListFetcher`]), and the
//! normalization that joins raw rows into one [`Entity`](watchlist_core::Entity)
//! per logical subject ([`group_entities`]).

pub mod error;
pub mod fetch;
pub mod group;
pub mod records;

pub use error::{IngestError, Result};
pub use fetch::{DirectoryFetcher, ListFetcher};
pub use group::group_entities;
pub use records::{
    AddressRecord, AltNameRecord, CommentRecord, ListRecord, RawLists, SdnRecord,
};
