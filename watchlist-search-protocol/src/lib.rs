//! # Watchlist Search Protocol
//!
//! The wire contract for the `/v2/search` endpoint: parsing decoded query
//! parameters into a query [`Entity`](watchlist_core::Entity) plus
//! [`SearchOpts`], and the JSON response and error envelopes.
//!
//! Parsing is transport-agnostic (the HTTP adapter hands in decoded
//! `(key, value)` pairs), so the contract is unit-testable without a
//! server.

pub mod error;
pub mod params;
pub mod response;

pub use error::{ErrorCode, ErrorResponse, ParamError};
pub use params::{parse_search_query, SearchOpts, DEFAULT_LIMIT, HARD_LIMIT};
pub use response::{SearchResponse, SearchedEntity};
