//! # Watchlist Search HTTP Server
//!
//! The thin HTTP adapter around the search core.
//!
//! # Endpoints
//!
//! - `GET /v2/search` - Execute a search query
//! - `GET /ping` - Liveness check (`PONG`)
//! - `GET /version` - Server version
//! - `POST /v1/ofac/refresh` - Trigger a manual data refresh
//! - `GET /v1/ofac/debug/sdn/{id}` - Raw and prepared forms of one record
//!
//! # Configuration
//!
//! Flags with environment fallbacks; see [`config::Args`]. The initial
//! data refresh is mandatory: if it fails the process exits non-zero
//! before the listen port is ever bound.

pub mod config;
pub mod routes;
pub mod state;
pub mod webhook;

pub use config::{parse_refresh_interval, Args, DEFAULT_REFRESH_INTERVAL};
pub use routes::build_router;
pub use state::AppState;
