//! Search response types.

use serde::{Deserialize, Serialize};

use watchlist_core::Entity;

/// Response envelope for `/v2/search`: `{"entities": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub entities: Vec<SearchedEntity>,
}

/// An entity augmented with its match score in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchedEntity {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "match")]
    pub match_score: f64,
}

impl SearchedEntity {
    pub fn new(entity: Entity, match_score: f64) -> Self {
        Self {
            entity,
            match_score,
        }
    }
}
