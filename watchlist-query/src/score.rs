//! Field-wise weighted entity scoring.
//!
//! A score is computed only from fields the query populates: the name is
//! weighted heavily, and the remaining weight is split evenly across the
//! other populated fields (identifiers, dates, gender, flag, titles,
//! addresses, crypto addresses). The matcher never fails; degenerate
//! input scores 0.

use watchlist_core::{Address, CryptoAddress, EntityDate, EntityType, Gender, IndexedEntity};
use watchlist_prepare::Preparer;

use crate::similarity::name_similarity;

/// Relative weight configuration.
///
/// `name` is the share of total weight given to name similarity when any
/// other field is populated; the remainder is split evenly. Per-field
/// weights beyond the name share were never centrally documented for
/// these lists, so the even split is the baseline.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub name: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { name: 0.5 }
    }
}

/// Scores one query entity against one candidate entity.
///
/// Stateless apart from configuration; cheap to copy into worker tasks.
#[derive(Debug, Default, Clone, Copy)]
pub struct Matcher {
    weights: ScoreWeights,
    preparer: Preparer,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self {
            weights: ScoreWeights {
                name: weights.name.clamp(0.0, 1.0),
            },
            preparer: Preparer::new(),
        }
    }

    /// Score a (query, candidate) pair in `[0.0, 1.0]`.
    ///
    /// A typed query never matches a candidate of a different type; such
    /// pairs score 0 and are skipped by the scanner.
    pub fn score(&self, query: &IndexedEntity, candidate: &IndexedEntity) -> f64 {
        let query_type = query.entity.entity_type;
        if query_type != EntityType::Unknown && candidate.entity.entity_type != query_type {
            return 0.0;
        }

        let name_score = if query.canonical_name.is_empty() {
            None
        } else {
            Some(best_name_score(query, candidate))
        };

        let mut fields = Vec::new();
        self.collect_detail_scores(query, candidate, &mut fields);
        self.collect_common_scores(query, candidate, &mut fields);

        let score = match (name_score, fields.is_empty()) {
            (None, true) => 0.0,
            (Some(name), true) => name,
            (None, false) => average(&fields),
            (Some(name), false) => {
                self.weights.name * name + (1.0 - self.weights.name) * average(&fields)
            }
        };
        score.clamp(0.0, 1.0)
    }

    fn collect_detail_scores(
        &self,
        query: &IndexedEntity,
        candidate: &IndexedEntity,
        fields: &mut Vec<f64>,
    ) {
        use watchlist_core::EntityDetails::*;

        match (&query.entity.details, &candidate.entity.details) {
            (Person(q), cand) => {
                let c = cand.as_person();
                if q.gender != Gender::Unknown {
                    fields.push(match c {
                        Some(c) if c.gender == q.gender => 1.0,
                        _ => 0.0,
                    });
                }
                if let Some(birth) = &q.birth_date {
                    fields.push(date_score(birth, c.and_then(|c| c.birth_date.as_ref())));
                }
                if let Some(death) = &q.death_date {
                    fields.push(date_score(death, c.and_then(|c| c.death_date.as_ref())));
                }
                if !q.titles.is_empty() {
                    let titles = c.map(|c| c.titles.as_slice()).unwrap_or_default();
                    fields.push(self.best_text_score(&q.titles, titles));
                }
                if !q.government_ids.is_empty() {
                    let ids = c.map(|c| c.government_ids.as_slice()).unwrap_or_default();
                    fields.push(government_id_score(&q.government_ids, ids));
                }
            }
            (Business(q), cand) => {
                let c = cand.as_business();
                if let Some(created) = &q.created {
                    fields.push(date_score(created, c.and_then(|c| c.created.as_ref())));
                }
                if let Some(dissolved) = &q.dissolved {
                    fields.push(date_score(dissolved, c.and_then(|c| c.dissolved.as_ref())));
                }
                if !q.identifiers.is_empty() {
                    let ids = c.map(|c| c.identifiers.as_slice()).unwrap_or_default();
                    fields.push(government_id_score(&q.identifiers, ids));
                }
            }
            (Organization(q), cand) => {
                let c = cand.as_organization();
                if let Some(created) = &q.created {
                    fields.push(date_score(created, c.and_then(|c| c.created.as_ref())));
                }
                if let Some(dissolved) = &q.dissolved {
                    fields.push(date_score(dissolved, c.and_then(|c| c.dissolved.as_ref())));
                }
                if !q.identifiers.is_empty() {
                    let ids = c.map(|c| c.identifiers.as_slice()).unwrap_or_default();
                    fields.push(government_id_score(&q.identifiers, ids));
                }
            }
            (Aircraft(q), cand) => {
                let c = cand.as_aircraft();
                if !q.icao_code.is_empty() {
                    fields.push(identifier_score(
                        &q.icao_code,
                        c.map(|c| c.icao_code.as_str()).unwrap_or_default(),
                    ));
                }
                if !q.serial_number.is_empty() {
                    fields.push(identifier_score(
                        &q.serial_number,
                        c.map(|c| c.serial_number.as_str()).unwrap_or_default(),
                    ));
                }
                if !q.flag.is_empty() {
                    fields.push(flag_score(
                        &q.flag,
                        c.map(|c| c.flag.as_str()).unwrap_or_default(),
                    ));
                }
                if let Some(built) = &q.built {
                    fields.push(date_score(built, c.and_then(|c| c.built.as_ref())));
                }
            }
            (Vessel(q), cand) => {
                let c = cand.as_vessel();
                if !q.imo_number.is_empty() {
                    fields.push(identifier_score(
                        &q.imo_number,
                        c.map(|c| c.imo_number.as_str()).unwrap_or_default(),
                    ));
                }
                if !q.mmsi.is_empty() {
                    fields.push(identifier_score(
                        &q.mmsi,
                        c.map(|c| c.mmsi.as_str()).unwrap_or_default(),
                    ));
                }
                if !q.call_sign.is_empty() {
                    fields.push(identifier_score(
                        &q.call_sign,
                        c.map(|c| c.call_sign.as_str()).unwrap_or_default(),
                    ));
                }
                if !q.flag.is_empty() {
                    fields.push(flag_score(
                        &q.flag,
                        c.map(|c| c.flag.as_str()).unwrap_or_default(),
                    ));
                }
                if let Some(built) = &q.built {
                    fields.push(date_score(built, c.and_then(|c| c.built.as_ref())));
                }
            }
            (Unknown, _) => {}
        }
    }

    fn collect_common_scores(
        &self,
        query: &IndexedEntity,
        candidate: &IndexedEntity,
        fields: &mut Vec<f64>,
    ) {
        if !query.entity.addresses.is_empty() {
            fields.push(self.address_score(&query.entity.addresses, &candidate.entity.addresses));
        }
        if !query.entity.crypto_addresses.is_empty() {
            fields.push(crypto_score(
                &query.entity.crypto_addresses,
                &candidate.entity.crypto_addresses,
            ));
        }
        if !query.entity.government_ids.is_empty() {
            fields.push(government_id_score(
                &query.entity.government_ids,
                &candidate.entity.government_ids,
            ));
        }
    }

    /// Best pairwise similarity across the query × candidate cross product.
    fn address_score(&self, query: &[Address], candidate: &[Address]) -> f64 {
        let mut best: f64 = 0.0;
        for q in query {
            let q_text = self.preparer.prepare_name(&q.joined());
            if q_text.is_empty() {
                continue;
            }
            for c in candidate {
                let c_text = self.preparer.prepare_name(&c.joined());
                best = best.max(name_similarity(&q_text, &c_text));
            }
        }
        best
    }

    fn best_text_score(&self, query: &[String], candidate: &[String]) -> f64 {
        let mut best: f64 = 0.0;
        for q in query {
            let q_text = self.preparer.prepare_name(q);
            if q_text.is_empty() {
                continue;
            }
            for c in candidate {
                let c_text = self.preparer.prepare_name(c);
                best = best.max(name_similarity(&q_text, &c_text));
            }
        }
        best
    }
}

/// Max similarity of the query name against the candidate's primary and
/// alternate canonical forms.
fn best_name_score(query: &IndexedEntity, candidate: &IndexedEntity) -> f64 {
    let mut best = name_similarity(&query.canonical_name, &candidate.canonical_name);
    for alt in &candidate.canonical_alt_names {
        best = best.max(name_similarity(&query.canonical_name, alt));
    }
    for query_alt in &query.canonical_alt_names {
        best = best.max(name_similarity(query_alt, &candidate.canonical_name));
        for alt in &candidate.canonical_alt_names {
            best = best.max(name_similarity(query_alt, alt));
        }
    }
    best
}

/// Exact identifier comparison: case-insensitive, ignoring internal
/// whitespace and punctuation.
fn identifier_score(query: &str, candidate: &str) -> f64 {
    let q = normalize_identifier(query);
    let c = normalize_identifier(candidate);
    if !q.is_empty() && q == c {
        1.0
    } else {
        0.0
    }
}

fn normalize_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Best pairwise government-ID comparison.
fn government_id_score(query: &[watchlist_core::GovernmentId], candidate: &[watchlist_core::GovernmentId]) -> f64 {
    for q in query {
        for c in candidate {
            if identifier_score(&q.identifier, &c.identifier) == 1.0 {
                return 1.0;
            }
        }
    }
    0.0
}

/// Equal precision and value, or a partial-precision query whose
/// components all agree with a more precise candidate.
fn date_score(query: &EntityDate, candidate: Option<&EntityDate>) -> f64 {
    match candidate {
        Some(candidate) if query.matches(candidate) => 1.0,
        _ => 0.0,
    }
}

fn flag_score(query: &str, candidate: &str) -> f64 {
    if !query.trim().is_empty() && query.trim().eq_ignore_ascii_case(candidate.trim()) {
        1.0
    } else {
        0.0
    }
}

/// Any exact `(currency, address)` pair match.
fn crypto_score(query: &[CryptoAddress], candidate: &[CryptoAddress]) -> f64 {
    for q in query {
        if candidate.iter().any(|c| c.matches(q)) {
            return 1.0;
        }
    }
    0.0
}

fn average(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
