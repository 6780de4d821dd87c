//! The immutable index snapshot.
//!
//! An [`Index`] is assembled once per refresh and never mutated afterward.
//! Readers capture an `Arc<Index>` at query entry and hold it for the
//! query's lifetime; the refresher publishes a replacement by swapping the
//! shared handle, so no reader ever observes a partially-built index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

use crate::entity::{Entity, EntityType};
use crate::index_stats::IndexStats;

/// An entity annotated with its canonical comparison forms.
///
/// The canonical strings are computed once at ingest by the preparer and
/// never change; the original strings are preserved for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedEntity {
    #[serde(flatten)]
    pub entity: Entity,
    /// Canonical form of the primary name. Never empty for an entity that
    /// survived ingest.
    pub canonical_name: String,
    /// Canonical forms of the alternate names, empty forms dropped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub canonical_alt_names: Vec<String>,
}

/// Immutable snapshot of all indexed entities.
///
/// Entities are sorted by `(type, source, source_id)` during assembly so
/// that per-type candidate sets are contiguous sub-slices and index
/// iteration order is deterministic across identical inputs.
#[derive(Debug, Clone)]
pub struct Index {
    entities: Vec<IndexedEntity>,
    type_ranges: BTreeMap<EntityType, Range<usize>>,
    stats: IndexStats,
    refreshed_at: DateTime<Utc>,
}

impl Index {
    /// Assemble a snapshot from prepared entities.
    ///
    /// Records whose payload disagrees with their type tag or whose
    /// canonical name is empty are dropped here; this is the last gate
    /// before the snapshot becomes visible to queries.
    pub fn new(
        mut entities: Vec<IndexedEntity>,
        stats: IndexStats,
        refreshed_at: DateTime<Utc>,
    ) -> Self {
        entities.retain(|e| e.entity.details_consistent() && !e.canonical_name.is_empty());
        entities.sort_by(|a, b| {
            (a.entity.entity_type, a.entity.source.as_str(), &a.entity.source_id).cmp(&(
                b.entity.entity_type,
                b.entity.source.as_str(),
                &b.entity.source_id,
            ))
        });

        let mut type_ranges: BTreeMap<EntityType, Range<usize>> = BTreeMap::new();
        let mut start = 0;
        while start < entities.len() {
            let ty = entities[start].entity.entity_type;
            let mut end = start + 1;
            while end < entities.len() && entities[end].entity.entity_type == ty {
                end += 1;
            }
            type_ranges.insert(ty, start..end);
            start = end;
        }

        Self {
            entities,
            type_ranges,
            stats,
            refreshed_at,
        }
    }

    /// An empty snapshot. Installed as the placeholder before the initial
    /// refresh publishes; the startup contract guarantees no search runs
    /// against it.
    pub fn empty() -> Self {
        Self::new(Vec::new(), IndexStats::default(), DateTime::<Utc>::MIN_UTC)
    }

    /// All indexed entities, in deterministic assembly order.
    pub fn entities(&self) -> &[IndexedEntity] {
        &self.entities
    }

    /// The contiguous sub-slice of entities with the given type tag.
    pub fn of_type(&self, entity_type: EntityType) -> &[IndexedEntity] {
        match self.type_ranges.get(&entity_type) {
            Some(range) => &self.entities[range.clone()],
            None => &[],
        }
    }

    /// Look up one entity by source ID, searching all types.
    pub fn find_by_source_id(&self, source_id: &str) -> Option<&IndexedEntity> {
        self.entities
            .iter()
            .find(|e| e.entity.source_id == source_id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    pub fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Business, EntityDetails, Person};
    use crate::source::SourceList;

    fn indexed(entity: Entity, canonical: &str) -> IndexedEntity {
        IndexedEntity {
            entity,
            canonical_name: canonical.to_string(),
            canonical_alt_names: Vec::new(),
        }
    }

    fn person(name: &str, id: &str) -> Entity {
        Entity::new(EntityType::Person, name, SourceList::UsOfacSdn, id)
            .with_details(EntityDetails::Person(Person::default()))
    }

    fn business(name: &str, id: &str) -> Entity {
        Entity::new(EntityType::Business, name, SourceList::UsOfacSdn, id)
            .with_details(EntityDetails::Business(Business::default()))
    }

    #[test]
    fn test_type_slices_are_contiguous() {
        let index = Index::new(
            vec![
                indexed(business("ACME", "2"), "acme"),
                indexed(person("Ivan Ivanov", "1"), "ivan ivanov"),
                indexed(business("Globex", "3"), "globex"),
            ],
            IndexStats::default(),
            Utc::now(),
        );

        assert_eq!(index.len(), 3);
        assert_eq!(index.of_type(EntityType::Person).len(), 1);
        assert_eq!(index.of_type(EntityType::Business).len(), 2);
        assert!(index.of_type(EntityType::Vessel).is_empty());

        // Sub-slices together cover the full entity slice
        let covered: usize = [EntityType::Person, EntityType::Business]
            .iter()
            .map(|t| index.of_type(*t).len())
            .sum();
        assert_eq!(covered, index.len());
    }

    #[test]
    fn test_inconsistent_records_dropped() {
        let mismatched = Entity::new(EntityType::Person, "BAD", SourceList::UsOfacSdn, "9")
            .with_details(EntityDetails::Business(Business::default()));

        let index = Index::new(
            vec![
                indexed(mismatched, "bad"),
                indexed(person("Ivan Ivanov", "1"), "ivan ivanov"),
            ],
            IndexStats::default(),
            Utc::now(),
        );

        assert_eq!(index.len(), 1);
        assert_eq!(index.entities()[0].entity.name, "Ivan Ivanov");
    }

    #[test]
    fn test_empty_canonical_dropped() {
        let index = Index::new(
            vec![indexed(person("??", "1"), "")],
            IndexStats::default(),
            Utc::now(),
        );
        assert!(index.is_empty());
    }

    #[test]
    fn test_deterministic_order() {
        let build = || {
            Index::new(
                vec![
                    indexed(person("B", "2"), "b"),
                    indexed(person("A", "1"), "a"),
                    indexed(business("C", "3"), "c"),
                ],
                IndexStats::default(),
                DateTime::<Utc>::MIN_UTC,
            )
        };
        let a = build();
        let b = build();
        let names_a: Vec<&str> = a.entities().iter().map(|e| e.entity.name.as_str()).collect();
        let names_b: Vec<&str> = b.entities().iter().map(|e| e.entity.name.as_str()).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn test_find_by_source_id() {
        let index = Index::new(
            vec![indexed(person("Ivan Ivanov", "15022"), "ivan ivanov")],
            IndexStats::default(),
            Utc::now(),
        );
        assert!(index.find_by_source_id("15022").is_some());
        assert!(index.find_by_source_id("99999").is_none());
    }
}
