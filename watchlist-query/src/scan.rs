//! Shard scanning and deterministic top-K fan-in.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::Range;

use watchlist_core::IndexedEntity;

use crate::cancel::{CancelToken, Cancelled};
use crate::score::Matcher;

/// One scored candidate, identified by its offset in the candidate slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub offset: usize,
    pub score: f64,
}

/// Heap entry ordered so that `peek` on a reversed max-heap yields the
/// worst kept hit: lowest score first, then the larger tie-break key.
struct HeapEntry<'a> {
    score: f64,
    source: &'a str,
    source_id: &'a str,
    offset: usize,
}

impl HeapEntry<'_> {
    fn ranks_above(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| (other.source, other.source_id).cmp(&(self.source, self.source_id)))
    }
}

impl PartialEq for HeapEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.ranks_above(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry<'_> {}

impl PartialOrd for HeapEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap::peek surfaces the worst kept hit
        other.ranks_above(self)
    }
}

/// Scan one contiguous candidate range, keeping the local top-`limit` hits.
///
/// Candidates scoring 0 or strictly below `min_match` are discarded as
/// they are seen; the bounded heap keeps memory at `O(limit)` regardless
/// of shard size. The cancellation token is checked before each candidate;
/// a cancelled scan returns [`Cancelled`] and no partial results.
pub fn scan_shard(
    matcher: &Matcher,
    query: &IndexedEntity,
    candidates: &[IndexedEntity],
    range: Range<usize>,
    min_match: f64,
    limit: usize,
    cancel: &CancelToken,
) -> Result<Vec<SearchHit>, Cancelled> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let mut heap: BinaryHeap<HeapEntry<'_>> = BinaryHeap::with_capacity(limit + 1);

    for offset in range {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        let candidate = &candidates[offset];
        let score = matcher.score(query, candidate);
        if score <= 0.0 || score < min_match {
            continue;
        }

        let entry = HeapEntry {
            score,
            source: candidate.entity.source.as_str(),
            source_id: &candidate.entity.source_id,
            offset,
        };

        if heap.len() < limit {
            heap.push(entry);
        } else if let Some(worst) = heap.peek() {
            if entry.ranks_above(worst) == Ordering::Greater {
                heap.pop();
                heap.push(entry);
            }
        }
    }

    Ok(heap
        .into_iter()
        .map(|entry| SearchHit {
            offset: entry.offset,
            score: entry.score,
        })
        .collect())
}

/// Merge per-shard top-K lists into the global top-`limit`.
///
/// Ordering is deterministic: score descending, then source tag, then
/// source ID, both ascending.
pub fn merge_hits(
    shard_hits: Vec<Vec<SearchHit>>,
    candidates: &[IndexedEntity],
    limit: usize,
) -> Vec<SearchHit> {
    let mut all: Vec<SearchHit> = shard_hits.into_iter().flatten().collect();
    all.sort_by(|a, b| {
        let ea = &candidates[a.offset].entity;
        let eb = &candidates[b.offset].entity;
        b.score
            .total_cmp(&a.score)
            .then_with(|| (ea.source.as_str(), &ea.source_id).cmp(&(eb.source.as_str(), &eb.source_id)))
    });
    all.truncate(limit);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchlist_core::{Entity, EntityType, SourceList};
    use watchlist_prepare::Preparer;

    fn candidates(names: &[(&str, &str)]) -> Vec<IndexedEntity> {
        let preparer = Preparer::new();
        names
            .iter()
            .map(|(name, id)| {
                preparer
                    .prepare_entity(Entity::new(
                        EntityType::Business,
                        *name,
                        SourceList::UsOfacSdn,
                        *id,
                    ))
                    .unwrap()
            })
            .collect()
    }

    fn query(name: &str) -> IndexedEntity {
        let preparer = Preparer::new();
        let entity = Entity::new(EntityType::Business, name, SourceList::ApiRequest, "");
        let canonical_name = preparer.prepare_name(&entity.name);
        IndexedEntity {
            entity,
            canonical_name,
            canonical_alt_names: Vec::new(),
        }
    }

    #[test]
    fn test_scan_keeps_local_top_k() {
        let cands = candidates(&[
            ("Transneft", "1"),
            ("Transneft Trading", "2"),
            ("Gazprom", "3"),
            ("Transneft Logistics", "4"),
        ]);
        let q = query("transneft");
        let matcher = Matcher::new();

        let hits = scan_shard(&matcher, &q, &cands, 0..cands.len(), 0.0, 2, &CancelToken::new())
            .unwrap();

        assert_eq!(hits.len(), 2);
        // exact match must be kept
        assert!(hits.iter().any(|h| h.offset == 0 && h.score == 1.0));
    }

    #[test]
    fn test_scan_respects_min_match() {
        let cands = candidates(&[("Transneft", "1"), ("Completely Different", "2")]);
        let q = query("transneft");
        let matcher = Matcher::new();

        let hits = scan_shard(&matcher, &q, &cands, 0..cands.len(), 1.0, 10, &CancelToken::new())
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 1.0);
    }

    #[test]
    fn test_scan_cancellation_returns_no_partial_results() {
        let cands = candidates(&[("Transneft", "1"), ("Gazprom", "2")]);
        let q = query("transneft");
        let matcher = Matcher::new();

        let cancel = CancelToken::new();
        cancel.cancel();

        let result = scan_shard(&matcher, &q, &cands, 0..cands.len(), 0.0, 10, &cancel);
        assert_eq!(result, Err(Cancelled));
    }

    #[test]
    fn test_merge_orders_by_score_then_source() {
        let preparer = Preparer::new();
        let mut cands = candidates(&[("Transneft", "20"), ("Transneft", "10")]);
        // same name from a lexicographically-earlier list
        cands.push(
            preparer
                .prepare_entity(Entity::new(
                    EntityType::Business,
                    "Transneft",
                    SourceList::EuConsolidated,
                    "30",
                ))
                .unwrap(),
        );

        let hits = vec![
            vec![SearchHit { offset: 0, score: 1.0 }],
            vec![
                SearchHit { offset: 1, score: 1.0 },
                SearchHit { offset: 2, score: 1.0 },
            ],
        ];

        let merged = merge_hits(hits, &cands, 10);
        // eu_csl < us_ofac_sdn; within us_ofac_sdn, "10" < "20"
        assert_eq!(
            merged.iter().map(|h| h.offset).collect::<Vec<_>>(),
            vec![2, 1, 0]
        );
    }

    #[test]
    fn test_merge_truncates_to_limit() {
        let cands = candidates(&[("A1", "1"), ("A2", "2"), ("A3", "3")]);
        let hits = vec![vec![
            SearchHit { offset: 0, score: 0.9 },
            SearchHit { offset: 1, score: 0.8 },
            SearchHit { offset: 2, score: 0.7 },
        ]];

        let merged = merge_hits(hits, &cands, 2);
        assert_eq!(merged.len(), 2);
        assert!(merged[0].score >= merged[1].score);
    }

    #[test]
    fn test_scores_monotone_non_increasing() {
        let cands = candidates(&[
            ("Transneft", "1"),
            ("Transneft Trading", "2"),
            ("Transnef", "3"),
            ("Gazprom Neft", "4"),
        ]);
        let q = query("transneft");
        let matcher = Matcher::new();

        let hits = scan_shard(&matcher, &q, &cands, 0..cands.len(), 0.0, 10, &CancelToken::new())
            .unwrap();
        let merged = merge_hits(vec![hits], &cands, 10);

        for pair in merged.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
