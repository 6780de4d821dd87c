//! Query orchestration: snapshot capture, partitioned fan-out, fan-in.

use std::sync::Arc;

use tokio::sync::Semaphore;

use watchlist_core::{partition, EntityType, IndexedEntity};
use watchlist_query::{merge_hits, scan_shard, CancelToken, Matcher, ScoreWeights};
use watchlist_search_protocol::{SearchOpts, SearchedEntity, HARD_LIMIT};

use crate::error::{Result, ServiceError};
use crate::snapshot::SnapshotHandle;

/// Worker-pool configuration.
#[derive(Debug, Clone, Copy)]
pub struct SearcherConfig {
    /// Total in-flight shard scans across all queries. One process-wide
    /// semaphore enforces this, so burst load degrades to queueing.
    pub max_workers: usize,
    /// Shards per query. Small relative to `max_workers` so no single
    /// query starves others.
    pub per_query_parallelism: usize,
    /// Scoring weights.
    pub weights: ScoreWeights,
}

impl Default for SearcherConfig {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            max_workers: 1024,
            per_query_parallelism: cpus.min(8),
            weights: ScoreWeights::default(),
        }
    }
}

impl SearcherConfig {
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }
}

/// Executes queries against the current snapshot.
pub struct Searcher {
    handle: Arc<SnapshotHandle>,
    matcher: Matcher,
    workers: Arc<Semaphore>,
    per_query: usize,
}

impl Searcher {
    pub fn new(handle: Arc<SnapshotHandle>, config: SearcherConfig) -> Self {
        Self {
            handle,
            matcher: Matcher::with_weights(config.weights),
            workers: Arc::new(Semaphore::new(config.max_workers.max(1))),
            per_query: config.per_query_parallelism.max(1),
        }
    }

    /// Run one query.
    ///
    /// The snapshot handle is read exactly once, here; every subsequent
    /// step uses that capture, so a refresh completing mid-query cannot
    /// change this query's result. The returned list is sorted by
    /// descending score (deterministic tie-break), holds at most
    /// `opts.limit` entries, and every score is at least `opts.min_match`.
    ///
    /// Cancellation (including HTTP timeouts, which cancel this token)
    /// yields [`ServiceError::Cancelled`] and no partial results.
    pub async fn search(
        &self,
        query: IndexedEntity,
        opts: SearchOpts,
        cancel: CancelToken,
    ) -> Result<Vec<SearchedEntity>> {
        let snapshot = self.handle.load();
        let query = Arc::new(query);
        let limit = opts.limit.clamp(1, HARD_LIMIT);
        let min_match = opts.min_match.clamp(0.0, 1.0);

        let total = candidates_of(&snapshot, query.entity.entity_type).len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let groups = self.per_query.min(total);
        let bounds = partition(total, groups);

        let mut tasks = Vec::with_capacity(bounds.len() - 1);
        for window in bounds.windows(2) {
            let (start, end) = (window[0], window[1]);
            if start == end {
                continue;
            }

            let permit = Arc::clone(&self.workers)
                .acquire_owned()
                .await
                .map_err(|e| ServiceError::Internal {
                    message: format!("worker pool closed: {e}"),
                })?;
            let snapshot = Arc::clone(&snapshot);
            let query = Arc::clone(&query);
            let matcher = self.matcher;
            let cancel = cancel.clone();

            tasks.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let candidates = candidates_of(&snapshot, query.entity.entity_type);
                scan_shard(
                    &matcher,
                    &query,
                    candidates,
                    start..end,
                    min_match,
                    limit,
                    &cancel,
                )
            }));
        }

        let mut shard_hits = Vec::with_capacity(tasks.len());
        let mut cancelled = false;
        for task in tasks {
            match task.await {
                Ok(Ok(hits)) => shard_hits.push(hits),
                Ok(Err(_)) => cancelled = true,
                Err(e) => {
                    return Err(ServiceError::Internal {
                        message: format!("search worker panicked: {e}"),
                    })
                }
            }
        }
        if cancelled {
            return Err(ServiceError::Cancelled);
        }

        let candidates = candidates_of(&snapshot, query.entity.entity_type);
        let merged = merge_hits(shard_hits, candidates, limit);

        Ok(merged
            .into_iter()
            .map(|hit| SearchedEntity::new(candidates[hit.offset].entity.clone(), hit.score))
            .collect())
    }
}

/// Candidate selection: the type sub-slice for a typed query, the full
/// entity slice otherwise.
fn candidates_of(snapshot: &watchlist_core::Index, query_type: EntityType) -> &[IndexedEntity] {
    match query_type {
        EntityType::Unknown => snapshot.entities(),
        typed => snapshot.of_type(typed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use watchlist_core::{Business, Entity, EntityDetails, Index, IndexStats, Person, SourceList};
    use watchlist_prepare::Preparer;

    fn details_for(entity_type: EntityType) -> EntityDetails {
        match entity_type {
            EntityType::Business => EntityDetails::Business(Business::default()),
            EntityType::Person => EntityDetails::Person(Person::default()),
            _ => EntityDetails::Unknown,
        }
    }

    fn indexed(entity_type: EntityType, name: &str, id: &str) -> IndexedEntity {
        Preparer::new()
            .prepare_entity(
                Entity::new(entity_type, name, SourceList::UsOfacSdn, id)
                    .with_details(details_for(entity_type)),
            )
            .unwrap()
    }

    fn query(entity_type: EntityType, name: &str) -> IndexedEntity {
        let preparer = Preparer::new();
        let entity = Entity::new(entity_type, name, SourceList::ApiRequest, "");
        let canonical_name = preparer.prepare_name(&entity.name);
        IndexedEntity {
            entity,
            canonical_name,
            canonical_alt_names: Vec::new(),
        }
    }

    fn test_index() -> Arc<Index> {
        Arc::new(Index::new(
            vec![
                indexed(EntityType::Business, "AK TRANSNEFT OAO", "17254"),
                indexed(EntityType::Business, "GAZPROM NEFT", "2"),
                indexed(EntityType::Business, "TRANSNEFT LOGISTICS", "3"),
                indexed(EntityType::Person, "IVAN IVANOV", "4"),
                indexed(EntityType::Person, "TRANSNEFT PERSON", "5"),
            ],
            IndexStats::default(),
            Utc::now(),
        ))
    }

    fn searcher(handle: Arc<SnapshotHandle>) -> Searcher {
        Searcher::new(
            handle,
            SearcherConfig {
                max_workers: 4,
                per_query_parallelism: 2,
                weights: ScoreWeights::default(),
            },
        )
    }

    #[tokio::test]
    async fn test_typed_search_uses_type_slice() {
        let handle = Arc::new(SnapshotHandle::with_index(test_index()));
        let results = searcher(handle)
            .search(
                query(EntityType::Business, "transneft"),
                SearchOpts::default(),
                CancelToken::new(),
            )
            .await
            .unwrap();

        assert!(!results.is_empty());
        // only businesses are considered; the similarly-named person is gated out
        assert!(results
            .iter()
            .all(|r| r.entity.entity_type == EntityType::Business));
        let transneft = results
            .iter()
            .find(|r| r.entity.name == "AK TRANSNEFT OAO")
            .expect("AK TRANSNEFT OAO in results");
        assert!(transneft.match_score >= 0.75);
    }

    #[tokio::test]
    async fn test_untyped_search_considers_all() {
        let handle = Arc::new(SnapshotHandle::with_index(test_index()));
        let results = searcher(handle)
            .search(
                query(EntityType::Unknown, "transneft person"),
                SearchOpts::default(),
                CancelToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(results[0].entity.name, "TRANSNEFT PERSON");
    }

    #[tokio::test]
    async fn test_limit_and_ordering() {
        let handle = Arc::new(SnapshotHandle::with_index(test_index()));
        let results = searcher(handle)
            .search(
                query(EntityType::Business, "transneft"),
                SearchOpts {
                    limit: 2,
                    min_match: 0.0,
                },
                CancelToken::new(),
            )
            .await
            .unwrap();

        assert!(results.len() <= 2);
        for pair in results.windows(2) {
            assert!(pair[0].match_score >= pair[1].match_score);
        }
    }

    #[tokio::test]
    async fn test_min_match_filters() {
        let handle = Arc::new(SnapshotHandle::with_index(test_index()));
        let results = searcher(handle)
            .search(
                query(EntityType::Business, "transneft"),
                SearchOpts {
                    limit: 10,
                    min_match: 1.0,
                },
                CancelToken::new(),
            )
            .await
            .unwrap();

        // no exact canonical match in the index
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_search_returns_no_partial_results() {
        let handle = Arc::new(SnapshotHandle::with_index(test_index()));
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = searcher(handle)
            .search(
                query(EntityType::Business, "transneft"),
                SearchOpts::default(),
                cancel,
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Cancelled)));
    }

    #[tokio::test]
    async fn test_empty_candidate_set() {
        let handle = Arc::new(SnapshotHandle::with_index(test_index()));
        let results = searcher(handle)
            .search(
                query(EntityType::Vessel, "chem pluto"),
                SearchOpts::default(),
                CancelToken::new(),
            )
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_identical_queries_identical_results() {
        let handle = Arc::new(SnapshotHandle::with_index(test_index()));
        let searcher = searcher(handle);

        let run = || async {
            searcher
                .search(
                    query(EntityType::Business, "transneft"),
                    SearchOpts::default(),
                    CancelToken::new(),
                )
                .await
                .unwrap()
        };

        let first = run().await;
        let second = run().await;

        let names = |rs: &[SearchedEntity]| {
            rs.iter()
                .map(|r| (r.entity.source_id.clone(), r.match_score))
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&first), names(&second));
    }

    #[tokio::test]
    async fn test_snapshot_isolation_mid_query() {
        let handle = Arc::new(SnapshotHandle::with_index(test_index()));
        let searcher = Arc::new(searcher(Arc::clone(&handle)));

        // Start a query, then swap the index before more queries run.
        let before = searcher
            .search(
                query(EntityType::Business, "transneft"),
                SearchOpts::default(),
                CancelToken::new(),
            )
            .await
            .unwrap();

        handle.store(Arc::new(Index::new(
            vec![indexed(EntityType::Business, "BRAND NEW CO LTD", "99")],
            IndexStats::default(),
            Utc::now(),
        )));

        let after = searcher
            .search(
                query(EntityType::Business, "brand new"),
                SearchOpts::default(),
                CancelToken::new(),
            )
            .await
            .unwrap();

        // Each result is consistent with exactly one index version
        assert!(before.iter().all(|r| r.entity.name != "BRAND NEW CO LTD"));
        assert!(after.iter().all(|r| r.entity.name == "BRAND NEW CO LTD"));
    }
}
