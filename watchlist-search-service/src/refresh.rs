//! The refresh subsystem.
//!
//! One refresh runs at a time. A timer triggers one every
//! `RefreshInterval`; the admin endpoint triggers one manually.
//! Overlapping triggers coalesce: a caller that finds a refresh in
//! progress waits for it and returns its outcome instead of starting
//! another.
//!
//! A refresh that fails at any stage leaves the previously-installed
//! index in place and records the failure; the next trigger retries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use watchlist_core::{Index, IndexStats, IndexedEntity};
use watchlist_ingest::{group_entities, IngestError, ListFetcher};
use watchlist_prepare::Preparer;

use crate::error::{Result, ServiceError};
use crate::snapshot::SnapshotHandle;

/// Outcome of one refresh, published on the stats channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshStats {
    #[serde(flatten)]
    pub stats: IndexStats,
    /// Entities that survived preparation and index assembly.
    pub indexed_entities: u64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Refresh pipeline state, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Fetching,
    Parsing,
    Preparing,
    Publishing,
}

impl RefreshPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshPhase::Idle => "idle",
            RefreshPhase::Fetching => "fetching",
            RefreshPhase::Parsing => "parsing",
            RefreshPhase::Preparing => "preparing",
            RefreshPhase::Publishing => "publishing",
        }
    }
}

/// Rebuilds and atomically installs index snapshots.
pub struct Refresher {
    fetcher: Arc<dyn ListFetcher>,
    preparer: Preparer,
    handle: Arc<SnapshotHandle>,
    updates: Option<mpsc::Sender<RefreshStats>>,
    run_lock: tokio::sync::Mutex<()>,
    generation: AtomicU64,
    last: parking_lot::RwLock<Option<RefreshStats>>,
    phase: parking_lot::RwLock<RefreshPhase>,
}

impl Refresher {
    pub fn new(fetcher: Arc<dyn ListFetcher>, handle: Arc<SnapshotHandle>) -> Self {
        Self {
            fetcher,
            preparer: Preparer::new(),
            handle,
            updates: None,
            run_lock: tokio::sync::Mutex::new(()),
            generation: AtomicU64::new(0),
            last: parking_lot::RwLock::new(None),
            phase: parking_lot::RwLock::new(RefreshPhase::Idle),
        }
    }

    /// Publish each refresh outcome to `updates`. The send is
    /// non-blocking; if nothing is listening the message is dropped.
    pub fn with_updates(mut self, updates: mpsc::Sender<RefreshStats>) -> Self {
        self.updates = Some(updates);
        self
    }

    /// Current pipeline phase.
    pub fn phase(&self) -> RefreshPhase {
        *self.phase.read()
    }

    /// The outcome of the most recent refresh, if any has completed.
    pub fn last_outcome(&self) -> Option<RefreshStats> {
        self.last.read().clone()
    }

    /// Run one refresh, or join the one in progress.
    ///
    /// At most one refresh executes at a time. A caller that waited on an
    /// in-progress refresh observes that refresh's outcome rather than
    /// starting its own.
    pub async fn refresh(&self) -> Result<RefreshStats> {
        let observed = self.generation.load(Ordering::SeqCst);
        let _guard = self.run_lock.lock().await;

        if self.generation.load(Ordering::SeqCst) != observed {
            if let Some(last) = self.last_outcome() {
                tracing::debug!("refresh trigger coalesced with completed run");
                return match &last.error {
                    None => Ok(last),
                    Some(message) => Err(ServiceError::RefreshFetch {
                        message: message.clone(),
                    }),
                };
            }
        }

        let started_at = Utc::now();
        let result = self.run(started_at).await;
        self.set_phase(RefreshPhase::Idle);

        let outcome = match &result {
            Ok(stats) => stats.clone(),
            Err(e) => {
                tracing::error!(error = %e, "refresh failed; previous index retained");
                RefreshStats {
                    stats: IndexStats::default(),
                    indexed_entities: 0,
                    started_at,
                    ended_at: Utc::now(),
                    error: Some(e.to_string()),
                }
            }
        };

        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.last.write() = Some(outcome.clone());
        if let Some(updates) = &self.updates {
            let _ = updates.try_send(outcome);
        }

        result
    }

    async fn run(&self, started_at: DateTime<Utc>) -> Result<RefreshStats> {
        self.set_phase(RefreshPhase::Fetching);
        let raw = self.fetcher.fetch().await.map_err(|e| match e {
            IngestError::Decode { .. } => ServiceError::RefreshParse {
                message: e.to_string(),
            },
            other => ServiceError::RefreshFetch {
                message: other.to_string(),
            },
        })?;

        self.set_phase(RefreshPhase::Parsing);
        let (entities, stats) = group_entities(&raw);

        self.set_phase(RefreshPhase::Preparing);
        let indexed: Vec<IndexedEntity> = entities
            .into_iter()
            .filter_map(|entity| self.preparer.prepare_entity(entity))
            .collect();

        self.set_phase(RefreshPhase::Publishing);
        let index = Index::new(indexed, stats, Utc::now());
        let indexed_entities = index.len() as u64;
        self.handle.store(Arc::new(index));

        tracing::info!(
            entities = indexed_entities,
            sdns = stats.sdns,
            total = stats.total_entities(),
            "index refreshed"
        );

        Ok(RefreshStats {
            stats,
            indexed_entities,
            started_at,
            ended_at: Utc::now(),
            error: None,
        })
    }

    fn set_phase(&self, phase: RefreshPhase) {
        tracing::debug!(phase = phase.as_str(), "refresh phase");
        *self.phase.write() = phase;
    }

    /// Refresh on a fixed interval until the process exits.
    ///
    /// The startup refresh has already run by the time this starts, so
    /// the first tick fires one interval from now. Failures are logged
    /// and retried at the next tick.
    pub async fn run_periodic(self: Arc<Self>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await; // interval's first tick is immediate

        loop {
            ticker.tick().await;
            if let Err(e) = self.refresh().await {
                tracing::error!(error = %e, "scheduled refresh failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use watchlist_ingest::{RawLists, SdnRecord};

    /// Fetcher that counts invocations and can be told to fail.
    struct MockFetcher {
        calls: AtomicUsize,
        fail: std::sync::atomic::AtomicBool,
        delay: Duration,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: std::sync::atomic::AtomicBool::new(false),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ListFetcher for MockFetcher {
        async fn fetch(&self) -> watchlist_ingest::Result<RawLists> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(IngestError::DataDirectory {
                    path: "/missing".into(),
                    message: "gone".into(),
                });
            }
            Ok(RawLists {
                sdns: vec![SdnRecord {
                    entity_id: "15022".into(),
                    name: "IVAN IVANOV".into(),
                    sdn_type: "individual".into(),
                    ..SdnRecord::default()
                }],
                ..RawLists::default()
            })
        }
    }

    #[tokio::test]
    async fn test_refresh_installs_index() {
        let handle = Arc::new(SnapshotHandle::new());
        let refresher = Refresher::new(Arc::new(MockFetcher::new()), Arc::clone(&handle));

        let stats = refresher.refresh().await.unwrap();

        assert_eq!(stats.stats.sdns, 1);
        assert_eq!(stats.indexed_entities, 1);
        assert!(stats.error.is_none());
        assert_eq!(handle.load().len(), 1);
        assert_eq!(refresher.phase(), RefreshPhase::Idle);
    }

    #[tokio::test]
    async fn test_failed_refresh_retains_previous_index() {
        let handle = Arc::new(SnapshotHandle::new());
        let fetcher = Arc::new(MockFetcher::new());
        let refresher = Refresher::new(Arc::clone(&fetcher) as Arc<dyn ListFetcher>, Arc::clone(&handle));

        refresher.refresh().await.unwrap();
        let before = handle.load();

        fetcher.fail.store(true, Ordering::SeqCst);
        let err = refresher.refresh().await.unwrap_err();
        assert!(matches!(err, ServiceError::RefreshFetch { .. }));

        // previous index untouched, failure recorded
        assert!(Arc::ptr_eq(&before, &handle.load()));
        assert!(refresher.last_outcome().unwrap().error.is_some());
        assert_eq!(refresher.phase(), RefreshPhase::Idle);
    }

    #[tokio::test]
    async fn test_overlapping_triggers_coalesce() {
        let handle = Arc::new(SnapshotHandle::new());
        let fetcher = Arc::new(MockFetcher::with_delay(Duration::from_millis(50)));
        let refresher = Arc::new(Refresher::new(
            Arc::clone(&fetcher) as Arc<dyn ListFetcher>,
            handle,
        ));

        let triggers: Vec<_> = (0..4)
            .map(|_| {
                let refresher = Arc::clone(&refresher);
                tokio::spawn(async move { refresher.refresh().await })
            })
            .collect();

        for trigger in triggers {
            trigger.await.unwrap().unwrap();
        }

        // the three overlapping triggers observed the in-progress run
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_stats_channel_is_non_blocking() {
        let handle = Arc::new(SnapshotHandle::new());
        let (tx, mut rx) = mpsc::channel(1);
        let refresher =
            Refresher::new(Arc::new(MockFetcher::new()), handle).with_updates(tx);

        refresher.refresh().await.unwrap();
        assert!(rx.recv().await.unwrap().error.is_none());

        // fill the channel; further refreshes must not block on the send
        refresher.refresh().await.unwrap();
        refresher.refresh().await.unwrap();
    }
}
