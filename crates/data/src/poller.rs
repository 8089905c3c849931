//! Polling layer with per-target last-write-wins caching.
//!
//! Status evaluation must always see the freshest snapshot for a target.
//! Two rules enforce that here:
//! - A completed fetch only lands if no later-issued fetch has landed first;
//!   slow stale responses are discarded instead of regressing the cache.
//! - The cache is keyed by target. Untracking a pool drops its entry, and
//!   any in-flight fetch for it is ignored on completion.

use crate::provider::{SnapshotError, SnapshotProvider};
use aelin_domain::entities::{PoolKey, PoolSnapshot};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Configuration for the snapshot poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Refetch interval in seconds.
    pub interval_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self { interval_secs: 15 }
    }
}

/// A snapshot the poller has applied for a target.
#[derive(Debug, Clone)]
pub struct TrackedSnapshot {
    pub snapshot: PoolSnapshot,
    /// Issue-order sequence of the fetch that produced it.
    pub seq: u64,
    /// When the fetch completed.
    pub fetched_at: DateTime<Utc>,
}

/// Polls a [`SnapshotProvider`] for tracked pools.
pub struct SnapshotPoller {
    provider: Arc<dyn SnapshotProvider>,
    config: PollerConfig,
    /// Tracked targets; `None` until the first fetch lands.
    cache: Arc<RwLock<HashMap<PoolKey, Option<TrackedSnapshot>>>>,
    next_seq: AtomicU64,
}

impl SnapshotPoller {
    pub fn new(provider: Arc<dyn SnapshotProvider>, config: PollerConfig) -> Self {
        Self {
            provider,
            config,
            cache: Arc::new(RwLock::new(HashMap::new())),
            next_seq: AtomicU64::new(1),
        }
    }

    /// Starts tracking a pool.
    pub async fn track(&self, key: PoolKey) {
        self.cache.write().await.entry(key.clone()).or_insert(None);
        debug!(pool = %key, "Tracking pool");
    }

    /// Stops tracking a pool and drops its cached snapshot. In-flight
    /// fetches for it will be ignored when they complete.
    pub async fn untrack(&self, key: &PoolKey) {
        self.cache.write().await.remove(key);
        debug!(pool = %key, "Stopped tracking pool");
    }

    /// Whether a pool is currently tracked.
    pub async fn is_tracked(&self, key: &PoolKey) -> bool {
        self.cache.read().await.contains_key(key)
    }

    /// Latest applied snapshot for a pool.
    pub async fn latest(&self, key: &PoolKey) -> Option<TrackedSnapshot> {
        self.cache.read().await.get(key).cloned().flatten()
    }

    /// Fetches the pool once and applies the result. Returns whether the
    /// fetch was applied (false: discarded as stale or untracked).
    pub async fn refresh(&self, key: &PoolKey) -> Result<bool, SnapshotError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.provider.fetch_pool(key.chain_id, &key.address).await?;
        Ok(self.apply(key, seq, snapshot).await)
    }

    /// Applies a completed fetch under the ordering rules.
    async fn apply(&self, key: &PoolKey, seq: u64, snapshot: PoolSnapshot) -> bool {
        let mut cache = self.cache.write().await;
        let Some(slot) = cache.get_mut(key) else {
            debug!(pool = %key, seq, "Discarding fetch for untracked pool");
            return false;
        };
        if let Some(applied) = slot
            && applied.seq > seq
        {
            debug!(
                pool = %key,
                seq,
                applied_seq = applied.seq,
                "Discarding stale fetch"
            );
            return false;
        }
        *slot = Some(TrackedSnapshot {
            snapshot,
            seq,
            fetched_at: Utc::now(),
        });
        true
    }

    /// Polls a tracked pool on the configured interval, invoking the
    /// callback for every applied snapshot. Returns when the pool is
    /// untracked. Fetch errors are logged and the loop keeps going.
    pub async fn watch<F>(&self, key: PoolKey, mut on_apply: F)
    where
        F: FnMut(&TrackedSnapshot),
    {
        let mut interval = tokio::time::interval(Duration::from_secs(self.config.interval_secs));
        loop {
            interval.tick().await;
            if !self.is_tracked(&key).await {
                return;
            }
            match self.refresh(&key).await {
                Ok(true) => {
                    if let Some(tracked) = self.latest(&key).await {
                        on_apply(&tracked);
                    }
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(pool = %key, error = %err, "Snapshot fetch failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aelin_domain::entities::TokenInfo;
    use async_trait::async_trait;
    use primitive_types::U256;
    use std::sync::Mutex;

    fn snapshot(contributions: u64) -> PoolSnapshot {
        PoolSnapshot::new(
            "0xpool",
            1,
            "0xsponsor",
            TokenInfo::new("0xusdc", "USDC", Some(6)),
            0,
            100,
            200,
        )
        .with_contributions(U256::from(contributions))
    }

    struct ScriptedProvider {
        results: Mutex<Vec<PoolSnapshot>>,
    }

    impl ScriptedProvider {
        fn new(results: Vec<PoolSnapshot>) -> Self {
            Self {
                results: Mutex::new(results),
            }
        }
    }

    #[async_trait]
    impl SnapshotProvider for ScriptedProvider {
        async fn fetch_pool(
            &self,
            chain_id: u64,
            address: &str,
        ) -> Result<PoolSnapshot, SnapshotError> {
            let mut results = self.results.lock().unwrap();
            if results.is_empty() {
                return Err(SnapshotError::NotFound {
                    chain_id,
                    address: address.to_string(),
                });
            }
            Ok(results.remove(0))
        }
    }

    fn poller(results: Vec<PoolSnapshot>) -> SnapshotPoller {
        SnapshotPoller::new(
            Arc::new(ScriptedProvider::new(results)),
            PollerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_refresh_applies_snapshot() {
        let p = poller(vec![snapshot(100)]);
        let key = PoolKey::new(1, "0xpool");

        p.track(key.clone()).await;
        assert!(p.latest(&key).await.is_none());

        assert!(p.refresh(&key).await.unwrap());
        let tracked = p.latest(&key).await.unwrap();
        assert_eq!(tracked.snapshot.contributions, U256::from(100u64));
    }

    #[tokio::test]
    async fn test_stale_completion_discarded() {
        let p = poller(vec![]);
        let key = PoolKey::new(1, "0xpool");
        p.track(key.clone()).await;

        // A later-issued fetch completes first...
        assert!(p.apply(&key, 5, snapshot(500)).await);
        // ...then the earlier-issued one straggles in and must not regress
        // the cache.
        assert!(!p.apply(&key, 3, snapshot(300)).await);

        let tracked = p.latest(&key).await.unwrap();
        assert_eq!(tracked.seq, 5);
        assert_eq!(tracked.snapshot.contributions, U256::from(500u64));
    }

    #[tokio::test]
    async fn test_in_order_completions_apply() {
        let p = poller(vec![]);
        let key = PoolKey::new(1, "0xpool");
        p.track(key.clone()).await;

        assert!(p.apply(&key, 1, snapshot(100)).await);
        assert!(p.apply(&key, 2, snapshot(200)).await);

        let tracked = p.latest(&key).await.unwrap();
        assert_eq!(tracked.snapshot.contributions, U256::from(200u64));
    }

    #[tokio::test]
    async fn test_untracked_target_ignores_results() {
        let p = poller(vec![]);
        let key = PoolKey::new(1, "0xpool");

        // Never tracked: the completion is dropped.
        assert!(!p.apply(&key, 1, snapshot(100)).await);
        assert!(p.latest(&key).await.is_none());

        // Tracked, applied, then untracked mid-flight.
        p.track(key.clone()).await;
        assert!(p.apply(&key, 2, snapshot(200)).await);
        p.untrack(&key).await;
        assert!(!p.apply(&key, 3, snapshot(300)).await);
        assert!(p.latest(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_targets_are_independent() {
        let p = poller(vec![]);
        let a = PoolKey::new(1, "0xaaa");
        let b = PoolKey::new(1, "0xbbb");
        p.track(a.clone()).await;
        p.track(b.clone()).await;

        assert!(p.apply(&a, 1, snapshot(111)).await);
        assert!(p.apply(&b, 2, snapshot(222)).await);
        p.untrack(&a).await;

        assert!(p.latest(&a).await.is_none());
        assert_eq!(
            p.latest(&b).await.unwrap().snapshot.contributions,
            U256::from(222u64)
        );
    }

    #[tokio::test]
    async fn test_watch_stops_when_untracked() {
        let p = Arc::new(SnapshotPoller::new(
            Arc::new(ScriptedProvider::new(vec![snapshot(100)])),
            PollerConfig { interval_secs: 1 },
        ));
        let key = PoolKey::new(1, "0xpool");
        p.track(key.clone()).await;
        p.untrack(&key).await;

        // With the target already untracked the loop exits on its first tick.
        p.watch(key, |_| {}).await;
    }
}
