//! Per-pool event history for display layers.

use crate::events::{DealRefData, EventData, PoolEvent, PoolEventType, TransferData};
use aelin_domain::entities::PoolKey;
use aelin_domain::enums::PoolState;
use chrono::{DateTime, Utc};
use primitive_types::U256;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Summary of a pool's recorded history.
#[derive(Debug, Clone)]
pub struct PoolSummary {
    /// Pool identity.
    pub pool: PoolKey,
    /// When the tracker first saw the pool.
    pub first_seen: DateTime<Utc>,
    /// Time of the most recent event.
    pub last_event_at: DateTime<Utc>,
    /// Cumulative deposits.
    pub total_deposited: U256,
    /// Cumulative withdrawals.
    pub total_withdrawn: U256,
    /// Deals presented so far.
    pub deals_presented: u32,
    /// Whether a deal ever got holder funding.
    pub deal_funded: bool,
    /// Whether the sponsor released funds.
    pub funds_released: bool,
    /// Last derived state observed.
    pub last_state: Option<PoolState>,
}

impl PoolSummary {
    fn new(pool: PoolKey, now: DateTime<Utc>) -> Self {
        Self {
            pool,
            first_seen: now,
            last_event_at: now,
            total_deposited: U256::zero(),
            total_withdrawn: U256::zero(),
            deals_presented: 0,
            deal_funded: false,
            funds_released: false,
            last_state: None,
        }
    }
}

/// Tracks lifecycle events for all watched pools.
///
/// History is append-only: events recorded after a pool closes are kept for
/// display even though they can no longer change the derived state.
pub struct PoolLifecycleTracker {
    /// Events by pool.
    events: Arc<RwLock<HashMap<PoolKey, Vec<PoolEvent>>>>,
    /// Pool summaries.
    summaries: Arc<RwLock<HashMap<PoolKey, PoolSummary>>>,
}

impl PoolLifecycleTracker {
    /// Creates a new tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(HashMap::new())),
            summaries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Records a purchaser deposit.
    pub async fn record_deposit(&self, pool: PoolKey, purchaser: &str, amount: U256) {
        let event = PoolEvent::new(
            PoolEventType::DepositAccepted,
            pool.clone(),
            EventData::Deposit(TransferData {
                purchaser: purchaser.to_string(),
                amount,
            }),
        );
        let at = event.timestamp;
        self.add_event(pool.clone(), event).await;

        let mut summaries = self.summaries.write().await;
        let summary = summaries
            .entry(pool.clone())
            .or_insert_with(|| PoolSummary::new(pool.clone(), at));
        summary.total_deposited = summary.total_deposited.saturating_add(amount);
        summary.last_event_at = at;

        debug!(pool = %pool, purchaser, amount = %amount, "Deposit recorded");
    }

    /// Records a purchaser withdrawal.
    pub async fn record_withdrawal(&self, pool: PoolKey, purchaser: &str, amount: U256) {
        let event = PoolEvent::new(
            PoolEventType::Withdrawal,
            pool.clone(),
            EventData::Withdrawal(TransferData {
                purchaser: purchaser.to_string(),
                amount,
            }),
        );
        let at = event.timestamp;
        self.add_event(pool.clone(), event).await;

        let mut summaries = self.summaries.write().await;
        let summary = summaries
            .entry(pool.clone())
            .or_insert_with(|| PoolSummary::new(pool.clone(), at));
        summary.total_withdrawn = summary.total_withdrawn.saturating_add(amount);
        summary.last_event_at = at;

        debug!(pool = %pool, purchaser, amount = %amount, "Withdrawal recorded");
    }

    /// Records a presented deal.
    pub async fn record_deal_presented(&self, pool: PoolKey, deal: &str, holder: &str) {
        let event = PoolEvent::new(
            PoolEventType::DealPresented,
            pool.clone(),
            EventData::DealPresented(DealRefData {
                deal: deal.to_string(),
                holder: holder.to_string(),
            }),
        );
        let at = event.timestamp;
        self.add_event(pool.clone(), event).await;

        let mut summaries = self.summaries.write().await;
        let summary = summaries
            .entry(pool.clone())
            .or_insert_with(|| PoolSummary::new(pool.clone(), at));
        summary.deals_presented += 1;
        summary.last_event_at = at;

        info!(pool = %pool, deal, holder, "Deal presented");
    }

    /// Records holder funding of the current deal.
    pub async fn record_deal_funded(&self, pool: PoolKey, deal: &str, holder: &str) {
        let event = PoolEvent::new(
            PoolEventType::DealFunded,
            pool.clone(),
            EventData::DealFunded(DealRefData {
                deal: deal.to_string(),
                holder: holder.to_string(),
            }),
        );
        let at = event.timestamp;
        self.add_event(pool.clone(), event).await;

        if let Some(summary) = self.summaries.write().await.get_mut(&pool) {
            summary.deal_funded = true;
            summary.last_event_at = at;
        }

        info!(pool = %pool, deal, "Deal funded by holder");
    }

    /// Records a deal voided by holder-funding lapse.
    pub async fn record_deal_voided(&self, pool: PoolKey, deal: &str, holder: &str) {
        let event = PoolEvent::new(
            PoolEventType::DealVoided,
            pool.clone(),
            EventData::DealVoided(DealRefData {
                deal: deal.to_string(),
                holder: holder.to_string(),
            }),
        );
        let at = event.timestamp;
        self.add_event(pool.clone(), event).await;

        if let Some(summary) = self.summaries.write().await.get_mut(&pool) {
            summary.last_event_at = at;
        }

        info!(pool = %pool, deal, "Deal voided, holder funding lapsed");
    }

    /// Records a redemption acceptance.
    pub async fn record_deal_accepted(&self, pool: PoolKey, purchaser: &str, amount: U256) {
        let event = PoolEvent::new(
            PoolEventType::DealAccepted,
            pool.clone(),
            EventData::DealAccepted(TransferData {
                purchaser: purchaser.to_string(),
                amount,
            }),
        );
        let at = event.timestamp;
        self.add_event(pool.clone(), event).await;

        if let Some(summary) = self.summaries.write().await.get_mut(&pool) {
            summary.last_event_at = at;
        }

        debug!(pool = %pool, purchaser, amount = %amount, "Deal acceptance recorded");
    }

    /// Records the sponsor's release of funds.
    pub async fn record_funds_released(&self, pool: PoolKey) {
        let event = PoolEvent::new(
            PoolEventType::FundsReleased,
            pool.clone(),
            EventData::FundsReleased,
        );
        let at = event.timestamp;
        self.add_event(pool.clone(), event).await;

        let mut summaries = self.summaries.write().await;
        let summary = summaries
            .entry(pool.clone())
            .or_insert_with(|| PoolSummary::new(pool.clone(), at));
        summary.funds_released = true;
        summary.last_event_at = at;

        info!(pool = %pool, "Funds released");
    }

    /// Records an observed derived state, warning on out-of-order
    /// observations (stale snapshots slipping past the polling layer).
    pub async fn record_state(&self, pool: PoolKey, state: PoolState) {
        let event = PoolEvent::new(
            PoolEventType::StateObserved,
            pool.clone(),
            EventData::StateObserved(state),
        );
        let at = event.timestamp;
        self.add_event(pool.clone(), event).await;

        let mut summaries = self.summaries.write().await;
        let summary = summaries
            .entry(pool.clone())
            .or_insert_with(|| PoolSummary::new(pool.clone(), at));

        if let Some(last) = summary.last_state {
            if last != state && !last.can_transition_to(state) {
                warn!(
                    pool = %pool,
                    from = ?last,
                    to = ?state,
                    "Observed state change violates pool lifecycle"
                );
            }
        }
        summary.last_state = Some(state);
        summary.last_event_at = at;
    }

    /// Adds an event to the tracker.
    async fn add_event(&self, pool: PoolKey, event: PoolEvent) {
        let mut events = self.events.write().await;
        events.entry(pool).or_default().push(event);
    }

    /// Gets all events for a pool.
    pub async fn get_events(&self, pool: &PoolKey) -> Vec<PoolEvent> {
        self.events.read().await.get(pool).cloned().unwrap_or_default()
    }

    /// Gets the summary for a pool.
    pub async fn get_summary(&self, pool: &PoolKey) -> Option<PoolSummary> {
        self.summaries.read().await.get(pool).cloned()
    }

    /// Gets all pool summaries.
    pub async fn get_all_summaries(&self) -> Vec<PoolSummary> {
        self.summaries.read().await.values().cloned().collect()
    }
}

impl Default for PoolLifecycleTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deposit_and_withdrawal_totals() {
        let tracker = PoolLifecycleTracker::new();
        let pool = PoolKey::new(1, "0xpool");

        tracker
            .record_deposit(pool.clone(), "0xalice", U256::from(300u64))
            .await;
        tracker
            .record_deposit(pool.clone(), "0xbob", U256::from(200u64))
            .await;
        tracker
            .record_withdrawal(pool.clone(), "0xbob", U256::from(50u64))
            .await;

        let summary = tracker.get_summary(&pool).await.unwrap();
        assert_eq!(summary.total_deposited, U256::from(500u64));
        assert_eq!(summary.total_withdrawn, U256::from(50u64));

        let events = tracker.get_events(&pool).await;
        assert_eq!(events.len(), 3);
    }

    #[tokio::test]
    async fn test_deal_lifecycle_flags() {
        let tracker = PoolLifecycleTracker::new();
        let pool = PoolKey::new(1, "0xpool");

        tracker
            .record_deal_presented(pool.clone(), "0xdeal", "0xholder")
            .await;
        let summary = tracker.get_summary(&pool).await.unwrap();
        assert_eq!(summary.deals_presented, 1);
        assert!(!summary.deal_funded);

        tracker
            .record_deal_funded(pool.clone(), "0xdeal", "0xholder")
            .await;
        let summary = tracker.get_summary(&pool).await.unwrap();
        assert!(summary.deal_funded);
    }

    #[tokio::test]
    async fn test_history_survives_closure() {
        let tracker = PoolLifecycleTracker::new();
        let pool = PoolKey::new(1, "0xpool");

        tracker.record_funds_released(pool.clone()).await;
        tracker.record_state(pool.clone(), PoolState::Closed).await;

        // Late withdrawal after close still lands in history.
        tracker
            .record_withdrawal(pool.clone(), "0xalice", U256::from(10u64))
            .await;

        let summary = tracker.get_summary(&pool).await.unwrap();
        assert!(summary.funds_released);
        assert_eq!(summary.last_state, Some(PoolState::Closed));
        assert_eq!(summary.total_withdrawn, U256::from(10u64));
        assert_eq!(tracker.get_events(&pool).await.len(), 3);
    }

    #[tokio::test]
    async fn test_state_observations() {
        let tracker = PoolLifecycleTracker::new();
        let pool = PoolKey::new(1, "0xpool");

        tracker.record_state(pool.clone(), PoolState::Funding).await;
        tracker
            .record_state(pool.clone(), PoolState::WaitingForDeal)
            .await;

        let summary = tracker.get_summary(&pool).await.unwrap();
        assert_eq!(summary.last_state, Some(PoolState::WaitingForDeal));
    }
}
