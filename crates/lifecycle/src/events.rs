//! Lifecycle events observed on a pool.
//!
//! These are display/history records, not inputs to classification: the
//! classifier works from snapshots alone. A Closed pool keeps accumulating
//! history (late withdraw events still show up in the UI).

use aelin_domain::entities::PoolKey;
use aelin_domain::enums::PoolState;
use chrono::{DateTime, Utc};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Type of pool lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEventType {
    /// A purchaser deposited investment tokens.
    DepositAccepted,
    /// A purchaser withdrew investment tokens.
    Withdrawal,
    /// The sponsor presented a deal.
    DealPresented,
    /// The holder funded the presented deal.
    DealFunded,
    /// Holder funding lapsed; the deal is void.
    DealVoided,
    /// A purchaser accepted deal allocation during redemption.
    DealAccepted,
    /// The sponsor released funds, closing the pool.
    FundsReleased,
    /// A derived state was observed for the pool.
    StateObserved,
}

/// A lifecycle event for a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolEvent {
    /// Event ID.
    pub id: String,
    /// Event type.
    pub event_type: PoolEventType,
    /// Pool the event belongs to.
    pub pool: PoolKey,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Event-specific data.
    pub data: EventData,
}

impl PoolEvent {
    /// Creates a new event stamped with the current time.
    pub fn new(event_type: PoolEventType, pool: PoolKey, data: EventData) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            pool,
            timestamp: Utc::now(),
            data,
        }
    }

    /// Backdates the event to a chain-reported time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Event-specific data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventData {
    /// Deposit data.
    Deposit(TransferData),
    /// Withdrawal data.
    Withdrawal(TransferData),
    /// Deal presented data.
    DealPresented(DealRefData),
    /// Deal funded data.
    DealFunded(DealRefData),
    /// Deal voided data.
    DealVoided(DealRefData),
    /// Redemption acceptance data.
    DealAccepted(TransferData),
    /// Funds released by the sponsor.
    FundsReleased,
    /// Observed derived state.
    StateObserved(PoolState),
}

/// Data for purchaser-side token movements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferData {
    /// Purchaser address.
    pub purchaser: String,
    /// Raw token amount.
    pub amount: U256,
}

/// Data referencing a deal contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealRefData {
    /// Deal contract address.
    pub deal: String,
    /// Counterparty holder address.
    pub holder: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = PoolEvent::new(
            PoolEventType::DepositAccepted,
            PoolKey::new(1, "0xpool"),
            EventData::Deposit(TransferData {
                purchaser: "0xalice".to_string(),
                amount: U256::from(100u64),
            }),
        );

        assert_eq!(event.event_type, PoolEventType::DepositAccepted);
        assert_eq!(event.pool, PoolKey::new(1, "0xpool"));
        assert!(!event.id.is_empty());
    }

    #[test]
    fn test_backdating() {
        let chain_time = DateTime::<Utc>::from_timestamp(1_600_000_000, 0).unwrap();
        let event = PoolEvent::new(
            PoolEventType::FundsReleased,
            PoolKey::new(1, "0xpool"),
            EventData::FundsReleased,
        )
        .with_timestamp(chain_time);

        assert_eq!(event.timestamp, chain_time);
    }
}
