//! Pure derived-number views over a pool snapshot.
//!
//! Every function here is total: bad or missing snapshot data degrades to a
//! zero value or a sentinel string, never a panic. These run on every status
//! evaluation, so availability wins over strictness.

use crate::entities::PoolSnapshot;
use crate::value_objects::{Amount, Percentage};
use chrono::{DateTime, Utc};
use primitive_types::U256;

/// A raw on-chain value paired with its display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountView {
    pub raw: U256,
    pub formatted: String,
}

/// Display form of an uncapped pool's cap.
pub const UNLIMITED: &str = "unlimited";

fn timestamp_to_date(secs: u64) -> DateTime<Utc> {
    let secs = secs.min(i64::MAX as u64) as i64;
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// When the pool was created.
pub fn pool_created_date(pool: &PoolSnapshot) -> DateTime<Utc> {
    timestamp_to_date(pool.timestamp)
}

/// End of the funding window: `created + purchase_duration`.
pub fn purchase_expiry(pool: &PoolSnapshot) -> DateTime<Utc> {
    timestamp_to_date(pool.timestamp.saturating_add(pool.purchase_duration))
}

/// Last instant the sponsor can present a deal:
/// `created + purchase_duration + duration`.
pub fn deal_deadline(pool: &PoolSnapshot) -> DateTime<Utc> {
    timestamp_to_date(
        pool.timestamp
            .saturating_add(pool.purchase_duration)
            .saturating_add(pool.duration),
    )
}

/// Cap on total deposits. Zero raw means uncapped and formats as
/// [`UNLIMITED`], never as "0 tokens".
pub fn purchase_token_cap(pool: &PoolSnapshot) -> AmountView {
    if pool.purchase_token_cap.is_zero() {
        return AmountView {
            raw: U256::zero(),
            formatted: UNLIMITED.to_string(),
        };
    }
    scaled(pool, pool.purchase_token_cap)
}

/// Sponsor fee as a two-decimal percentage.
pub fn sponsor_fee(pool: &PoolSnapshot) -> AmountView {
    AmountView {
        raw: pool.sponsor_fee,
        formatted: Percentage::from_fee_rate(pool.sponsor_fee).formatted(),
    }
}

/// Investment tokens currently held by the pool.
pub fn amount_in_pool(pool: &PoolSnapshot) -> AmountView {
    scaled(pool, pool.total_supply)
}

/// Cumulative investment tokens contributed by purchasers.
pub fn amount_funded(pool: &PoolSnapshot) -> AmountView {
    scaled(pool, pool.contributions)
}

/// Cumulative investment tokens withdrawn by purchasers.
pub fn amount_withdrawn(pool: &PoolSnapshot) -> AmountView {
    scaled(pool, pool.total_withdrawn)
}

fn scaled(pool: &PoolSnapshot, raw: U256) -> AmountView {
    let amount = Amount::new(raw, pool.purchase_token.decimals_or_zero());
    AmountView {
        raw,
        formatted: amount.formatted(),
    }
}
