//! Redemption round resolution and per-user allocation caps.
//!
//! Once a holder funds a deal, investors redeem in two rounds: a pro-rata
//! round sized by each investor's share of the pool, then an optional open
//! round for whatever allocation is left. All math clamps at zero; rounding
//! overshoot never yields a negative allocation.

use aelin_domain::entities::DealSnapshot;
use aelin_domain::enums::RedemptionStage;
use chrono::{DateTime, Utc};
use primitive_types::{U256, U512};

/// Resolves the redemption round active at `now`.
///
/// Returns `None` when redemption is closed or has not started. Stages are
/// monotonic in `now`: `ProRata` then `Open` then `None`, never backwards.
pub fn redemption_stage(deal: &DealSnapshot, now: DateTime<Utc>) -> Option<RedemptionStage> {
    let window = deal.redemption.as_ref()?;
    if now < window.pro_rata_end {
        return Some(RedemptionStage::ProRata);
    }
    match window.open_end {
        Some(open_end) if now < open_end => Some(RedemptionStage::Open),
        _ => None,
    }
}

/// Pro-rata round cap: the user's share of the deal's purchase total,
/// proportional to their pool contribution. Floor division; zero pool
/// contributions yield zero.
pub fn pro_rata_allocation(
    user_contribution: U256,
    pool_contributions: U256,
    purchase_total: U256,
) -> U256 {
    if pool_contributions.is_zero() {
        return U256::zero();
    }
    let numerator = user_contribution.full_mul(purchase_total);
    let quotient = numerator / U512::from(pool_contributions);
    U256::try_from(quotient).unwrap_or(U256::MAX)
}

/// Open round cap: the lesser of the user's remaining pool balance and the
/// deal's unclaimed allocation. Clamped at zero when accepted amounts
/// overshoot the ceiling through rounding.
pub fn open_allocation(
    user_pool_balance: U256,
    max_purchase_deal_allowed: U256,
    total_amount_accepted: U256,
) -> U256 {
    let remaining = max_purchase_deal_allowed.saturating_sub(total_amount_accepted);
    user_pool_balance.min(remaining)
}

/// Allocation left unclaimed once redemption closes; withdrawable by the
/// sponsor/holder through the withdraw-unredeemed action.
pub fn unredeemed(deal: &DealSnapshot) -> U256 {
    deal.max_purchase_deal_allowed
        .saturating_sub(deal.total_amount_accepted)
}
