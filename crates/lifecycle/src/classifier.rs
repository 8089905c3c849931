//! Pure pool state classification.
//!
//! [`classify`] maps a snapshot plus a clock reading to exactly one
//! [`DerivedStatus`]. It is a pure function: no stored transition history, no
//! side effects, and the same `(snapshot, now)` pair always yields the same
//! status. Callers re-evaluate whenever fresh data or a new clock reading
//! arrives.

use aelin_domain::derived;
use aelin_domain::entities::{PoolSnapshot, VestingSchedule};
use aelin_domain::enums::PoolState;
use aelin_domain::value_objects::Amount;
use chrono::{DateTime, Utc};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How many deals a sponsor may present before the pool is done trying.
pub const MAX_DEAL_ATTEMPTS: u32 = 5;

/// State-specific metadata attached to a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusMeta {
    Funding {
        /// Cap sentinel: zero cap means deposits are unbounded.
        is_uncapped: bool,
        /// Cap exists and contributions have reached it.
        cap_reached: bool,
        /// Room left for deposits; `U256::MAX` when uncapped.
        max_deposit_allowed: Amount,
    },
    WaitingForDeal {
        /// A live deal is attached. A voided deal reports `false` so the
        /// sponsor can re-attempt.
        deal_presented: bool,
        attempts_remaining: u32,
    },
    Vesting {
        schedule: VestingSchedule,
        /// Vesting clock starts when redemption fully ends.
        vesting_start: DateTime<Utc>,
    },
    Closed,
}

/// Ephemeral derived status; recomputed on every evaluation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStatus {
    pub state: PoolState,
    pub meta: StatusMeta,
}

impl DerivedStatus {
    fn closed() -> Self {
        Self {
            state: PoolState::Closed,
            meta: StatusMeta::Closed,
        }
    }
}

/// Classifies a pool snapshot at `now`.
///
/// Never panics: missing deal data reads as "no deal presented" and corrupted
/// window ordering degrades to `Closed`, the safest terminal state.
pub fn classify(pool: &PoolSnapshot, now: DateTime<Utc>) -> DerivedStatus {
    let created = derived::pool_created_date(pool);
    let purchase_expiry = derived::purchase_expiry(pool);
    let deal_deadline = derived::deal_deadline(pool);

    if created > purchase_expiry || purchase_expiry > deal_deadline {
        debug_assert!(false, "pool window ordering violated");
        warn!(pool = %pool.address, "pool window ordering violated, treating as closed");
        return DerivedStatus::closed();
    }

    // Sponsor release is a one-way door regardless of the clock.
    if pool.funds_released {
        return DerivedStatus::closed();
    }

    // Funding holds strictly before expiry; the boundary instant itself is
    // already WaitingForDeal.
    if now < purchase_expiry {
        return funding_status(pool);
    }

    let attempts_remaining = MAX_DEAL_ATTEMPTS.saturating_sub(pool.deals_created);

    match &pool.deal {
        Some(deal) if deal.holder_funded => match &deal.redemption {
            Some(window) if now >= window.final_end() => DerivedStatus {
                state: PoolState::Vesting,
                meta: StatusMeta::Vesting {
                    schedule: deal.vesting,
                    vesting_start: window.final_end(),
                },
            },
            // Redemption rounds in progress, or the indexer has not surfaced
            // the window yet; either way the deal is live.
            _ => DerivedStatus {
                state: PoolState::WaitingForDeal,
                meta: StatusMeta::WaitingForDeal {
                    deal_presented: true,
                    attempts_remaining,
                },
            },
        },
        Some(deal) if now < deal.holder_funding_expiry => DerivedStatus {
            state: PoolState::WaitingForDeal,
            meta: StatusMeta::WaitingForDeal {
                deal_presented: true,
                attempts_remaining,
            },
        },
        Some(_) => {
            // Holder funding lapsed: the deal is void and the sponsor may
            // try again while attempts remain.
            if attempts_remaining == 0 && now >= deal_deadline {
                DerivedStatus::closed()
            } else {
                DerivedStatus {
                    state: PoolState::WaitingForDeal,
                    meta: StatusMeta::WaitingForDeal {
                        deal_presented: false,
                        attempts_remaining,
                    },
                }
            }
        }
        None => {
            if now >= deal_deadline {
                DerivedStatus::closed()
            } else {
                DerivedStatus {
                    state: PoolState::WaitingForDeal,
                    meta: StatusMeta::WaitingForDeal {
                        deal_presented: false,
                        attempts_remaining,
                    },
                }
            }
        }
    }
}

fn funding_status(pool: &PoolSnapshot) -> DerivedStatus {
    let decimals = pool.purchase_token.decimals_or_zero();
    let cap = pool.purchase_token_cap;
    let is_uncapped = cap.is_zero();
    let cap_reached = !is_uncapped && pool.contributions >= cap;
    let max_deposit_allowed = if is_uncapped {
        Amount::new(U256::MAX, decimals)
    } else {
        Amount::new(cap.saturating_sub(pool.contributions), decimals)
    };

    DerivedStatus {
        state: PoolState::Funding,
        meta: StatusMeta::Funding {
            is_uncapped,
            cap_reached,
            max_deposit_allowed,
        },
    }
}
