//! Vesting unlock math.
//!
//! Accepted deal tokens unlock after a cliff, then linearly across the
//! vesting period. The curve is a pure function of the schedule, the total,
//! the vesting start, and the clock.

use aelin_domain::entities::VestingSchedule;
use chrono::{DateTime, Utc};
use primitive_types::{U256, U512};

/// Deal tokens unlocked at `now` for a vesting position of `total` that
/// started vesting at `start`.
///
/// Zero before the cliff; linear interpolation across the vesting period; the
/// full amount once it has elapsed. A zero-length linear period unlocks
/// everything at the cliff.
pub fn vested_amount(
    schedule: &VestingSchedule,
    total: U256,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> U256 {
    let cliff_end = start
        .checked_add_signed(schedule.cliff())
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    if now < cliff_end {
        return U256::zero();
    }
    if schedule.linear_secs == 0 {
        return total;
    }

    let elapsed = (now - cliff_end).num_seconds().max(0) as u64;
    if elapsed >= schedule.linear_secs {
        return total;
    }

    // total * elapsed / linear, widened to avoid overflow
    let numerator = total.full_mul(U256::from(elapsed));
    let quotient = numerator / U512::from(schedule.linear_secs);
    U256::try_from(quotient).unwrap_or(U256::MAX)
}

/// Deal tokens still locked at `now`.
pub fn unvested_amount(
    schedule: &VestingSchedule,
    total: U256,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> U256 {
    total.saturating_sub(vested_amount(schedule, total, start, now))
}
