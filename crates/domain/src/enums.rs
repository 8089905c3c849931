use serde::{Deserialize, Serialize};

/// Discrete lifecycle state of a fundraising pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolState {
    /// Accepting purchaser deposits until the purchase window expires.
    Funding,
    /// Funding ended; the sponsor may present a deal, or a presented deal is
    /// working through holder funding and redemption.
    WaitingForDeal,
    /// A funded deal's redemption windows have elapsed; accepted tokens
    /// unlock on the vesting schedule.
    Vesting,
    /// Terminal. Sponsor released funds, or the deal deadline lapsed.
    Closed,
}

impl PoolState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PoolState::Closed)
    }

    /// Whether purchaser deposits are accepted in this state.
    pub fn allows_deposits(&self) -> bool {
        matches!(self, PoolState::Funding)
    }

    /// Validates an observed state change against the one-way lifecycle.
    ///
    /// The classifier never consults this; it exists for observers that watch
    /// a pool over time and want to flag out-of-order snapshots.
    pub fn can_transition_to(&self, next: PoolState) -> bool {
        match (self, next) {
            (PoolState::Funding, PoolState::WaitingForDeal) => true,
            // Deal re-attempts keep the pool waiting
            (PoolState::WaitingForDeal, PoolState::WaitingForDeal) => true,
            (PoolState::WaitingForDeal, PoolState::Vesting) => true,
            // Sponsor release or deadline lapse can close from anywhere
            (state, PoolState::Closed) => !state.is_terminal(),
            _ => false,
        }
    }
}

/// Redemption round an investor currently faces. `None` means redemption is
/// over (or never started).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RedemptionStage {
    /// First round: allocation proportional to pool contribution.
    ProRata,
    /// Second round: leftover allocation, first come first served.
    Open,
}
