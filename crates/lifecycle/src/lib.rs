//! Pool lifecycle engine.
//!
//! This crate turns a [`aelin_domain::entities::PoolSnapshot`] plus a clock
//! reading into the derived status the UI layers render:
//! - Pure state classification (Funding / WaitingForDeal / Vesting / Closed)
//! - Redemption round resolution and per-user allocation caps
//! - Vesting unlock math
//! - An event tracker that records pool history for display

/// Prelude module for convenient imports.
pub mod prelude;

/// Pure pool state classification.
pub mod classifier;
/// Lifecycle event types.
pub mod events;
/// Redemption round resolution and allocation caps.
pub mod redemption;
/// Per-pool event history.
pub mod tracker;
/// Vesting unlock math.
pub mod vesting;
