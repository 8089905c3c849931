//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use aelin_lifecycle::prelude::*;
//! ```

// Classifier
pub use crate::classifier::{DerivedStatus, MAX_DEAL_ATTEMPTS, StatusMeta, classify};

// Events
pub use crate::events::{DealRefData, EventData, PoolEvent, PoolEventType, TransferData};

// Redemption
pub use crate::redemption::{open_allocation, pro_rata_allocation, redemption_stage, unredeemed};

// Tracker
pub use crate::tracker::{PoolLifecycleTracker, PoolSummary};

// Vesting
pub use crate::vesting::{unvested_amount, vested_amount};

// Domain re-exports used by nearly every caller
pub use aelin_domain::entities::{
    DealSnapshot, PoolKey, PoolSnapshot, RedemptionWindow, TokenInfo, VestingSchedule,
};
pub use aelin_domain::enums::{PoolState, RedemptionStage};
