//! Domain model for Aelin fundraising pools.
//!
//! This crate holds the snapshot records fetched from the indexer, the value
//! objects used to interpret raw on-chain integers, and the pure
//! derived-number utilities the status engine is built on.

/// Pure derived-number views over a pool snapshot.
pub mod derived;
/// Snapshot entities: pools, deals, tokens.
pub mod entities;
/// Lifecycle state and redemption round enums.
pub mod enums;
/// Typed validation for pool and deal creation forms.
pub mod validation;
/// Value objects for token amounts and fee rates.
pub mod value_objects;
