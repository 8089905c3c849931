//! Snapshot acquisition for Aelin pools.
//!
//! The lifecycle core is pure; this crate owns the impure edge. It fetches
//! pool snapshots from a subgraph indexer and keeps a per-target cache with
//! the ordering guarantees the status layer depends on: stale overlapping
//! fetches are discarded, and untracked targets never receive late results.

/// Polling layer with per-target last-write-wins caching.
pub mod poller;
/// Snapshot source abstraction.
pub mod provider;
/// GraphQL-over-HTTP snapshot source.
pub mod subgraph;

pub use poller::{PollerConfig, SnapshotPoller, TrackedSnapshot};
pub use provider::{SnapshotError, SnapshotProvider};
pub use subgraph::SubgraphProvider;
