//! Snapshot source abstraction.

use aelin_domain::entities::PoolSnapshot;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from snapshot acquisition.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("subgraph error: {0}")]
    Subgraph(String),
    #[error("no subgraph endpoint configured for chain {chain_id}")]
    UnsupportedChain { chain_id: u64 },
    #[error("pool {address} not found on chain {chain_id}")]
    NotFound { chain_id: u64, address: String },
}

/// A source of pool snapshots.
///
/// Implementations fetch from a subgraph, an RPC node, or a fixture in
/// tests. The returned snapshot is a consistent single-fetch record; the
/// poller owns staleness handling across fetches.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn fetch_pool(&self, chain_id: u64, address: &str)
    -> Result<PoolSnapshot, SnapshotError>;
}
