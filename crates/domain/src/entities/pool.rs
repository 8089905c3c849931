use crate::entities::deal::DealSnapshot;
use crate::entities::token::TokenInfo;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a pool: contract address on a specific chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    pub chain_id: u64,
    pub address: String,
}

impl PoolKey {
    pub fn new(chain_id: u64, address: impl Into<String>) -> Self {
        Self {
            chain_id,
            address: address.into(),
        }
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.address)
    }
}

/// Immutable per-fetch record describing an on-chain fundraising pool.
///
/// `purchase_expiry` and `deal_deadline` are intentionally absent: they are
/// derived from `timestamp` plus the duration fields and must never be stored
/// independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub address: String,
    pub chain_id: u64,
    pub sponsor: String,
    pub purchase_token: TokenInfo,
    /// Raw cap amount; zero is the "uncapped" sentinel.
    pub purchase_token_cap: U256,
    pub total_supply: U256,
    pub contributions: U256,
    pub total_withdrawn: U256,
    /// Pool creation time, Unix seconds.
    pub timestamp: u64,
    /// Length of the funding window, seconds.
    pub purchase_duration: u64,
    /// Length of the deal-finding window that follows funding, seconds.
    pub duration: u64,
    /// Fee rate, 18-decimal fixed point (`1e18` == 1%).
    pub sponsor_fee: U256,
    /// Present once the sponsor has submitted a deal.
    pub deal: Option<DealSnapshot>,
    /// How many deals the sponsor has presented so far.
    pub deals_created: u32,
    /// Set when the sponsor released funds, closing the pool for good.
    pub funds_released: bool,
}

impl PoolSnapshot {
    /// Creates a snapshot with empty balances and no deal.
    pub fn new(
        address: impl Into<String>,
        chain_id: u64,
        sponsor: impl Into<String>,
        purchase_token: TokenInfo,
        timestamp: u64,
        purchase_duration: u64,
        duration: u64,
    ) -> Self {
        Self {
            address: address.into(),
            chain_id,
            sponsor: sponsor.into(),
            purchase_token,
            purchase_token_cap: U256::zero(),
            total_supply: U256::zero(),
            contributions: U256::zero(),
            total_withdrawn: U256::zero(),
            timestamp,
            purchase_duration,
            duration,
            sponsor_fee: U256::zero(),
            deal: None,
            deals_created: 0,
            funds_released: false,
        }
    }

    pub fn key(&self) -> PoolKey {
        PoolKey::new(self.chain_id, self.address.clone())
    }

    #[must_use]
    pub fn with_cap(mut self, cap: U256) -> Self {
        self.purchase_token_cap = cap;
        self
    }

    #[must_use]
    pub fn with_contributions(mut self, contributions: U256) -> Self {
        self.contributions = contributions;
        self.total_supply = contributions;
        self
    }

    #[must_use]
    pub fn with_sponsor_fee(mut self, fee: U256) -> Self {
        self.sponsor_fee = fee;
        self
    }

    #[must_use]
    pub fn with_deal(mut self, deal: DealSnapshot) -> Self {
        self.deal = Some(deal);
        self.deals_created += 1;
        self
    }

    #[must_use]
    pub fn with_funds_released(mut self) -> Self {
        self.funds_released = true;
        self
    }
}
