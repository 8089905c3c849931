//! GraphQL-over-HTTP snapshot source.
//!
//! Numeric fields arrive as decimal strings. Malformed values degrade to
//! zero with a warning rather than failing the whole fetch: the status layer
//! runs on every poll and prefers availability over strictness.

use crate::provider::{SnapshotError, SnapshotProvider};
use aelin_domain::entities::{
    DealSnapshot, PoolSnapshot, RedemptionWindow, TokenInfo, VestingSchedule,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use primitive_types::U256;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::warn;

const POOL_QUERY: &str = r#"
query PoolStatus($id: ID!) {
  poolCreated(id: $id) {
    id
    sponsor
    purchaseToken
    purchaseTokenSymbol
    purchaseTokenDecimals
    purchaseTokenCap
    totalSupply
    contributions
    totalAmountWithdrawn
    timestamp
    purchaseDuration
    duration
    sponsorFee
    dealsCreated
    fundsReleased
    deal {
      id
      holder
      underlyingDealToken
      underlyingDealTokenSymbol
      underlyingDealTokenDecimals
      underlyingDealTokenTotal
      purchaseTokenTotalForDeal
      totalAmountAccepted
      isDealFunded
      holderFundingExpiration
      proRataRedemptionExpiry
      openRedemptionExpiry
      vestingCliff
      vestingPeriod
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<QueryData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    pool_created: Option<PoolDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PoolDto {
    id: String,
    sponsor: Option<String>,
    purchase_token: Option<String>,
    purchase_token_symbol: Option<String>,
    purchase_token_decimals: Option<u8>,
    purchase_token_cap: Option<String>,
    total_supply: Option<String>,
    contributions: Option<String>,
    total_amount_withdrawn: Option<String>,
    timestamp: Option<String>,
    purchase_duration: Option<String>,
    duration: Option<String>,
    sponsor_fee: Option<String>,
    deals_created: Option<u32>,
    funds_released: Option<bool>,
    deal: Option<DealDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DealDto {
    id: String,
    holder: Option<String>,
    underlying_deal_token: Option<String>,
    underlying_deal_token_symbol: Option<String>,
    underlying_deal_token_decimals: Option<u8>,
    underlying_deal_token_total: Option<String>,
    purchase_token_total_for_deal: Option<String>,
    total_amount_accepted: Option<String>,
    is_deal_funded: Option<bool>,
    holder_funding_expiration: Option<String>,
    pro_rata_redemption_expiry: Option<String>,
    open_redemption_expiry: Option<String>,
    vesting_cliff: Option<String>,
    vesting_period: Option<String>,
}

fn parse_u256(pool: &str, field: &str, value: Option<&String>) -> U256 {
    let Some(value) = value else {
        return U256::zero();
    };
    match U256::from_dec_str(value) {
        Ok(v) => v,
        Err(_) => {
            warn!(pool, field, value, "malformed numeric field, defaulting to zero");
            U256::zero()
        }
    }
}

fn parse_u64(pool: &str, field: &str, value: Option<&String>) -> u64 {
    let Some(value) = value else {
        return 0;
    };
    match value.parse::<u64>() {
        Ok(v) => v,
        Err(_) => {
            warn!(pool, field, value, "malformed numeric field, defaulting to zero");
            0
        }
    }
}

fn parse_date(pool: &str, field: &str, value: Option<&String>) -> Option<DateTime<Utc>> {
    let secs = value?.parse::<i64>().ok().or_else(|| {
        warn!(pool, field, "malformed timestamp field, ignoring");
        None
    })?;
    DateTime::<Utc>::from_timestamp(secs, 0)
}

pub(crate) fn into_snapshot(dto: PoolDto, chain_id: u64) -> PoolSnapshot {
    let address = dto.id.clone();
    let purchase_token = TokenInfo::new(
        dto.purchase_token.unwrap_or_default(),
        dto.purchase_token_symbol.unwrap_or_default(),
        dto.purchase_token_decimals,
    );

    let deal = dto.deal.map(|d| into_deal(&address, d));

    PoolSnapshot {
        address: address.clone(),
        chain_id,
        sponsor: dto.sponsor.unwrap_or_default(),
        purchase_token,
        purchase_token_cap: parse_u256(&address, "purchaseTokenCap", dto.purchase_token_cap.as_ref()),
        total_supply: parse_u256(&address, "totalSupply", dto.total_supply.as_ref()),
        contributions: parse_u256(&address, "contributions", dto.contributions.as_ref()),
        total_withdrawn: parse_u256(
            &address,
            "totalAmountWithdrawn",
            dto.total_amount_withdrawn.as_ref(),
        ),
        timestamp: parse_u64(&address, "timestamp", dto.timestamp.as_ref()),
        purchase_duration: parse_u64(&address, "purchaseDuration", dto.purchase_duration.as_ref()),
        duration: parse_u64(&address, "duration", dto.duration.as_ref()),
        sponsor_fee: parse_u256(&address, "sponsorFee", dto.sponsor_fee.as_ref()),
        deal,
        deals_created: dto.deals_created.unwrap_or(0),
        funds_released: dto.funds_released.unwrap_or(false),
    }
}

fn into_deal(pool: &str, dto: DealDto) -> DealSnapshot {
    let underlying_token = TokenInfo::new(
        dto.underlying_deal_token.unwrap_or_default(),
        dto.underlying_deal_token_symbol.unwrap_or_default(),
        dto.underlying_deal_token_decimals,
    );

    let redemption = parse_date(pool, "proRataRedemptionExpiry", dto.pro_rata_redemption_expiry.as_ref())
        .map(|pro_rata_end| RedemptionWindow {
            pro_rata_end,
            open_end: parse_date(pool, "openRedemptionExpiry", dto.open_redemption_expiry.as_ref()),
        });

    DealSnapshot {
        address: dto.id,
        underlying_token,
        underlying_total: parse_u256(
            pool,
            "underlyingDealTokenTotal",
            dto.underlying_deal_token_total.as_ref(),
        ),
        purchase_total: parse_u256(
            pool,
            "purchaseTokenTotalForDeal",
            dto.purchase_token_total_for_deal.as_ref(),
        ),
        holder: dto.holder.unwrap_or_default(),
        holder_funded: dto.is_deal_funded.unwrap_or(false),
        holder_funding_expiry: parse_date(
            pool,
            "holderFundingExpiration",
            dto.holder_funding_expiration.as_ref(),
        )
        .unwrap_or(DateTime::<Utc>::MIN_UTC),
        redemption,
        vesting: VestingSchedule::new(
            parse_u64(pool, "vestingCliff", dto.vesting_cliff.as_ref()),
            parse_u64(pool, "vestingPeriod", dto.vesting_period.as_ref()),
        ),
        max_purchase_deal_allowed: parse_u256(
            pool,
            "purchaseTokenTotalForDeal",
            dto.purchase_token_total_for_deal.as_ref(),
        ),
        total_amount_accepted: parse_u256(
            pool,
            "totalAmountAccepted",
            dto.total_amount_accepted.as_ref(),
        ),
    }
}

/// Snapshot source backed by one subgraph endpoint per chain.
pub struct SubgraphProvider {
    http: reqwest::Client,
    endpoints: HashMap<u64, String>,
}

impl SubgraphProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoints: HashMap::new(),
        }
    }

    /// Registers the subgraph endpoint serving a chain.
    #[must_use]
    pub fn with_endpoint(mut self, chain_id: u64, url: impl Into<String>) -> Self {
        self.endpoints.insert(chain_id, url.into());
        self
    }
}

impl Default for SubgraphProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotProvider for SubgraphProvider {
    async fn fetch_pool(
        &self,
        chain_id: u64,
        address: &str,
    ) -> Result<PoolSnapshot, SnapshotError> {
        let url = self
            .endpoints
            .get(&chain_id)
            .ok_or(SnapshotError::UnsupportedChain { chain_id })?;

        let body = json!({
            "query": POOL_QUERY,
            "variables": { "id": address.to_lowercase() },
        });

        let response: GraphQlResponse = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(errors) = response.errors {
            let joined = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SnapshotError::Subgraph(joined));
        }

        let dto = response
            .data
            .and_then(|d| d.pool_created)
            .ok_or_else(|| SnapshotError::NotFound {
                chain_id,
                address: address.to_string(),
            })?;

        Ok(into_snapshot(dto, chain_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_json(deal: Option<serde_json::Value>) -> serde_json::Value {
        json!({
            "id": "0xpool",
            "sponsor": "0xsponsor",
            "purchaseToken": "0xusdc",
            "purchaseTokenSymbol": "USDC",
            "purchaseTokenDecimals": 6,
            "purchaseTokenCap": "1000000000",
            "totalSupply": "250000000",
            "contributions": "250000000",
            "totalAmountWithdrawn": "0",
            "timestamp": "1600000000",
            "purchaseDuration": "86400",
            "duration": "604800",
            "sponsorFee": "2500000000000000000",
            "dealsCreated": 1,
            "fundsReleased": false,
            "deal": deal,
        })
    }

    #[test]
    fn test_snapshot_mapping() {
        let dto: PoolDto = serde_json::from_value(pool_json(None)).unwrap();
        let snapshot = into_snapshot(dto, 1);

        assert_eq!(snapshot.address, "0xpool");
        assert_eq!(snapshot.chain_id, 1);
        assert_eq!(snapshot.purchase_token.decimals, Some(6));
        assert_eq!(snapshot.purchase_token_cap, U256::from(1_000_000_000u64));
        assert_eq!(snapshot.timestamp, 1_600_000_000);
        assert_eq!(snapshot.purchase_duration, 86_400);
        assert!(snapshot.deal.is_none());
        assert!(!snapshot.funds_released);
    }

    #[test]
    fn test_deal_mapping() {
        let deal = json!({
            "id": "0xdeal",
            "holder": "0xholder",
            "underlyingDealToken": "0xdai",
            "underlyingDealTokenSymbol": "DAI",
            "underlyingDealTokenDecimals": 18,
            "underlyingDealTokenTotal": "1000",
            "purchaseTokenTotalForDeal": "500",
            "totalAmountAccepted": "100",
            "isDealFunded": true,
            "holderFundingExpiration": "1600100000",
            "proRataRedemptionExpiry": "1600200000",
            "openRedemptionExpiry": "1600300000",
            "vestingCliff": "7776000",
            "vestingPeriod": "31536000",
        });
        let dto: PoolDto = serde_json::from_value(pool_json(Some(deal))).unwrap();
        let snapshot = into_snapshot(dto, 1);

        let deal = snapshot.deal.expect("deal should map");
        assert!(deal.holder_funded);
        assert_eq!(deal.purchase_total, U256::from(500u64));
        assert_eq!(deal.total_amount_accepted, U256::from(100u64));
        assert_eq!(deal.vesting.cliff_secs, 7_776_000);

        let window = deal.redemption.expect("redemption window should map");
        assert_eq!(window.pro_rata_end.timestamp(), 1_600_200_000);
        assert_eq!(window.open_end.unwrap().timestamp(), 1_600_300_000);
    }

    #[test]
    fn test_malformed_numerics_default_to_zero() {
        let mut raw = pool_json(None);
        raw["contributions"] = json!("not-a-number");
        raw["timestamp"] = json!("-5");

        let dto: PoolDto = serde_json::from_value(raw).unwrap();
        let snapshot = into_snapshot(dto, 1);

        assert_eq!(snapshot.contributions, U256::zero());
        assert_eq!(snapshot.timestamp, 0);
    }

    #[test]
    fn test_missing_fields_default() {
        let dto: PoolDto = serde_json::from_value(json!({ "id": "0xpool" })).unwrap();
        let snapshot = into_snapshot(dto, 42);

        assert_eq!(snapshot.chain_id, 42);
        assert_eq!(snapshot.sponsor, "");
        assert_eq!(snapshot.purchase_token.decimals, None);
        assert_eq!(snapshot.contributions, U256::zero());
        assert_eq!(snapshot.deals_created, 0);
    }
}
