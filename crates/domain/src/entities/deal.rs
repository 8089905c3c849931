use crate::entities::token::TokenInfo;
use crate::value_objects::Amount;
use chrono::{DateTime, Duration, Utc};
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Investment/deal token exchange ratios, derived from the deal totals.
///
/// The two rates are reciprocal within rounding tolerance; zero totals yield
/// zero rates rather than a division error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRates {
    /// Investment tokens per one deal token.
    pub investment_per_deal: Decimal,
    /// Deal tokens per one investment token.
    pub deal_per_investment: Decimal,
}

/// Redemption windows, set once the holder funds the deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionWindow {
    /// End of the pro-rata round.
    pub pro_rata_end: DateTime<Utc>,
    /// End of the open round, when the deal defines one.
    pub open_end: Option<DateTime<Utc>>,
}

impl RedemptionWindow {
    /// Instant after which no further redemption is possible.
    pub fn final_end(&self) -> DateTime<Utc> {
        self.open_end.unwrap_or(self.pro_rata_end)
    }
}

/// Cliff + linear unlock schedule for accepted deal tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    pub cliff_secs: u64,
    pub linear_secs: u64,
}

impl VestingSchedule {
    pub fn new(cliff_secs: u64, linear_secs: u64) -> Self {
        Self {
            cliff_secs,
            linear_secs,
        }
    }

    pub fn cliff(&self) -> Duration {
        saturating_secs(self.cliff_secs)
    }

    pub fn linear(&self) -> Duration {
        saturating_secs(self.linear_secs)
    }
}

// Indexer data is untrusted; absurd second counts clamp instead of panicking.
fn saturating_secs(secs: u64) -> Duration {
    Duration::try_seconds(secs.min(i64::MAX as u64) as i64).unwrap_or(Duration::MAX)
}

/// A sponsor-submitted exchange proposal attached to a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealSnapshot {
    pub address: String,
    pub underlying_token: TokenInfo,
    /// Total deal tokens on offer.
    pub underlying_total: U256,
    /// Investment tokens the deal intends to absorb.
    pub purchase_total: U256,
    /// Counterparty expected to deposit the underlying tokens.
    pub holder: String,
    pub holder_funded: bool,
    /// Past this instant an unfunded deal is void.
    pub holder_funding_expiry: DateTime<Utc>,
    /// Present once the holder has funded.
    pub redemption: Option<RedemptionWindow>,
    pub vesting: VestingSchedule,
    /// Ceiling of investment tokens the deal will accept.
    pub max_purchase_deal_allowed: U256,
    /// Investment tokens accepted so far across all redeemers.
    pub total_amount_accepted: U256,
}

impl DealSnapshot {
    pub fn new(
        address: impl Into<String>,
        holder: impl Into<String>,
        underlying_token: TokenInfo,
    ) -> Self {
        Self {
            address: address.into(),
            underlying_token,
            underlying_total: U256::zero(),
            purchase_total: U256::zero(),
            holder: holder.into(),
            holder_funded: false,
            holder_funding_expiry: DateTime::<Utc>::MIN_UTC,
            redemption: None,
            vesting: VestingSchedule::new(0, 0),
            max_purchase_deal_allowed: U256::zero(),
            total_amount_accepted: U256::zero(),
        }
    }

    #[must_use]
    pub fn with_totals(mut self, underlying_total: U256, purchase_total: U256) -> Self {
        self.underlying_total = underlying_total;
        self.purchase_total = purchase_total;
        self.max_purchase_deal_allowed = purchase_total;
        self
    }

    #[must_use]
    pub fn with_holder_funding_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.holder_funding_expiry = expiry;
        self
    }

    #[must_use]
    pub fn with_redemption(mut self, window: RedemptionWindow) -> Self {
        self.holder_funded = true;
        self.redemption = Some(window);
        self
    }

    #[must_use]
    pub fn with_vesting(mut self, vesting: VestingSchedule) -> Self {
        self.vesting = vesting;
        self
    }

    #[must_use]
    pub fn with_accepted(mut self, accepted: U256) -> Self {
        self.total_amount_accepted = accepted;
        self
    }

    /// True while the holder can still fund, or once it has.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.holder_funded || now < self.holder_funding_expiry
    }

    /// Exchange rates between the investment and deal tokens.
    pub fn exchange_rates(&self, purchase_token_decimals: u8) -> ExchangeRates {
        let underlying =
            Amount::new(self.underlying_total, self.underlying_token.decimals_or_zero())
                .to_decimal();
        let purchase = Amount::new(self.purchase_total, purchase_token_decimals).to_decimal();

        if underlying.is_zero() || purchase.is_zero() {
            return ExchangeRates {
                investment_per_deal: Decimal::ZERO,
                deal_per_investment: Decimal::ZERO,
            };
        }

        ExchangeRates {
            investment_per_deal: purchase / underlying,
            deal_per_investment: underlying / purchase,
        }
    }
}
