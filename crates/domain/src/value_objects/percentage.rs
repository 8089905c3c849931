use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Scale of on-chain fee rates: `1e18` raw units == 1 percent.
pub const FEE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Highest sponsor fee the protocol accepts, in percent.
pub const MAX_SPONSOR_FEE_PCT: u64 = 98;

/// A percentage value, stored as the percent number (`2.5` == 2.5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Percentage(pub Decimal);

impl Percentage {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Decodes an 18-decimal fixed-point fee rate. Saturates above `u128::MAX`.
    pub fn from_fee_rate(raw: U256) -> Self {
        let capped = if raw > U256::from(u128::MAX) {
            u128::MAX
        } else {
            raw.as_u128()
        };
        let d = Decimal::from_u128(capped).unwrap_or(Decimal::MAX);
        let scale = Decimal::from_u128(FEE_SCALE).unwrap_or(Decimal::ONE);
        Self(d / scale)
    }

    pub fn to_fee_rate(&self) -> U256 {
        let scale = Decimal::from_u128(FEE_SCALE).unwrap_or(Decimal::ONE);
        U256::from((self.0 * scale).to_u128().unwrap_or(0))
    }

    pub fn is_valid_sponsor_fee(&self) -> bool {
        self.0 >= Decimal::ZERO && self.0 <= Decimal::from(MAX_SPONSOR_FEE_PCT)
    }

    /// Two-decimal display form, e.g. `"2.50%"`.
    pub fn formatted(&self) -> String {
        format!("{:.2}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fee_rate_decoding() {
        // 2.5% as 18-decimal fixed point
        let raw = U256::from(2_500_000_000_000_000_000u128);
        let pct = Percentage::from_fee_rate(raw);
        assert_eq!(pct.0, dec!(2.5));
        assert_eq!(pct.formatted(), "2.50%");
        assert_eq!(pct.to_fee_rate(), raw);
    }

    #[test]
    fn test_zero_fee() {
        let pct = Percentage::from_fee_rate(U256::zero());
        assert_eq!(pct.formatted(), "0.00%");
        assert!(pct.is_valid_sponsor_fee());
    }

    #[test]
    fn test_sponsor_fee_bounds() {
        assert!(Percentage::new(dec!(98)).is_valid_sponsor_fee());
        assert!(!Percentage::new(dec!(98.01)).is_valid_sponsor_fee());
        assert!(!Percentage::new(dec!(-1)).is_valid_sponsor_fee());
    }
}
