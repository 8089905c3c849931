use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// A raw on-chain token amount together with the token's decimal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self {
            raw: U256::zero(),
            decimals,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn from_decimal(d: Decimal, decimals: u8) -> Self {
        let multiplier =
            Decimal::from_u128(10u128.saturating_pow(decimals as u32)).unwrap_or(Decimal::ONE);
        let raw_u128 = (d * multiplier).to_u128().unwrap_or(0);
        Self {
            raw: U256::from(raw_u128),
            decimals,
        }
    }

    /// Lossy conversion for display math. Saturates above `u128::MAX`.
    pub fn to_decimal(&self) -> Decimal {
        let capped = if self.raw > U256::from(u128::MAX) {
            u128::MAX
        } else {
            self.raw.as_u128()
        };
        let d = Decimal::from_u128(capped).unwrap_or(Decimal::MAX);
        let divisor =
            Decimal::from_u128(10u128.saturating_pow(self.decimals as u32)).unwrap_or(Decimal::ONE);
        d / divisor
    }

    /// Decimal-scaled string, exact for any raw value, trailing zeros trimmed.
    pub fn formatted(&self) -> String {
        let s = self.raw.to_string();
        if self.decimals == 0 {
            return s;
        }
        let scale = self.decimals as usize;
        let padded = format!("{s:0>width$}", width = scale + 1);
        let (int, frac) = padded.split_at(padded.len() - scale);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            int.to_string()
        } else {
            format!("{int}.{frac}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_formatted_scales_by_decimals() {
        let a = Amount::new(U256::from(1_500_000u64), 6);
        assert_eq!(a.formatted(), "1.5");

        let b = Amount::new(U256::from(42u64), 0);
        assert_eq!(b.formatted(), "42");

        // Smaller than one whole unit
        let c = Amount::new(U256::from(25u64), 6);
        assert_eq!(c.formatted(), "0.000025");
    }

    #[test]
    fn test_formatted_exact_above_u128() {
        let raw = U256::from(u128::MAX) + U256::from(1u64);
        let a = Amount::new(raw, 0);
        assert_eq!(a.formatted(), raw.to_string());
    }

    #[test]
    fn test_decimal_round_trip() {
        let a = Amount::from_decimal(dec!(12.34), 4);
        assert_eq!(a.raw, U256::from(123_400u64));
        assert_eq!(a.to_decimal(), dec!(12.34));
    }

    #[test]
    fn test_zero() {
        assert!(Amount::zero(18).is_zero());
        assert_eq!(Amount::zero(18).formatted(), "0");
    }
}
