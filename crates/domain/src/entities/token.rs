use serde::{Deserialize, Serialize};

/// Token metadata as reported by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: String,
    pub symbol: String,
    /// Indexers occasionally omit decimals; formatting then treats the
    /// amount as whole units.
    pub decimals: Option<u8>,
}

impl TokenInfo {
    pub fn new(address: impl Into<String>, symbol: impl Into<String>, decimals: Option<u8>) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    pub fn decimals_or_zero(&self) -> u8 {
        self.decimals.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_decimals_fallback() {
        let token = TokenInfo::new("0xabc", "USDC", None);
        assert_eq!(token.decimals_or_zero(), 0);

        let token = TokenInfo::new("0xabc", "USDC", Some(6));
        assert_eq!(token.decimals_or_zero(), 6);
    }
}
