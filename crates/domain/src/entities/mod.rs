pub mod deal;
pub mod pool;
pub mod token;

// Re-export for easier access
pub use deal::{DealSnapshot, ExchangeRates, RedemptionWindow, VestingSchedule};
pub use pool::{PoolKey, PoolSnapshot};
pub use token::TokenInfo;
