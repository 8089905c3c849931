//! Typed validation for pool and deal creation forms.
//!
//! Each check yields a structured [`FieldError`] carrying the offending
//! field, an error kind, and a display message, so callers can match
//! exhaustively instead of probing loose maps.

use crate::entities::PoolSnapshot;
use crate::value_objects::Percentage;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest window the protocol accepts for funding or deal-finding.
pub const MIN_WINDOW_SECS: u64 = 30 * 60;
/// Longest window the protocol accepts for funding or deal-finding.
pub const MAX_WINDOW_SECS: u64 = 30 * 24 * 60 * 60;
/// Longest cliff or linear vesting period.
pub const MAX_VESTING_SECS: u64 = 5 * 365 * 24 * 60 * 60;

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ErrorKind {
    #[error("value is required")]
    Required,
    #[error("value is out of range")]
    OutOfRange,
    #[error("not a valid address")]
    InvalidAddress,
    #[error("exceeds the available amount")]
    ExceedsAvailable,
}

/// A rejected field with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError<F> {
    pub field: F,
    pub kind: ErrorKind,
    pub message: String,
}

impl<F> FieldError<F> {
    fn new(field: F, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

/// Fields of the create-pool form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatePoolField {
    Name,
    Symbol,
    PurchaseToken,
    SponsorFee,
    PurchaseDuration,
    DealDuration,
}

/// Sponsor input for creating a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePoolForm {
    pub name: String,
    pub symbol: String,
    pub purchase_token_address: String,
    /// Zero means uncapped.
    pub purchase_token_cap: U256,
    /// 18-decimal fixed point, `1e18` == 1%.
    pub sponsor_fee: U256,
    pub purchase_duration_secs: u64,
    pub duration_secs: u64,
}

/// Fields of the create-deal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreateDealField {
    UnderlyingToken,
    UnderlyingTotal,
    PurchaseTotal,
    Holder,
    HolderFundingPeriod,
    ProRataPeriod,
    OpenPeriod,
    VestingCliff,
    VestingPeriod,
}

/// Sponsor input for presenting a deal on a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDealForm {
    pub underlying_token_address: String,
    pub underlying_total: U256,
    pub purchase_total: U256,
    pub holder: String,
    pub holder_funding_secs: u64,
    pub pro_rata_secs: u64,
    pub open_secs: Option<u64>,
    pub vesting_cliff_secs: u64,
    pub vesting_linear_secs: u64,
}

fn is_address(s: &str) -> bool {
    s.len() == 42
        && s.starts_with("0x")
        && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

fn window_in_bounds(secs: u64) -> bool {
    (MIN_WINDOW_SECS..=MAX_WINDOW_SECS).contains(&secs)
}

/// Validates a create-pool form, returning every rejected field.
pub fn validate_create_pool(form: &CreatePoolForm) -> Vec<FieldError<CreatePoolField>> {
    let mut errors = Vec::new();

    if form.name.trim().is_empty() {
        errors.push(FieldError::new(
            CreatePoolField::Name,
            ErrorKind::Required,
            "pool name is required",
        ));
    } else if form.name.len() > 30 {
        errors.push(FieldError::new(
            CreatePoolField::Name,
            ErrorKind::OutOfRange,
            "pool name must be at most 30 characters",
        ));
    }

    if form.symbol.trim().is_empty() {
        errors.push(FieldError::new(
            CreatePoolField::Symbol,
            ErrorKind::Required,
            "pool symbol is required",
        ));
    } else if form.symbol.len() > 8 {
        errors.push(FieldError::new(
            CreatePoolField::Symbol,
            ErrorKind::OutOfRange,
            "pool symbol must be at most 8 characters",
        ));
    }

    if !is_address(&form.purchase_token_address) {
        errors.push(FieldError::new(
            CreatePoolField::PurchaseToken,
            ErrorKind::InvalidAddress,
            "purchase token must be a 0x-prefixed address",
        ));
    }

    if !Percentage::from_fee_rate(form.sponsor_fee).is_valid_sponsor_fee() {
        errors.push(FieldError::new(
            CreatePoolField::SponsorFee,
            ErrorKind::OutOfRange,
            "sponsor fee must be between 0% and 98%",
        ));
    }

    if !window_in_bounds(form.purchase_duration_secs) {
        errors.push(FieldError::new(
            CreatePoolField::PurchaseDuration,
            ErrorKind::OutOfRange,
            "funding window must be between 30 minutes and 30 days",
        ));
    }

    if !window_in_bounds(form.duration_secs) {
        errors.push(FieldError::new(
            CreatePoolField::DealDuration,
            ErrorKind::OutOfRange,
            "deal-finding window must be between 30 minutes and 30 days",
        ));
    }

    errors
}

/// Validates a create-deal form against the pool it would attach to.
pub fn validate_create_deal(
    form: &CreateDealForm,
    pool: &PoolSnapshot,
) -> Vec<FieldError<CreateDealField>> {
    let mut errors = Vec::new();

    if !is_address(&form.underlying_token_address) {
        errors.push(FieldError::new(
            CreateDealField::UnderlyingToken,
            ErrorKind::InvalidAddress,
            "underlying token must be a 0x-prefixed address",
        ));
    }

    if form.underlying_total.is_zero() {
        errors.push(FieldError::new(
            CreateDealField::UnderlyingTotal,
            ErrorKind::Required,
            "deal token total is required",
        ));
    }

    if form.purchase_total.is_zero() {
        errors.push(FieldError::new(
            CreateDealField::PurchaseTotal,
            ErrorKind::Required,
            "purchase total is required",
        ));
    } else if form.purchase_total > pool.total_supply {
        errors.push(FieldError::new(
            CreateDealField::PurchaseTotal,
            ErrorKind::ExceedsAvailable,
            "purchase total exceeds the amount in the pool",
        ));
    }

    if !is_address(&form.holder) {
        errors.push(FieldError::new(
            CreateDealField::Holder,
            ErrorKind::InvalidAddress,
            "holder must be a 0x-prefixed address",
        ));
    }

    if !window_in_bounds(form.holder_funding_secs) {
        errors.push(FieldError::new(
            CreateDealField::HolderFundingPeriod,
            ErrorKind::OutOfRange,
            "holder funding period must be between 30 minutes and 30 days",
        ));
    }

    if !window_in_bounds(form.pro_rata_secs) {
        errors.push(FieldError::new(
            CreateDealField::ProRataPeriod,
            ErrorKind::OutOfRange,
            "pro-rata redemption period must be between 30 minutes and 30 days",
        ));
    }

    if let Some(open) = form.open_secs {
        if !window_in_bounds(open) {
            errors.push(FieldError::new(
                CreateDealField::OpenPeriod,
                ErrorKind::OutOfRange,
                "open redemption period must be between 30 minutes and 30 days",
            ));
        }
    }

    if form.vesting_cliff_secs > MAX_VESTING_SECS {
        errors.push(FieldError::new(
            CreateDealField::VestingCliff,
            ErrorKind::OutOfRange,
            "vesting cliff must be at most 5 years",
        ));
    }

    if form.vesting_linear_secs > MAX_VESTING_SECS {
        errors.push(FieldError::new(
            CreateDealField::VestingPeriod,
            ErrorKind::OutOfRange,
            "vesting period must be at most 5 years",
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TokenInfo;

    fn pool_form() -> CreatePoolForm {
        CreatePoolForm {
            name: "Test Pool".to_string(),
            symbol: "TP".to_string(),
            purchase_token_address: format!("0x{}", "a".repeat(40)),
            purchase_token_cap: U256::zero(),
            sponsor_fee: U256::from(2_000_000_000_000_000_000u128),
            purchase_duration_secs: 24 * 60 * 60,
            duration_secs: 7 * 24 * 60 * 60,
        }
    }

    fn deal_form() -> CreateDealForm {
        CreateDealForm {
            underlying_token_address: format!("0x{}", "b".repeat(40)),
            underlying_total: U256::from(1_000u64),
            purchase_total: U256::from(500u64),
            holder: format!("0x{}", "c".repeat(40)),
            holder_funding_secs: 24 * 60 * 60,
            pro_rata_secs: 24 * 60 * 60,
            open_secs: None,
            vesting_cliff_secs: 0,
            vesting_linear_secs: 365 * 24 * 60 * 60,
        }
    }

    fn funded_pool() -> PoolSnapshot {
        PoolSnapshot::new(
            "0xpool",
            1,
            "0xsponsor",
            TokenInfo::new("0xusdc", "USDC", Some(6)),
            0,
            100,
            200,
        )
        .with_contributions(U256::from(1_000u64))
    }

    #[test]
    fn test_valid_forms_pass() {
        assert!(validate_create_pool(&pool_form()).is_empty());
        assert!(validate_create_deal(&deal_form(), &funded_pool()).is_empty());
    }

    #[test]
    fn test_pool_name_and_symbol_required() {
        let mut form = pool_form();
        form.name = "  ".to_string();
        form.symbol = String::new();

        let errors = validate_create_pool(&form);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.field == CreatePoolField::Name
            && e.kind == ErrorKind::Required));
        assert!(errors.iter().any(|e| e.field == CreatePoolField::Symbol
            && e.kind == ErrorKind::Required));
    }

    #[test]
    fn test_sponsor_fee_ceiling() {
        let mut form = pool_form();
        form.sponsor_fee = U256::from(99u64) * U256::exp10(18);

        let errors = validate_create_pool(&form);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, CreatePoolField::SponsorFee);
        assert_eq!(errors[0].kind, ErrorKind::OutOfRange);
    }

    #[test]
    fn test_zero_cap_is_allowed() {
        // Cap zero means uncapped, not missing.
        let form = pool_form();
        assert!(form.purchase_token_cap.is_zero());
        assert!(validate_create_pool(&form).is_empty());
    }

    #[test]
    fn test_window_bounds() {
        let mut form = pool_form();
        form.purchase_duration_secs = MIN_WINDOW_SECS - 1;
        form.duration_secs = MAX_WINDOW_SECS + 1;

        let errors = validate_create_pool(&form);
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&CreatePoolField::PurchaseDuration));
        assert!(fields.contains(&CreatePoolField::DealDuration));
    }

    #[test]
    fn test_deal_purchase_total_bounded_by_pool() {
        let mut form = deal_form();
        form.purchase_total = U256::from(2_000u64);

        let errors = validate_create_deal(&form, &funded_pool());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, CreateDealField::PurchaseTotal);
        assert_eq!(errors[0].kind, ErrorKind::ExceedsAvailable);
    }

    #[test]
    fn test_bad_addresses_rejected() {
        let mut form = deal_form();
        form.holder = "not-an-address".to_string();
        form.underlying_token_address = "0x123".to_string();

        let errors = validate_create_deal(&form, &funded_pool());
        assert!(errors.iter().all(|e| e.kind == ErrorKind::InvalidAddress));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_error_kind_messages() {
        assert_eq!(ErrorKind::Required.to_string(), "value is required");
        assert_eq!(ErrorKind::InvalidAddress.to_string(), "not a valid address");
    }
}
