//! Conversion between user-facing amounts and the chain's base unit.
//!
//! Amounts travel over HTTP as decimal ether strings ("0.00000001") and are
//! converted to wei at the gateway boundary.

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{Address, U256};
use std::str::FromStr;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Number of fractional digits in one ether.
pub const ETHER_DECIMALS: usize = 18;

/// Parse a decimal ether string into wei.
pub fn parse_amount(amount: &str) -> BlockchainResult<U256> {
    let invalid = |reason: &str| BlockchainError::InvalidAmount(amount.to_string(), reason.to_string());

    if amount.starts_with('-') {
        return Err(invalid("amount must not be negative"));
    }

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("missing value"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid("not a decimal number"));
    }
    if fraction.len() > ETHER_DECIMALS {
        return Err(invalid("fractional component exceeds decimals"));
    }

    let normalized = match (whole.is_empty(), fraction.is_empty()) {
        (true, _) => format!("0.{fraction}"),
        (false, true) => whole.to_string(),
        (false, false) => format!("{whole}.{fraction}"),
    };
    parse_ether(&normalized).map_err(|e| invalid(&e.to_string()))
}

/// Format a wei amount as a decimal ether string.
///
/// Trailing fractional zeros are trimmed, keeping at least one digit.
pub fn format_amount(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => format!("{formatted}.0"),
    }
}

/// Largest integer a JSON client can send as a float without losing precision.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Convert a JSON number into a contract value.
///
/// Integral floats such as `42.0` or `1e3` are accepted up to
/// [`MAX_SAFE_INTEGER`].
pub fn parse_value(value: &serde_json::Number) -> BlockchainResult<U256> {
    if let Some(v) = value.as_u64() {
        return Ok(U256::from(v));
    }
    match value.as_f64() {
        Some(v) if v >= 0.0 && v.fract() == 0.0 && v <= MAX_SAFE_INTEGER as f64 => {
            Ok(U256::from(v as u64))
        }
        _ => Err(BlockchainError::InvalidValue(value.to_string())),
    }
}

/// Parse a 0x-prefixed hex address.
///
/// Mixed-case input must carry a valid EIP-55 checksum.
pub fn parse_address(address: &str) -> BlockchainResult<Address> {
    let invalid = || BlockchainError::InvalidAddress(address.to_string());
    let digits = address.strip_prefix("0x").unwrap_or(address);
    let mixed_case = digits.bytes().any(|b| b.is_ascii_uppercase())
        && digits.bytes().any(|b| b.is_ascii_lowercase());

    if mixed_case {
        Address::parse_checksummed(address, None).map_err(|_| invalid())
    } else {
        Address::from_str(address).map_err(|_| invalid())
    }
}
