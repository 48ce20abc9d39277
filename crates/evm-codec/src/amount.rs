//! Decimal amount codec
//!
//! Converts between human decimal strings ("100.5") and fixed-point integer
//! amounts in an asset's smallest unit. Excess fractional digits are
//! truncated, never rounded.
//!
//! # Units
//!
//! - USDC-like assets: 6 decimals, 1_000_000 units = 1 USDC
//! - ETH and ETH-like tokens: 18 decimals, 10^18 wei = 1 ETH

use std::fmt;

use alloy_primitives::U256;
use frame_core::AmountError;
use serde::{Deserialize, Serialize};

/// Parse a non-negative decimal string into smallest units at `decimals`
/// precision.
///
/// Accepts surrounding whitespace, a leading dot (".5") and a trailing dot
/// ("1."). Rejects empty input, signs, non-digit characters, more than one
/// decimal point, and values that do not fit in 256 bits.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, AmountError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(AmountError::invalid(input, "amount is empty"));
    }
    if s.starts_with('-') {
        return Err(AmountError::invalid(input, "negative amounts are not allowed"));
    }

    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if frac.contains('.') {
        return Err(AmountError::invalid(input, "more than one decimal point"));
    }
    if whole.is_empty() && frac.is_empty() {
        return Err(AmountError::invalid(input, "no digits"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::invalid(input, "not a decimal number"));
    }

    let precision = decimals as usize;
    let kept = &frac[..frac.len().min(precision)];

    let mut digits = String::with_capacity(whole.len() + precision);
    digits.push_str(whole);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(precision - kept.len()));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 10)
        .map_err(|_| AmountError::invalid(input, "amount exceeds 256 bits"))
}

/// Format smallest units as a decimal string. Lossless: trailing fractional
/// zeros are trimmed but every significant digit is kept.
pub fn format_amount(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let precision = decimals as usize;
    if precision == 0 {
        return digits;
    }

    let padded = if digits.len() <= precision {
        format!("{}{}", "0".repeat(precision + 1 - digits.len()), digits)
    } else {
        digits
    };

    let (whole, frac) = padded.split_at(padded.len() - precision);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac)
    }
}

/// Format for display, truncating to at most `max_fraction` fractional digits
pub fn format_amount_display(value: U256, decimals: u8, max_fraction: usize) -> String {
    let full = format_amount(value, decimals);
    match full.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac[..frac.len().min(max_fraction)].trim_end_matches('0');
            if frac.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => full,
    }
}

/// An amount in an asset's smallest unit, paired with that asset's precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryAmount {
    raw: U256,
    decimals: u8,
}

impl MonetaryAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self::new(U256::ZERO, decimals)
    }

    /// Parse user input at the given precision
    pub fn parse(input: &str, decimals: u8) -> Result<Self, AmountError> {
        Ok(Self::new(parse_amount(input, decimals)?, decimals))
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn format(&self) -> String {
        format_amount(self.raw, self.decimals)
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_core::constants::{ETH_DECIMALS, USDC_DECIMALS};

    #[test]
    fn test_parse_whole_usdc() {
        let raw = parse_amount("100", USDC_DECIMALS).unwrap();
        assert_eq!(raw, U256::from(100_000_000u64));
    }

    #[test]
    fn test_parse_fraction_eth() {
        let raw = parse_amount("0.05", ETH_DECIMALS).unwrap();
        assert_eq!(raw, U256::from(50_000_000_000_000_000u64));
    }

    #[test]
    fn test_parse_truncates_excess_precision() {
        // 7th fractional digit is dropped, not rounded up
        let raw = parse_amount("1.2345679", USDC_DECIMALS).unwrap();
        assert_eq!(raw, U256::from(1_234_567u64));

        let raw = parse_amount("0.0000009", USDC_DECIMALS).unwrap();
        assert_eq!(raw, U256::ZERO);
    }

    #[test]
    fn test_parse_lenient_forms() {
        assert_eq!(parse_amount(" 2 ", USDC_DECIMALS).unwrap(), U256::from(2_000_000u64));
        assert_eq!(parse_amount(".5", USDC_DECIMALS).unwrap(), U256::from(500_000u64));
        assert_eq!(parse_amount("3.", USDC_DECIMALS).unwrap(), U256::from(3_000_000u64));
        assert_eq!(parse_amount("000", USDC_DECIMALS).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        for input in ["", "-1", "abc", "1.2.3", ".", "+1", "1e5", "1,000", "   "] {
            assert!(
                matches!(
                    parse_amount(input, USDC_DECIMALS),
                    Err(AmountError::InvalidAmount { .. })
                ),
                "expected InvalidAmount for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let huge = "9".repeat(80);
        assert!(parse_amount(&huge, 0).is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(U256::from(100_000_000u64), USDC_DECIMALS), "100");
        assert_eq!(format_amount(U256::from(1_234_500u64), USDC_DECIMALS), "1.2345");
        assert_eq!(format_amount(U256::from(1u64), USDC_DECIMALS), "0.000001");
        assert_eq!(format_amount(U256::ZERO, ETH_DECIMALS), "0");
        assert_eq!(format_amount(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        let samples = [
            U256::ZERO,
            U256::from(1u64),
            U256::from(999_999u64),
            U256::from(1_000_000u64),
            U256::from(123_456_789_012_345_678u128),
            U256::MAX,
        ];
        for decimals in [0u8, 6, 18] {
            for value in samples {
                let formatted = format_amount(value, decimals);
                assert_eq!(parse_amount(&formatted, decimals).unwrap(), value, "{}", formatted);
            }
        }
    }

    #[test]
    fn test_parse_then_format_matches_truncated_input() {
        assert_eq!(format_amount(parse_amount("12.3400", 6).unwrap(), 6), "12.34");
        assert_eq!(format_amount(parse_amount("0.1234567", 6).unwrap(), 6), "0.123456");
        assert_eq!(format_amount(parse_amount("007.5", 18).unwrap(), 18), "7.5");
    }

    #[test]
    fn test_format_display_truncates() {
        let raw = parse_amount("1.987654321", ETH_DECIMALS).unwrap();
        assert_eq!(format_amount_display(raw, ETH_DECIMALS, 4), "1.9876");
        assert_eq!(format_amount_display(raw, ETH_DECIMALS, 0), "1");
        let raw = parse_amount("2.00001", ETH_DECIMALS).unwrap();
        assert_eq!(format_amount_display(raw, ETH_DECIMALS, 4), "2");
    }

    #[test]
    fn test_monetary_amount() {
        let amount = MonetaryAmount::parse("100", USDC_DECIMALS).unwrap();
        assert_eq!(amount.raw(), U256::from(100_000_000u64));
        assert_eq!(amount.decimals(), 6);
        assert_eq!(amount.to_string(), "100");
        assert!(MonetaryAmount::zero(18).is_zero());
    }
}
