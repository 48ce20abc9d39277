//! Chicks Calculator
//!
//! Display-only estimates from the last traded price. The contract's own
//! `getBuyTokens` preview is authoritative; these are the local fallback.
//!
//!   tokens = usdc * 10^18 / price
//!   usdc   = tokens * price / 10^18

use alloy_primitives::U256;

use crate::constants::ONE_CHICKS;

/// CHICKS base units received for `usdc` base units. Zero without a price.
pub fn tokens_for_usdc(usdc: U256, price: U256) -> U256 {
    if price.is_zero() {
        return U256::ZERO;
    }
    usdc.saturating_mul(ONE_CHICKS) / price
}

/// USDC base units received for `tokens` CHICKS base units
pub fn usdc_for_tokens(tokens: U256, price: U256) -> U256 {
    tokens.saturating_mul(price) / ONE_CHICKS
}
