//! Chicks Constants

use alloy_primitives::U256;

/// CHICKS token decimals
pub const CHICKS_DECIMALS: u8 = 18;

/// `lastPrice()` is quoted in USDC base units per whole CHICKS
pub const PRICE_DECIMALS: u8 = frame_core::constants::USDC_DECIMALS;

/// 10^18, one whole CHICKS in base units
pub const ONE_CHICKS: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);
