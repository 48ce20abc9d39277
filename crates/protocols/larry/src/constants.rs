use alloy_primitives::U256;

pub const LARRY_DECIMALS: u8 = 18;

/// Longest loan term the contract accepts
pub const MAX_LOAN_DAYS: u64 = 365;

/// 10^18
pub const ONE_LARRY: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);
