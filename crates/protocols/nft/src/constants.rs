/// Largest quantity accepted in one mint call
pub const MAX_PER_MINT: u64 = 10;
