//! Mining Board
//!
//! A 5×5 board of squares. Each round, miners deploy ETH onto one or more
//! squares; rewards accrue in ETH and in the mining token and are claimed
//! separately.

pub mod board;
pub mod calls;
pub mod constants;
pub mod fetch;
pub mod state;

// Re-exports
pub use board::{deploy_cost, validate_squares};
pub use calls::MiningBoard;
pub use fetch::RewardsQuery;
pub use state::MinerRewards;
