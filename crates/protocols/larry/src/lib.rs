//! Larry Protocol
//!
//! LARRY is an ETH-backed token. Besides plain buys and sells, holders can
//! open a leveraged position or borrow ETH against LARRY collateral for a
//! fixed number of days. Every account has at most one loan, read back
//! through `getLoanByAddress`.

pub mod calculator;
pub mod calls;
pub mod constants;
pub mod fetch;
pub mod state;

// Re-exports
pub use calculator::{eth_for_larry, larry_for_eth};
pub use calls::LarryMarket;
pub use fetch::{fetch_interest_fee, fetch_last_price, fetch_leverage_fee, LoanQuery};
pub use state::LoanSnapshot;
