//! Chicks Market
//!
//! A USDC-denominated market for the CHICKS token. Buying spends USDC (and
//! therefore needs an ERC-20 approval of the market); selling returns USDC
//! at the market's last price.

pub mod calculator;
pub mod calls;
pub mod constants;
pub mod fetch;
pub mod state;

// Re-exports
pub use calculator::{tokens_for_usdc, usdc_for_tokens};
pub use calls::ChicksMarket;
pub use fetch::{buy_quote_source, fetch_last_price, fetch_quote};
pub use state::ChicksQuote;
