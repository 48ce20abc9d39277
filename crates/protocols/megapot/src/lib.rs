//! Megapot Jackpot
//!
//! Daily USDC jackpot. Tickets are bought one-off on the jackpot contract
//! or through a recurring subscription held by a separate contract; both
//! pull USDC and so require an approval of the total cost.

pub mod calculator;
pub mod calls;
pub mod constants;
pub mod fetch;
pub mod state;

// Re-exports
pub use calculator::{subscription_cost, ticket_cost, tickets_from_bps};
pub use calls::Megapot;
pub use fetch::{fetch_ticket_price, SubscriptionQuery, UserInfoQuery};
pub use state::{SubscriptionSnapshot, UserInfo};
