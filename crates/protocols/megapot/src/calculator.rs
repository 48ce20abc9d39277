//! Megapot cost arithmetic (USDC base units)

use alloy_primitives::U256;

use crate::constants::BPS_PER_TICKET;

pub fn ticket_cost(tickets: u64, ticket_price: U256) -> U256 {
    ticket_price.saturating_mul(U256::from(tickets))
}

/// Total USDC a subscription pulls over its lifetime
pub fn subscription_cost(tickets_per_day: u64, days: u64, ticket_price: U256) -> U256 {
    ticket_cost(tickets_per_day, ticket_price).saturating_mul(U256::from(days))
}

/// Whole tickets represented by a basis-point total (truncating)
pub fn tickets_from_bps(bps: U256) -> U256 {
    bps / U256::from(BPS_PER_TICKET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_costs() {
        let price = U256::from(1_000_000u64);
        assert_eq!(ticket_cost(5, price), U256::from(5_000_000u64));
        assert_eq!(subscription_cost(2, 30, price), U256::from(60_000_000u64));
        assert_eq!(ticket_cost(0, price), U256::ZERO);
    }

    #[test]
    fn test_tickets_from_bps() {
        assert_eq!(tickets_from_bps(U256::from(35_000u64)), U256::from(3u64));
        assert_eq!(tickets_from_bps(U256::from(9_999u64)), U256::ZERO);
    }
}
