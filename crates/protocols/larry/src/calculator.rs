//! Larry Calculator
//!
//! `lastPrice()` is wei per whole LARRY.
//!
//!   larry = eth * 10^18 / price
//!   eth   = larry * price / 10^18

use alloy_primitives::U256;

use crate::constants::ONE_LARRY;

pub fn larry_for_eth(eth: U256, price: U256) -> U256 {
    if price.is_zero() {
        return U256::ZERO;
    }
    eth.saturating_mul(ONE_LARRY) / price
}

pub fn eth_for_larry(larry: U256, price: U256) -> U256 {
    larry.saturating_mul(price) / ONE_LARRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use evm_codec::{format_amount, parse_amount};

    #[test]
    fn test_larry_for_eth() {
        let eth = parse_amount("1", 18).unwrap();
        let price = parse_amount("0.0025", 18).unwrap();
        assert_eq!(format_amount(larry_for_eth(eth, price), 18), "400");
        assert_eq!(larry_for_eth(eth, U256::ZERO), U256::ZERO);
    }

    #[test]
    fn test_eth_for_larry() {
        let larry = parse_amount("400", 18).unwrap();
        let price = parse_amount("0.0025", 18).unwrap();
        assert_eq!(format_amount(eth_for_larry(larry, price), 18), "1");
    }
}
