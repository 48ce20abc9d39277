//! NFT State Types

use alloy_primitives::U256;
use serde::Serialize;

/// Collection supply and price, read together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NftInfo {
    /// USDC base units per token
    pub mint_price: U256,
    pub total_supply: U256,
    pub max_supply: U256,
}

impl NftInfo {
    pub fn remaining(&self) -> U256 {
        self.max_supply.saturating_sub(self.total_supply)
    }

    pub fn is_sold_out(&self) -> bool {
        self.remaining().is_zero()
    }

    /// USDC cost of minting `quantity`
    pub fn cost(&self, quantity: u64) -> U256 {
        self.mint_price.saturating_mul(U256::from(quantity))
    }
}
