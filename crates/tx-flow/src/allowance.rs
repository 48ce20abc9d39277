use alloy_primitives::{Address, U256};
use chain_client::{read_allowance, ChainReader};
use frame_core::Error;
use serde::Serialize;

/// Live allowance compared against what the pending action will spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllowanceState {
    pub current: U256,
    pub required: U256,
}

impl AllowanceState {
    pub fn needs_approval(&self) -> bool {
        self.current < self.required
    }

    /// Assumed state when the allowance could not be read
    pub fn unknown(required: U256) -> Self {
        Self {
            current: U256::ZERO,
            required,
        }
    }
}

/// Read the allowance fresh from the chain; never cached between operations
pub async fn allowance_state<C: ChainReader>(
    chain: &C,
    token: Address,
    owner: Address,
    spender: Address,
    required: U256,
) -> Result<AllowanceState, Error> {
    let current = read_allowance(chain, token, owner, spender).await?;
    Ok(AllowanceState { current, required })
}
