//! NFT contract calls and action builders

use alloy_primitives::{Address, U256};
use evm_codec::{AbiType, ContractCall, FunctionSig};
use frame_core::{Error, ProtocolError};
use tx_flow::{ActionRequest, OperationKind};

use crate::constants::MAX_PER_MINT;
use crate::state::NftInfo;

pub const MINT: FunctionSig = FunctionSig::new("mint", &[AbiType::Uint256], &[]);
pub const MINT_PRICE: FunctionSig = FunctionSig::new("mintPrice", &[], &[AbiType::Uint256]);
pub const TOTAL_SUPPLY: FunctionSig = FunctionSig::new("totalSupply", &[], &[AbiType::Uint256]);
pub const MAX_SUPPLY: FunctionSig = FunctionSig::new("maxSupply", &[], &[AbiType::Uint256]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NftCollection {
    pub contract: Address,
    pub usdc: Address,
}

impl NftCollection {
    pub fn new(contract: Address, usdc: Address) -> Self {
        Self { contract, usdc }
    }

    /// Mint `quantity` tokens at the price in `info`
    pub fn mint(&self, info: &NftInfo, quantity: u64) -> Result<ActionRequest, Error> {
        if quantity == 0 || quantity > MAX_PER_MINT {
            return Err(ProtocolError::invalid_amount(format!(
                "quantity must be between 1 and {}",
                MAX_PER_MINT
            ))
            .into());
        }
        let remaining = info.remaining();
        if remaining < U256::from(quantity) {
            return Err(ProtocolError::SoldOut {
                requested: quantity,
                remaining: remaining.saturating_to::<u64>(),
            }
            .into());
        }

        let call = ContractCall::new(self.contract, MINT, vec![U256::from(quantity).into()]);
        let request = ActionRequest::new(OperationKind::MintNft, call);
        let cost = info.cost(quantity);
        if cost.is_zero() {
            return Ok(request);
        }
        Ok(request.with_approval(self.usdc, self.contract, cost, "USDC"))
    }

    pub fn mint_price_call(&self) -> ContractCall {
        ContractCall::new(self.contract, MINT_PRICE, vec![])
    }

    pub fn total_supply_call(&self) -> ContractCall {
        ContractCall::new(self.contract, TOTAL_SUPPLY, vec![])
    }

    pub fn max_supply_call(&self) -> ContractCall {
        ContractCall::new(self.contract, MAX_SUPPLY, vec![])
    }
}
