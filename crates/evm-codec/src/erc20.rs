//! ERC-20 function descriptors

use alloy_primitives::{Address, U256};

use crate::abi::{AbiType, FunctionSig};
use crate::call::ContractCall;

pub const ALLOWANCE: FunctionSig = FunctionSig::new(
    "allowance",
    &[AbiType::Address, AbiType::Address],
    &[AbiType::Uint256],
);

pub const APPROVE: FunctionSig = FunctionSig::new(
    "approve",
    &[AbiType::Address, AbiType::Uint256],
    &[AbiType::Bool],
);

pub const BALANCE_OF: FunctionSig =
    FunctionSig::new("balanceOf", &[AbiType::Address], &[AbiType::Uint256]);

pub const DECIMALS: FunctionSig = FunctionSig::new("decimals", &[], &[AbiType::Uint256]);

/// `token.allowance(owner, spender)`
pub fn allowance_call(token: Address, owner: Address, spender: Address) -> ContractCall {
    ContractCall::new(token, ALLOWANCE, vec![owner.into(), spender.into()])
}

/// `token.approve(spender, amount)`
pub fn approve_call(token: Address, spender: Address, amount: U256) -> ContractCall {
    ContractCall::new(token, APPROVE, vec![spender.into(), amount.into()])
}

/// `token.balanceOf(owner)`
pub fn balance_of_call(token: Address, owner: Address) -> ContractCall {
    ContractCall::new(token, BALANCE_OF, vec![owner.into()])
}
