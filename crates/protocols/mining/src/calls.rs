//! Mining contract calls and action builders

use alloy_primitives::{Address, U256};
use evm_codec::{parse_amount, AbiType, AbiValue, ContractCall, FunctionSig};
use frame_core::constants::ETH_DECIMALS;
use frame_core::{Error, ProtocolError};
use tx_flow::{ActionRequest, OperationKind};

use crate::board::{deploy_cost, validate_squares};
use crate::state::MinerRewards;

pub const DEPLOY: FunctionSig = FunctionSig::new("deploy", &[AbiType::Uint256Array], &[]);
pub const CLAIM_ETH: FunctionSig = FunctionSig::new("claimETH", &[], &[]);
pub const CLAIM_TOKEN: FunctionSig = FunctionSig::new("claimToken", &[], &[]);
pub const GET_MINER_REWARDS: FunctionSig = FunctionSig::new(
    "getMinerRewards",
    &[AbiType::Address],
    &[AbiType::Uint256, AbiType::Uint256],
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningBoard {
    pub contract: Address,
}

impl MiningBoard {
    pub fn new(contract: Address) -> Self {
        Self { contract }
    }

    /// Deploy `eth_per_square` (decimal ETH) onto each selected square
    pub fn deploy(&self, squares: &[u8], eth_per_square: &str) -> Result<ActionRequest, Error> {
        let squares = validate_squares(squares)?;
        let per_square = parse_amount(eth_per_square, ETH_DECIMALS)?;
        if per_square.is_zero() {
            return Err(ProtocolError::invalid_amount("amount per square must be greater than zero").into());
        }
        let value = deploy_cost(per_square, squares.len());
        let call = ContractCall::new(self.contract, DEPLOY, vec![AbiValue::UintArray(squares)])
            .with_value(value);
        Ok(ActionRequest::new(OperationKind::DeployMiners, call))
    }

    pub fn claim_eth(&self, rewards: Option<&MinerRewards>) -> Result<ActionRequest, Error> {
        claimable(rewards.map(|r| r.eth), "ETH")?;
        let call = ContractCall::new(self.contract, CLAIM_ETH, vec![]);
        Ok(ActionRequest::new(OperationKind::ClaimEth, call))
    }

    pub fn claim_token(&self, rewards: Option<&MinerRewards>) -> Result<ActionRequest, Error> {
        claimable(rewards.map(|r| r.token), "token")?;
        let call = ContractCall::new(self.contract, CLAIM_TOKEN, vec![]);
        Ok(ActionRequest::new(OperationKind::ClaimToken, call))
    }

    pub fn rewards_call(&self, account: Address) -> ContractCall {
        ContractCall::new(self.contract, GET_MINER_REWARDS, vec![account.into()])
    }
}

fn claimable(amount: Option<U256>, what: &str) -> Result<(), ProtocolError> {
    match amount {
        Some(amount) if !amount.is_zero() => Ok(()),
        _ => Err(ProtocolError::not_allowed(format!("no {} rewards to claim", what))),
    }
}
