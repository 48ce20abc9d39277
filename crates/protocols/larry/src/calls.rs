//! Larry contract calls and action builders
//!
//! Every LARRY action is paid in ETH or LARRY directly, so none of them
//! needs an ERC-20 approval.

use alloy_primitives::{Address, U256};
use evm_codec::{parse_amount, AbiType, ContractCall, FunctionSig};
use frame_core::constants::ETH_DECIMALS;
use frame_core::{Error, ProtocolError};
use tx_flow::{ActionRequest, OperationKind};

use crate::constants::{LARRY_DECIMALS, MAX_LOAN_DAYS};
use crate::state::LoanSnapshot;

const UINT: AbiType = AbiType::Uint256;

pub const BUY: FunctionSig = FunctionSig::new("buy", &[AbiType::Address], &[]);
pub const SELL: FunctionSig = FunctionSig::new("sell", &[UINT], &[]);
pub const LEVERAGE: FunctionSig = FunctionSig::new("leverage", &[UINT, UINT], &[]);
pub const BORROW: FunctionSig = FunctionSig::new("borrow", &[UINT, UINT], &[]);
pub const REPAY: FunctionSig = FunctionSig::new("repay", &[], &[]);
pub const CLOSE_POSITION: FunctionSig = FunctionSig::new("closePosition", &[], &[]);
pub const EXTEND_LOAN: FunctionSig = FunctionSig::new("extendLoan", &[UINT], &[]);
pub const GET_LOAN_BY_ADDRESS: FunctionSig =
    FunctionSig::new("getLoanByAddress", &[AbiType::Address], &[UINT, UINT, UINT, UINT]);
pub const LAST_PRICE: FunctionSig = FunctionSig::new("lastPrice", &[], &[UINT]);
pub const LEVERAGE_FEE: FunctionSig = FunctionSig::new("leverageFee", &[UINT, UINT], &[UINT]);
pub const GET_INTEREST_FEE: FunctionSig = FunctionSig::new("getInterestFee", &[UINT, UINT], &[UINT]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LarryMarket {
    pub contract: Address,
}

impl LarryMarket {
    pub fn new(contract: Address) -> Self {
        Self { contract }
    }

    /// Buy LARRY for `receiver` with `eth`
    pub fn buy(&self, receiver: Address, eth: &str) -> Result<ActionRequest, Error> {
        let value = positive(eth, ETH_DECIMALS)?;
        let call = ContractCall::new(self.contract, BUY, vec![receiver.into()]).with_value(value);
        Ok(ActionRequest::new(OperationKind::Buy, call))
    }

    pub fn sell(&self, larry: &str) -> Result<ActionRequest, Error> {
        let amount = positive(larry, LARRY_DECIMALS)?;
        let call = ContractCall::new(self.contract, SELL, vec![amount.into()]);
        Ok(ActionRequest::new(OperationKind::Sell, call))
    }

    /// Open a leveraged position worth `eth` for `days`, paying `fee` up front
    pub fn leverage(&self, eth: &str, days: u64, fee: U256) -> Result<ActionRequest, Error> {
        let amount = positive(eth, ETH_DECIMALS)?;
        let days = loan_days(days)?;
        let call = ContractCall::new(self.contract, LEVERAGE, vec![amount.into(), days.into()])
            .with_value(fee);
        Ok(ActionRequest::new(OperationKind::Leverage, call))
    }

    /// Borrow `eth` against LARRY collateral for `days`
    pub fn borrow(&self, eth: &str, days: u64) -> Result<ActionRequest, Error> {
        let amount = positive(eth, ETH_DECIMALS)?;
        let days = loan_days(days)?;
        let call = ContractCall::new(self.contract, BORROW, vec![amount.into(), days.into()]);
        Ok(ActionRequest::new(OperationKind::Borrow, call))
    }

    /// Repay part of the loan with `eth`
    pub fn repay(&self, loan: Option<&LoanSnapshot>, eth: &str) -> Result<ActionRequest, Error> {
        let loan = active(loan)?;
        let value = positive(eth, ETH_DECIMALS)?;
        if value > loan.borrowed {
            return Err(ProtocolError::invalid_amount("repayment exceeds the borrowed amount").into());
        }
        let call = ContractCall::new(self.contract, REPAY, vec![]).with_value(value);
        Ok(ActionRequest::new(OperationKind::Repay, call))
    }

    /// Repay everything and release the collateral
    pub fn close_position(&self, loan: Option<&LoanSnapshot>) -> Result<ActionRequest, Error> {
        let loan = active(loan)?;
        let call = ContractCall::new(self.contract, CLOSE_POSITION, vec![]).with_value(loan.borrowed);
        Ok(ActionRequest::new(OperationKind::ClosePosition, call))
    }

    /// Add `days` to the loan term, paying `fee`
    pub fn extend_loan(
        &self,
        loan: Option<&LoanSnapshot>,
        days: u64,
        fee: U256,
    ) -> Result<ActionRequest, Error> {
        let loan = active(loan)?;
        let total = loan.number_of_days.saturating_add(U256::from(days));
        if total > U256::from(MAX_LOAN_DAYS) {
            return Err(ProtocolError::invalid_amount(format!(
                "loan term cannot exceed {} days",
                MAX_LOAN_DAYS
            ))
            .into());
        }
        let days = loan_days(days)?;
        let call = ContractCall::new(self.contract, EXTEND_LOAN, vec![days.into()]).with_value(fee);
        Ok(ActionRequest::new(OperationKind::ExtendLoan, call))
    }

    pub fn loan_call(&self, account: Address) -> ContractCall {
        ContractCall::new(self.contract, GET_LOAN_BY_ADDRESS, vec![account.into()])
    }

    pub fn last_price_call(&self) -> ContractCall {
        ContractCall::new(self.contract, LAST_PRICE, vec![])
    }

    pub fn leverage_fee_call(&self, eth: U256, days: u64) -> ContractCall {
        ContractCall::new(
            self.contract,
            LEVERAGE_FEE,
            vec![eth.into(), U256::from(days).into()],
        )
    }

    /// Interest charged on `borrowed` for `days` more days
    pub fn interest_fee_call(&self, borrowed: U256, days: u64) -> ContractCall {
        ContractCall::new(
            self.contract,
            GET_INTEREST_FEE,
            vec![borrowed.into(), U256::from(days).into()],
        )
    }
}

fn positive(input: &str, decimals: u8) -> Result<U256, Error> {
    let amount = parse_amount(input, decimals)?;
    if amount.is_zero() {
        return Err(ProtocolError::invalid_amount("amount must be greater than zero").into());
    }
    Ok(amount)
}

fn loan_days(days: u64) -> Result<U256, Error> {
    if days == 0 || days > MAX_LOAN_DAYS {
        return Err(ProtocolError::invalid_amount(format!(
            "loan term must be between 1 and {} days",
            MAX_LOAN_DAYS
        ))
        .into());
    }
    Ok(U256::from(days))
}

fn active(loan: Option<&LoanSnapshot>) -> Result<&LoanSnapshot, Error> {
    match loan {
        Some(loan) if loan.is_active() => Ok(loan),
        _ => Err(ProtocolError::not_allowed("no active loan").into()),
    }
}
