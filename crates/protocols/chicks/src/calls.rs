//! Chicks contract calls and action builders

use alloy_primitives::{Address, U256};
use evm_codec::{parse_amount, AbiType, ContractCall, FunctionSig};
use frame_core::constants::USDC_DECIMALS;
use frame_core::{Error, ProtocolError};
use tx_flow::{ActionRequest, OperationKind};

use crate::constants::CHICKS_DECIMALS;

pub const BUY: FunctionSig = FunctionSig::new("buy", &[AbiType::Address, AbiType::Uint256], &[]);
pub const SELL: FunctionSig = FunctionSig::new("sell", &[AbiType::Uint256], &[]);
pub const LAST_PRICE: FunctionSig = FunctionSig::new("lastPrice", &[], &[AbiType::Uint256]);
pub const GET_BUY_TOKENS: FunctionSig =
    FunctionSig::new("getBuyTokens", &[AbiType::Uint256], &[AbiType::Uint256]);

/// A deployed Chicks market and the USDC token it accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChicksMarket {
    pub market: Address,
    pub usdc: Address,
}

impl ChicksMarket {
    pub fn new(market: Address, usdc: Address) -> Self {
        Self { market, usdc }
    }

    /// Buy CHICKS for `receiver`, spending `usdc` (decimal input)
    pub fn buy(&self, receiver: Address, usdc: &str) -> Result<ActionRequest, Error> {
        let amount = positive(usdc, USDC_DECIMALS)?;
        let call = ContractCall::new(self.market, BUY, vec![receiver.into(), amount.into()]);
        Ok(ActionRequest::new(OperationKind::Buy, call).with_approval(
            self.usdc,
            self.market,
            amount,
            "USDC",
        ))
    }

    /// Sell `tokens` CHICKS (decimal input)
    pub fn sell(&self, tokens: &str) -> Result<ActionRequest, Error> {
        let amount = positive(tokens, CHICKS_DECIMALS)?;
        let call = ContractCall::new(self.market, SELL, vec![amount.into()]);
        Ok(ActionRequest::new(OperationKind::Sell, call))
    }

    pub fn last_price_call(&self) -> ContractCall {
        ContractCall::new(self.market, LAST_PRICE, vec![])
    }

    pub fn buy_tokens_call(&self, usdc: U256) -> ContractCall {
        ContractCall::new(self.market, GET_BUY_TOKENS, vec![usdc.into()])
    }
}

fn positive(input: &str, decimals: u8) -> Result<U256, Error> {
    let amount = parse_amount(input, decimals)?;
    if amount.is_zero() {
        return Err(ProtocolError::invalid_amount("amount must be greater than zero").into());
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evm_codec::erc20::APPROVE;
    use evm_codec::AbiValue;

    fn market() -> ChicksMarket {
        ChicksMarket::new(Address::repeat_byte(0xcc), Address::repeat_byte(0xaa))
    }

    #[test]
    fn test_buy_requires_usdc_approval() {
        let receiver = Address::repeat_byte(1);
        let request = market().buy(receiver, "100").unwrap();

        assert_eq!(request.kind, OperationKind::Buy);
        assert_eq!(request.call.to, market().market);
        assert_eq!(request.call.args[1], AbiValue::Uint(U256::from(100_000_000u64)));

        let approval = request.approval.unwrap();
        assert_eq!(approval.token, market().usdc);
        assert_eq!(approval.spender, market().market);
        assert_eq!(approval.amount, U256::from(100_000_000u64));
        assert_ne!(BUY.selector(), APPROVE.selector());
    }

    #[test]
    fn test_sell_has_no_approval() {
        let request = market().sell("2000").unwrap();
        assert!(request.approval.is_none());
        assert_eq!(
            request.call.args[0],
            AbiValue::Uint(U256::from(2000u64) * U256::from(10u64).pow(U256::from(18u64)))
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(market().buy(Address::ZERO, "abc"), Err(Error::Amount(_))));
        assert!(matches!(market().buy(Address::ZERO, ""), Err(Error::Amount(_))));
        assert!(matches!(market().sell("0"), Err(Error::Protocol(_))));
    }
}
