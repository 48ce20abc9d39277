//! Megapot contract calls and action builders

use alloy_primitives::{Address, U256};
use evm_codec::{AbiType, ContractCall, FunctionSig};
use frame_core::{ContractsConfig, Error, ProtocolError};
use tx_flow::{ActionRequest, OperationKind};

use crate::calculator::{subscription_cost, ticket_cost};
use crate::constants::{MAX_SUBSCRIPTION_DAYS, MAX_TICKETS_PER_PURCHASE};
use crate::state::{SubscriptionSnapshot, UserInfo};

const UINT: AbiType = AbiType::Uint256;

pub const PURCHASE_TICKETS: FunctionSig = FunctionSig::new(
    "purchaseTickets",
    &[AbiType::Address, UINT, AbiType::Address],
    &[],
);
pub const TICKET_PRICE: FunctionSig = FunctionSig::new("ticketPrice", &[], &[UINT]);
pub const WITHDRAW_WINNINGS: FunctionSig = FunctionSig::new("withdrawWinnings", &[], &[]);
pub const USERS_INFO: FunctionSig =
    FunctionSig::new("usersInfo", &[AbiType::Address], &[UINT, UINT, AbiType::Bool]);

pub const SUBSCRIBE: FunctionSig = FunctionSig::new("subscribe", &[UINT, UINT], &[]);
pub const CANCEL_SUBSCRIPTION: FunctionSig = FunctionSig::new("cancelSubscription", &[], &[]);
pub const GET_SUBSCRIPTION: FunctionSig = FunctionSig::new(
    "getSubscription",
    &[AbiType::Address],
    &[UINT, UINT, UINT, AbiType::Bool],
);

/// Jackpot plus its optional subscription contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Megapot {
    pub jackpot: Address,
    pub subscription: Option<Address>,
    pub usdc: Address,
    /// Credited with referral fees on purchases; zero for none
    pub referrer: Address,
}

impl Megapot {
    pub fn new(jackpot: Address, subscription: Option<Address>, usdc: Address) -> Self {
        Self {
            jackpot,
            subscription,
            usdc,
            referrer: Address::ZERO,
        }
    }

    pub fn with_referrer(mut self, referrer: Address) -> Self {
        self.referrer = referrer;
        self
    }

    /// Buy `tickets` for `recipient` at the current `ticket_price`
    pub fn purchase_tickets(
        &self,
        recipient: Address,
        tickets: u64,
        ticket_price: U256,
    ) -> Result<ActionRequest, Error> {
        if tickets == 0 || tickets > MAX_TICKETS_PER_PURCHASE {
            return Err(ProtocolError::invalid_amount(format!(
                "ticket count must be between 1 and {}",
                MAX_TICKETS_PER_PURCHASE
            ))
            .into());
        }
        if ticket_price.is_zero() {
            return Err(ProtocolError::not_allowed("ticket price unavailable").into());
        }
        let cost = ticket_cost(tickets, ticket_price);
        let call = ContractCall::new(
            self.jackpot,
            PURCHASE_TICKETS,
            vec![self.referrer.into(), cost.into(), recipient.into()],
        );
        Ok(ActionRequest::new(OperationKind::PurchaseTickets, call).with_approval(
            self.usdc,
            self.jackpot,
            cost,
            "USDC",
        ))
    }

    pub fn withdraw_winnings(&self, info: Option<&UserInfo>) -> Result<ActionRequest, Error> {
        match info {
            Some(info) if info.has_winnings() => {}
            _ => return Err(ProtocolError::not_allowed("no winnings to withdraw").into()),
        }
        let call = ContractCall::new(self.jackpot, WITHDRAW_WINNINGS, vec![]);
        Ok(ActionRequest::new(OperationKind::WithdrawWinnings, call))
    }

    /// Subscribe to `tickets_per_day` for `days`; approves the whole term
    pub fn subscribe(
        &self,
        current: Option<&SubscriptionSnapshot>,
        tickets_per_day: u64,
        days: u64,
        ticket_price: U256,
    ) -> Result<ActionRequest, Error> {
        let contract = self.subscription_contract()?;
        if current.is_some_and(|s| s.is_active) {
            return Err(ProtocolError::not_allowed("subscription already active").into());
        }
        if tickets_per_day == 0 || days == 0 || days > MAX_SUBSCRIPTION_DAYS {
            return Err(ProtocolError::invalid_amount(format!(
                "need at least one ticket per day for 1 to {} days",
                MAX_SUBSCRIPTION_DAYS
            ))
            .into());
        }
        if ticket_price.is_zero() {
            return Err(ProtocolError::not_allowed("ticket price unavailable").into());
        }
        let total = subscription_cost(tickets_per_day, days, ticket_price);
        let call = ContractCall::new(
            contract,
            SUBSCRIBE,
            vec![U256::from(tickets_per_day).into(), U256::from(days).into()],
        );
        Ok(ActionRequest::new(OperationKind::Subscribe, call).with_approval(
            self.usdc,
            contract,
            total,
            "USDC",
        ))
    }

    pub fn cancel_subscription(
        &self,
        current: Option<&SubscriptionSnapshot>,
    ) -> Result<ActionRequest, Error> {
        let contract = self.subscription_contract()?;
        if !current.is_some_and(|s| s.is_active) {
            return Err(ProtocolError::not_allowed("no active subscription").into());
        }
        let call = ContractCall::new(contract, CANCEL_SUBSCRIPTION, vec![]);
        Ok(ActionRequest::new(OperationKind::CancelSubscription, call))
    }

    pub fn ticket_price_call(&self) -> ContractCall {
        ContractCall::new(self.jackpot, TICKET_PRICE, vec![])
    }

    pub fn users_info_call(&self, account: Address) -> ContractCall {
        ContractCall::new(self.jackpot, USERS_INFO, vec![account.into()])
    }

    pub fn subscription_call(&self, account: Address) -> Result<ContractCall, ProtocolError> {
        Ok(ContractCall::new(
            self.subscription_contract()?,
            GET_SUBSCRIPTION,
            vec![account.into()],
        ))
    }

    fn subscription_contract(&self) -> Result<Address, ProtocolError> {
        ContractsConfig::require(self.subscription, "megapot_subscription")
    }
}
