//! Operation descriptors and the in-flight operation record

use std::time::SystemTime;

use alloy_primitives::{Address, U256};
use evm_codec::ContractCall;
use frame_core::TxHash;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::FlowStatus;

/// Every user-triggerable action across the frame contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Buy,
    Sell,
    Leverage,
    Borrow,
    Repay,
    ClosePosition,
    ExtendLoan,
    PurchaseTickets,
    Subscribe,
    CancelSubscription,
    WithdrawWinnings,
    MintNft,
    DeployMiners,
    ClaimEth,
    ClaimToken,
}

impl OperationKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Leverage => "Leverage",
            Self::Borrow => "Borrow",
            Self::Repay => "Repay",
            Self::ClosePosition => "Close position",
            Self::ExtendLoan => "Extend loan",
            Self::PurchaseTickets => "Purchase tickets",
            Self::Subscribe => "Subscribe",
            Self::CancelSubscription => "Cancel subscription",
            Self::WithdrawWinnings => "Withdraw winnings",
            Self::MintNft => "Mint",
            Self::DeployMiners => "Deploy miners",
            Self::ClaimEth => "Claim ETH",
            Self::ClaimToken => "Claim tokens",
        }
    }

    /// Success empties the account's position; the cached snapshot must be
    /// dropped right away instead of waiting for the delayed refresh.
    pub fn clears_position(&self) -> bool {
        matches!(
            self,
            Self::ClosePosition
                | Self::CancelSubscription
                | Self::WithdrawWinnings
                | Self::ClaimEth
                | Self::ClaimToken
        )
    }
}

/// One transaction of a multi-step operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Approve,
    Act,
}

/// An ERC-20 spend that must be approved before the action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRequirement {
    pub token: Address,
    pub spender: Address,
    pub amount: U256,
    pub token_symbol: &'static str,
}

/// What the user asked for: the primary call plus an optional approval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub kind: OperationKind,
    pub call: ContractCall,
    pub approval: Option<ApprovalRequirement>,
}

impl ActionRequest {
    pub fn new(kind: OperationKind, call: ContractCall) -> Self {
        Self {
            kind,
            call,
            approval: None,
        }
    }

    /// Require `spender` to hold an allowance of at least `amount` of `token`
    pub fn with_approval(
        mut self,
        token: Address,
        spender: Address,
        amount: U256,
        token_symbol: &'static str,
    ) -> Self {
        self.approval = Some(ApprovalRequirement {
            token,
            spender,
            amount,
            token_symbol,
        });
        self
    }
}

/// The operation currently owned by an orchestrator
#[derive(Debug, Clone, Serialize)]
pub struct PendingOperation {
    pub id: Uuid,
    pub kind: OperationKind,
    pub steps: Vec<Step>,
    pub current_step: usize,
    pub status: FlowStatus,
    pub last_error: Option<String>,
    pub approval_tx: Option<TxHash>,
    pub action_tx: Option<TxHash>,
    pub started_at: SystemTime,
}

impl PendingOperation {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            steps: vec![Step::Act],
            current_step: 0,
            status: FlowStatus::Idle,
            last_error: None,
            approval_tx: None,
            action_tx: None,
            started_at: SystemTime::now(),
        }
    }

    pub fn current(&self) -> Option<Step> {
        self.steps.get(self.current_step).copied()
    }

    pub fn requires_approval(&self) -> bool {
        self.steps.contains(&Step::Approve)
    }
}
