//! Observable lifecycle status

use std::fmt;

use frame_core::TxHash;
use serde::Serialize;

/// Where the current operation is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowStatus {
    Idle,
    /// Reading the live allowance
    CheckingAllowance,
    /// Approval sent to the wallet, waiting for the user to sign
    AwaitingApproval,
    /// Approval accepted by the mempool, waiting for inclusion
    ApprovalPending { tx_hash: TxHash },
    ApprovalConfirmed,
    /// Action sent to the wallet, waiting for the user to sign
    ActionSubmitted,
    /// Action accepted by the mempool, waiting for inclusion
    ActionPending { tx_hash: TxHash },
    Succeeded { tx_hash: TxHash },
    Failed { error: String },
}

impl FlowStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }

    /// An operation is in flight
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle) && !self.is_terminal()
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Ready"),
            Self::CheckingAllowance => write!(f, "Checking allowance..."),
            Self::AwaitingApproval => write!(f, "Approve spending in your wallet..."),
            Self::ApprovalPending { tx_hash } => {
                write!(f, "Approval submitted ({}), waiting for confirmation...", tx_hash.short())
            }
            Self::ApprovalConfirmed => write!(f, "Approval confirmed"),
            Self::ActionSubmitted => write!(f, "Confirm the transaction in your wallet..."),
            Self::ActionPending { tx_hash } => {
                write!(f, "Transaction submitted ({}), waiting for confirmation...", tx_hash.short())
            }
            Self::Succeeded { tx_hash } => write!(f, "Transaction confirmed ({})", tx_hash.short()),
            Self::Failed { error } => write!(f, "Failed: {}", error),
        }
    }
}

/// Truncate `message` to at most `max_chars` characters, marking the cut
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let kept: String = message.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
