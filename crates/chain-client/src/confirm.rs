//! Receipt confirmation
//!
//! Polls the chain for the receipt of one specific transaction hash. Each
//! wait is keyed by the hash it was started with, so confirmation can never
//! be attributed to a different in-flight transaction.

use std::time::Duration;

use frame_core::{TxError, TxFlowConfig, TxHash};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::traits::{ChainReader, Receipt, ReceiptStatus};

/// How to wait for a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        Self::from(&TxFlowConfig::default())
    }
}

impl From<&TxFlowConfig> for ConfirmPolicy {
    fn from(config: &TxFlowConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            timeout: config.confirmation_timeout(),
        }
    }
}

/// Wait until `tx_hash` is included.
///
/// - Included and successful: `Ok(receipt)`
/// - Included but reverted: `TxError::TransactionReverted`
/// - Not included within `policy.timeout`: `TxError::Timeout`
///
/// RPC errors while polling are treated as transient and retried on the
/// next tick; the timeout still bounds the total wait.
pub async fn wait_for_receipt<C: ChainReader>(
    client: &C,
    tx_hash: TxHash,
    policy: &ConfirmPolicy,
) -> Result<Receipt, TxError> {
    let started = Instant::now();
    let mut ticker = time::interval(policy.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let poll = async {
        loop {
            ticker.tick().await;
            match client.transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => return receipt,
                Ok(None) => {
                    tracing::trace!(tx_hash = %tx_hash, "Receipt not yet available");
                }
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt poll failed, retrying");
                }
            }
        }
    };

    let receipt = time::timeout(policy.timeout, poll)
        .await
        .map_err(|_| TxError::Timeout {
            tx_hash,
            waited_secs: started.elapsed().as_secs(),
        })?;

    match receipt.status {
        ReceiptStatus::Success => {
            tracing::debug!(
                tx_hash = %tx_hash,
                block = receipt.block_number,
                "Transaction confirmed"
            );
            Ok(receipt)
        }
        ReceiptStatus::Reverted => Err(TxError::TransactionReverted { tx_hash }),
    }
}
