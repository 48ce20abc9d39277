//! Collaborator interfaces for chain reads and wallet submission

use std::future::Future;

use alloy_primitives::{Address, Bytes, U256};
use evm_codec::ContractCall;
use frame_core::{BlockNumber, ChainError, DecodeError, TxError, TxHash};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// A call or transaction as sent over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
    #[serde(default)]
    pub value: U256,
}

impl TxRequest {
    /// Encode a contract call into a request
    pub fn from_call(call: &ContractCall) -> Result<Self, DecodeError> {
        Ok(Self {
            from: None,
            to: call.to,
            data: call.encode()?,
            value: call.value,
        })
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// First four bytes of calldata, if present
    pub fn selector(&self) -> Option<[u8; 4]> {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(self.data.get(..4)?);
        Some(selector)
    }
}

/// Execution outcome recorded in a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Inclusion record for a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: BlockNumber,
    pub status: ReceiptStatus,
    pub gas_used: u64,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

/// Read-only chain access
pub trait ChainReader: Send + Sync {
    /// Execute a call against the latest block and return raw return data
    fn call(&self, request: &TxRequest) -> impl Future<Output = Result<Bytes, ChainError>> + Send;

    /// Receipt for `tx_hash`, or `None` while it is not yet included
    fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = Result<Option<Receipt>, ChainError>> + Send;

    /// Latest block number
    fn block_number(&self) -> impl Future<Output = Result<BlockNumber, ChainError>> + Send;
}

/// Connected wallet: account state plus transaction submission
///
/// The session is shared process-wide and only read here; connecting and
/// disconnecting is owned by whoever provides the implementation.
pub trait WalletSession: Send + Sync {
    /// Currently connected account
    fn account(&self) -> Option<Address>;

    /// Watch account changes (connect, switch, disconnect)
    fn subscribe(&self) -> watch::Receiver<Option<Address>>;

    /// Submit a transaction; resolves once the wallet hands back a hash
    fn send_transaction(
        &self,
        request: TxRequest,
    ) -> impl Future<Output = Result<TxHash, TxError>> + Send;

    /// Sign a plain-text message, returning the 0x-prefixed signature
    fn sign_message(&self, message: &str) -> impl Future<Output = Result<String, TxError>> + Send;
}
