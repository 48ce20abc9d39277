//! chain-client: EVM chain access for the frame workspace
//!
//! This crate provides the two collaborators every contract interaction
//! needs: a read client (`ChainReader`) and a wallet session
//! (`WalletSession`), plus a JSON-RPC implementation of both and the
//! receipt-polling primitive used to confirm submitted transactions.

pub mod confirm;
pub mod queries;
pub mod rpc;
pub mod session;
pub mod traits;

#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

pub use confirm::{wait_for_receipt, ConfirmPolicy};
pub use queries::{read_allowance, read_contract};
pub use rpc::{RpcClient, RpcWallet};
pub use session::Session;
pub use traits::{ChainReader, Receipt, ReceiptStatus, TxRequest, WalletSession};
