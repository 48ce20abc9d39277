//! JSON-RPC implementation of the chain collaborators
//!
//! `RpcClient` speaks Ethereum JSON-RPC 2.0 over HTTP. `RpcWallet` submits
//! through a node-managed account (`eth_sendTransaction`), which is how a
//! wallet bridge or a local development node exposes signing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use frame_core::{BlockNumber, ChainError, RpcConfig, TxError, TxHash};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::watch;

use crate::session::Session;
use crate::traits::{ChainReader, Receipt, ReceiptStatus, TxRequest, WalletSession};

/// EIP-1193 "user rejected request"
const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// HTTP JSON-RPC client
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    pub fn new(config: &RpcConfig) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .user_agent("frame")
            .build()
            .map_err(|e| ChainError::Unreachable {
                url: format!("{}: {}", config.url, e),
            })?;

        Ok(Self {
            http,
            url: config.url.clone(),
            timeout: config.request_timeout(),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one JSON-RPC request and return the raw `result` (may be null)
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::trace!(method, id, "RPC request");

        let send = async {
            self.http
                .post(&self.url)
                .json(&body)
                .send()
                .await
                .map_err(|e| ChainError::Unreachable {
                    url: format!("{}: {}", self.url, e),
                })?
                .json::<RpcResponse>()
                .await
                .map_err(|e| ChainError::ParseError(e.to_string()))
        };

        let response = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| ChainError::Timeout {
                secs: self.timeout.as_secs(),
            })??;

        if let Some(error) = response.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result.unwrap_or(Value::Null))
    }

    /// `eth_chainId`
    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        let value = self.request("eth_chainId", json!([])).await?;
        parse_quantity(&value)
    }

    /// `eth_accounts` (node-managed accounts)
    pub async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        let value = self.request("eth_accounts", json!([])).await?;
        serde_json::from_value(value).map_err(|e| ChainError::ParseError(e.to_string()))
    }
}

impl ChainReader for RpcClient {
    async fn call(&self, request: &TxRequest) -> Result<Bytes, ChainError> {
        let value = self
            .request("eth_call", json!([tx_object(request), "latest"]))
            .await?;
        parse_bytes(&value)
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>, ChainError> {
        let value = self
            .request("eth_getTransactionReceipt", json!([tx_hash.to_string()]))
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        parse_receipt(&value).map(Some)
    }

    async fn block_number(&self) -> Result<BlockNumber, ChainError> {
        let value = self.request("eth_blockNumber", json!([])).await?;
        parse_quantity(&value)
    }
}

/// Wallet backed by a node-managed account
#[derive(Clone)]
pub struct RpcWallet {
    client: RpcClient,
    session: Session,
}

impl RpcWallet {
    pub fn new(client: RpcClient, session: Session) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Connect the session to the node's first managed account, if any
    pub async fn connect_first_account(&self) -> Result<Option<Address>, ChainError> {
        let account = self.client.accounts().await?.into_iter().next();
        if let Some(account) = account {
            self.session.connect(account);
        }
        Ok(account)
    }
}

impl WalletSession for RpcWallet {
    fn account(&self) -> Option<Address> {
        self.session.account()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Address>> {
        self.session.subscribe()
    }

    async fn send_transaction(&self, request: TxRequest) -> Result<TxHash, TxError> {
        let from = self.account().ok_or(TxError::NotConnected)?;
        let request = request.with_from(from);

        let value = self
            .client
            .request("eth_sendTransaction", json!([tx_object(&request)]))
            .await
            .map_err(map_submission_error)?;

        let hash = value
            .as_str()
            .ok_or_else(|| TxError::SubmissionFailed {
                message: format!("unexpected eth_sendTransaction result: {}", value),
            })?
            .parse::<TxHash>()
            .map_err(|e| TxError::SubmissionFailed { message: e })?;

        tracing::info!(tx_hash = %hash, to = %request.to, "Transaction submitted");
        Ok(hash)
    }

    async fn sign_message(&self, message: &str) -> Result<String, TxError> {
        let from = self.account().ok_or(TxError::NotConnected)?;
        let payload = format!("0x{}", hex::encode(message.as_bytes()));

        let value = self
            .client
            .request("personal_sign", json!([payload, from]))
            .await
            .map_err(map_submission_error)?;

        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TxError::SubmissionFailed {
                message: format!("unexpected personal_sign result: {}", value),
            })
    }
}

/// Wallet-side errors: a user rejection is distinct from every other failure
pub fn map_submission_error(e: ChainError) -> TxError {
    match e {
        ChainError::Rpc { code, message } if code == USER_REJECTED_CODE => {
            TxError::SubmissionRejected { message }
        }
        other => TxError::SubmissionFailed {
            message: other.to_string(),
        },
    }
}

fn tx_object(request: &TxRequest) -> Value {
    let mut obj = json!({
        "to": request.to,
        "data": format!("0x{}", hex::encode(&request.data)),
    });
    if let Some(from) = request.from {
        obj["from"] = json!(from);
    }
    if !request.value.is_zero() {
        obj["value"] = json!(format!("0x{:x}", request.value));
    }
    obj
}

fn parse_quantity(value: &Value) -> Result<u64, ChainError> {
    let s = value
        .as_str()
        .ok_or_else(|| ChainError::ParseError(format!("expected hex quantity, got {}", value)))?;
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|e| ChainError::ParseError(format!("invalid quantity {}: {}", s, e)))
}

fn parse_bytes(value: &Value) -> Result<Bytes, ChainError> {
    let s = value
        .as_str()
        .ok_or_else(|| ChainError::ParseError(format!("expected hex data, got {}", value)))?;
    hex::decode(s.trim_start_matches("0x"))
        .map(Bytes::from)
        .map_err(|e| ChainError::ParseError(format!("invalid hex data: {}", e)))
}

fn parse_receipt(value: &Value) -> Result<Receipt, ChainError> {
    let tx_hash = value["transactionHash"]
        .as_str()
        .ok_or_else(|| ChainError::ParseError("receipt missing transactionHash".into()))?
        .parse::<TxHash>()
        .map_err(ChainError::ParseError)?;

    // Pre-Byzantium receipts carry no status; every supported chain has it
    let status = match value["status"].as_str() {
        Some("0x1") => ReceiptStatus::Success,
        Some("0x0") => ReceiptStatus::Reverted,
        other => {
            return Err(ChainError::ParseError(format!(
                "unexpected receipt status {:?}",
                other
            )))
        }
    };

    Ok(Receipt {
        tx_hash,
        block_number: parse_quantity(&value["blockNumber"])?,
        status,
        gas_used: parse_quantity(&value["gasUsed"]).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(&json!("0x2105")).unwrap(), 8453);
        assert_eq!(parse_quantity(&json!("0x0")).unwrap(), 0);
        assert!(parse_quantity(&json!(12)).is_err());
        assert!(parse_quantity(&json!("0xzz")).is_err());
    }

    #[test]
    fn test_parse_bytes() {
        assert_eq!(parse_bytes(&json!("0x")).unwrap(), Bytes::new());
        assert_eq!(
            parse_bytes(&json!("0x0102")).unwrap(),
            Bytes::from(vec![1u8, 2])
        );
        assert!(parse_bytes(&json!(null)).is_err());
    }

    #[test]
    fn test_parse_receipt() {
        let raw = json!({
            "transactionHash": "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060",
            "blockNumber": "0x10",
            "status": "0x1",
            "gasUsed": "0x5208"
        });
        let receipt = parse_receipt(&raw).unwrap();
        assert_eq!(receipt.block_number, 16);
        assert_eq!(receipt.gas_used, 21_000);
        assert!(receipt.is_success());

        let reverted = json!({
            "transactionHash": "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060",
            "blockNumber": "0x10",
            "status": "0x0"
        });
        assert_eq!(
            parse_receipt(&reverted).unwrap().status,
            ReceiptStatus::Reverted
        );
    }

    #[test]
    fn test_user_rejection_maps_to_submission_rejected() {
        let err = map_submission_error(ChainError::Rpc {
            code: 4001,
            message: "User rejected the request.".into(),
        });
        assert!(matches!(err, TxError::SubmissionRejected { .. }));

        let err = map_submission_error(ChainError::Rpc {
            code: -32000,
            message: "insufficient funds".into(),
        });
        assert!(matches!(err, TxError::SubmissionFailed { .. }));
    }

    #[test]
    fn test_tx_object_omits_zero_value() {
        let request = TxRequest {
            from: None,
            to: Address::repeat_byte(0x11),
            data: Bytes::from(vec![0xde, 0xad]),
            value: U256::ZERO,
        };
        let obj = tx_object(&request);
        assert_eq!(obj["data"], "0xdead");
        assert!(obj.get("value").is_none());
        assert!(obj.get("from").is_none());

        let obj = tx_object(&TxRequest {
            value: U256::from(255u64),
            ..request
        });
        assert_eq!(obj["value"], "0xff");
    }
}
