//! In-memory fakes of `ChainReader` and `WalletSession` for tests

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{Address, Bytes, B256, U256};
use evm_codec::FunctionSig;
use frame_core::{BlockNumber, ChainError, TxError, TxHash};
use tokio::sync::watch;

use crate::session::Session;
use crate::traits::{ChainReader, Receipt, ReceiptStatus, TxRequest, WalletSession};

/// Deterministic hash for sequence number `n`
pub fn tx_hash(n: u64) -> TxHash {
    TxHash::new(B256::from(U256::from(n).to_be_bytes::<32>()))
}

/// ABI word for a uint value
pub fn uint_word(value: U256) -> Vec<u8> {
    value.to_be_bytes::<32>().to_vec()
}

/// Concatenate uint words into return data
pub fn uint_words(values: &[U256]) -> Bytes {
    Bytes::from(values.iter().flat_map(|v| uint_word(*v)).collect::<Vec<u8>>())
}

struct PendingReceipt {
    status: ReceiptStatus,
    /// Query number (1-based) at which the receipt becomes visible
    visible_at: usize,
}

#[derive(Default)]
struct ChainState {
    responses: HashMap<(Address, [u8; 4]), Bytes>,
    receipts: HashMap<TxHash, PendingReceipt>,
    receipt_queries: HashMap<TxHash, usize>,
    failing_receipts: usize,
    failing_calls: bool,
    auto_confirm: Option<ReceiptStatus>,
    calls: Vec<TxRequest>,
    block: BlockNumber,
}

/// Scriptable chain: canned call responses and receipts
#[derive(Default)]
pub struct MockChain {
    state: Mutex<ChainState>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every queried hash is immediately included with `Success`
    pub fn auto_confirming() -> Self {
        let chain = Self::new();
        chain.lock().auto_confirm = Some(ReceiptStatus::Success);
        chain
    }

    /// Stop auto-confirming; unknown hashes stay pending
    pub fn hold_confirmations(&self) {
        self.lock().auto_confirm = None;
    }

    /// Respond to calls of `function` on `to` with raw `data`
    pub fn respond(&self, to: Address, function: &FunctionSig, data: Bytes) {
        self.lock().responses.insert((to, function.selector()), data);
    }

    /// Respond to calls of `function` on `to` with uint words
    pub fn respond_uints(&self, to: Address, function: &FunctionSig, values: &[U256]) {
        self.respond(to, function, uint_words(values));
    }

    /// Make every call fail with an RPC error
    pub fn fail_calls(&self, failing: bool) {
        self.lock().failing_calls = failing;
    }

    /// Include `hash` now
    pub fn include(&self, hash: TxHash, status: ReceiptStatus) {
        self.include_after(hash, status, 1);
    }

    /// Include `hash` so that the `queries`-th receipt query sees it
    pub fn include_after(&self, hash: TxHash, status: ReceiptStatus, queries: usize) {
        let mut state = self.lock();
        let seen = state.receipt_queries.get(&hash).copied().unwrap_or(0);
        state.receipts.insert(
            hash,
            PendingReceipt {
                status,
                visible_at: seen + queries,
            },
        );
    }

    /// Fail the next `n` receipt queries
    pub fn fail_receipts(&self, n: usize) {
        self.lock().failing_receipts = n;
    }

    pub fn receipt_queries(&self, hash: TxHash) -> usize {
        self.lock().receipt_queries.get(&hash).copied().unwrap_or(0)
    }

    /// All `eth_call` requests seen so far
    pub fn calls(&self) -> Vec<TxRequest> {
        self.lock().calls.clone()
    }

    /// Number of calls made with `function`'s selector
    pub fn call_count(&self, function: &FunctionSig) -> usize {
        let selector = function.selector();
        self.lock()
            .calls
            .iter()
            .filter(|c| c.selector() == Some(selector))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChainReader for MockChain {
    async fn call(&self, request: &TxRequest) -> Result<Bytes, ChainError> {
        let mut state = self.lock();
        state.calls.push(request.clone());
        if state.failing_calls {
            return Err(ChainError::Rpc {
                code: -32000,
                message: "execution reverted".into(),
            });
        }
        let key = match request.selector() {
            Some(selector) => (request.to, selector),
            None => return Ok(Bytes::new()),
        };
        Ok(state.responses.get(&key).cloned().unwrap_or_default())
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>, ChainError> {
        let mut state = self.lock();
        state.block += 1;
        let block = state.block;
        let count = state.receipt_queries.entry(tx_hash).or_insert(0);
        *count += 1;
        let count = *count;

        if state.failing_receipts > 0 {
            state.failing_receipts -= 1;
            return Err(ChainError::Unreachable {
                url: "mock".into(),
            });
        }

        let status = match state.receipts.get(&tx_hash) {
            Some(pending) if count >= pending.visible_at => Some(pending.status),
            Some(_) => None,
            None => state.auto_confirm,
        };

        Ok(status.map(|status| Receipt {
            tx_hash,
            block_number: block,
            status,
            gas_used: 21_000,
        }))
    }

    async fn block_number(&self) -> Result<BlockNumber, ChainError> {
        Ok(self.lock().block)
    }
}

#[derive(Default)]
struct WalletState {
    sent: Vec<TxRequest>,
    rejected_selectors: Vec<[u8; 4]>,
    next_hash: u64,
}

/// Wallet that records submissions and hands out sequential hashes
pub struct MockWallet {
    session: Session,
    state: Mutex<WalletState>,
}

impl MockWallet {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            state: Mutex::new(WalletState::default()),
        }
    }

    pub fn connected(account: Address) -> Self {
        Self::new(Session::connected(account))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Simulate the user declining any transaction calling `function`
    pub fn reject(&self, function: &FunctionSig) {
        self.lock().rejected_selectors.push(function.selector());
    }

    /// Transactions accepted so far, in submission order
    pub fn sent(&self) -> Vec<TxRequest> {
        self.lock().sent.clone()
    }

    /// Number of accepted transactions calling `function`
    pub fn sent_count(&self, function: &FunctionSig) -> usize {
        let selector = function.selector();
        self.lock()
            .sent
            .iter()
            .filter(|r| r.selector() == Some(selector))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WalletState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl WalletSession for MockWallet {
    fn account(&self) -> Option<Address> {
        self.session.account()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Address>> {
        self.session.subscribe()
    }

    async fn send_transaction(&self, request: TxRequest) -> Result<TxHash, TxError> {
        let mut state = self.lock();
        if let Some(selector) = request.selector() {
            if state.rejected_selectors.contains(&selector) {
                return Err(TxError::SubmissionRejected {
                    message: "User rejected the request.".into(),
                });
            }
        }
        state.next_hash += 1;
        state.sent.push(request);
        Ok(tx_hash(state.next_hash))
    }

    async fn sign_message(&self, message: &str) -> Result<String, TxError> {
        Ok(format!("0x{}", hex::encode(message.as_bytes())))
    }
}
