//! Approve-then-act orchestration
//!
//! One `Orchestrator` owns at most one live operation. Starting a new
//! operation supersedes the previous one: the old task stops at its next
//! await point and none of its later outcomes are published.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::Address;
use chain_client::{wait_for_receipt, ChainReader, ConfirmPolicy, Receipt, TxRequest, WalletSession};
use evm_codec::erc20::approve_call;
use frame_core::{TxError, TxFlowConfig, TxHash};
use futures::future::BoxFuture;
use tokio::sync::watch;

use crate::allowance::{allowance_state, AllowanceState};
use crate::operation::{ActionRequest, ApprovalRequirement, OperationKind, PendingOperation, Step};
use crate::status::{truncate_message, FlowStatus};

/// Runs synchronously as soon as an operation succeeds
pub type SuccessHook = Arc<dyn Fn(OperationKind) + Send + Sync>;

/// Runs once per successful operation, after the configured refresh delay
pub type RefreshHook = Arc<dyn Fn(OperationKind) -> BoxFuture<'static, ()> + Send + Sync>;

struct Slot {
    generation: u64,
    op: Option<PendingOperation>,
}

pub struct Orchestrator<W, C> {
    wallet: Arc<W>,
    chain: Arc<C>,
    config: TxFlowConfig,
    policy: ConfirmPolicy,
    slot: Mutex<Slot>,
    status: watch::Sender<FlowStatus>,
    generation: watch::Sender<u64>,
    on_success: Option<SuccessHook>,
    refresh: Option<RefreshHook>,
}

impl<W, C> Orchestrator<W, C>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    pub fn new(wallet: Arc<W>, chain: Arc<C>, config: TxFlowConfig) -> Self {
        let (status, _) = watch::channel(FlowStatus::Idle);
        let (generation, _) = watch::channel(0);
        Self {
            wallet,
            chain,
            policy: ConfirmPolicy::from(&config),
            config,
            slot: Mutex::new(Slot {
                generation: 0,
                op: None,
            }),
            status,
            generation,
            on_success: None,
            refresh: None,
        }
    }

    pub fn with_on_success(mut self, hook: SuccessHook) -> Self {
        self.on_success = Some(hook);
        self
    }

    pub fn with_refresh(mut self, hook: RefreshHook) -> Self {
        self.refresh = Some(hook);
        self
    }

    pub fn wallet(&self) -> &Arc<W> {
        &self.wallet
    }

    pub fn chain(&self) -> &Arc<C> {
        &self.chain
    }

    pub fn config(&self) -> &TxFlowConfig {
        &self.config
    }

    pub fn status(&self) -> FlowStatus {
        self.status.borrow().clone()
    }

    /// Human-readable status, prefixed with the operation and length-bounded
    pub fn status_message(&self) -> String {
        let status = self.status();
        let message = match self.pending() {
            Some(op) if status != FlowStatus::Idle => format!("{}: {}", op.kind.label(), status),
            _ => status.to_string(),
        };
        truncate_message(&message, self.config.status_message_max_len)
    }

    pub fn subscribe(&self) -> watch::Receiver<FlowStatus> {
        self.status.subscribe()
    }

    /// The live or most recently finished operation
    pub fn pending(&self) -> Option<PendingOperation> {
        self.lock_slot().op.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.status.borrow().is_busy()
    }

    /// Abandon any live operation and return to `Idle`
    pub fn reset(&self) {
        let mut slot = self.lock_slot();
        slot.generation += 1;
        slot.op = None;
        self.generation.send_replace(slot.generation);
        self.status.send_replace(FlowStatus::Idle);
        tracing::debug!(generation = slot.generation, "Orchestrator reset");
    }

    /// Fresh allowance check for the connected account
    pub async fn allowance_state(
        &self,
        approval: &ApprovalRequirement,
    ) -> Result<AllowanceState, TxError> {
        let owner = self.wallet.account().ok_or(TxError::NotConnected)?;
        allowance_state(
            self.chain.as_ref(),
            approval.token,
            owner,
            approval.spender,
            approval.amount,
        )
        .await
        .map_err(|e| TxError::SubmissionFailed {
            message: e.to_string(),
        })
    }

    /// Look up a receipt directly, e.g. after a confirmation timeout
    pub async fn recheck(&self, tx_hash: TxHash) -> Result<Option<Receipt>, TxError> {
        let receipt = self.chain.transaction_receipt(tx_hash).await?;
        tracing::debug!(
            tx_hash = %tx_hash,
            included = receipt.is_some(),
            "Manual receipt check"
        );
        Ok(receipt)
    }

    /// Drive `request` to a terminal state
    ///
    /// Returns `Superseded` when another operation started (or `reset` was
    /// called) before this one finished.
    pub async fn execute(&self, request: ActionRequest) -> Result<Receipt, TxError> {
        let kind = request.kind;
        let generation = self.begin(kind);

        let Some(account) = self.wallet.account() else {
            tracing::warn!(kind = kind.label(), "Operation requested without a connected wallet");
            return match self.fail(generation, &TxError::NotConnected) {
                Ok(()) => Err(TxError::NotConnected),
                Err(superseded) => Err(superseded),
            };
        };

        let outcome = self
            .observe(generation, self.run(generation, account, &request))
            .await;

        match outcome {
            Ok(receipt) => {
                self.transition(
                    generation,
                    FlowStatus::Succeeded {
                        tx_hash: receipt.tx_hash,
                    },
                )?;
                tracing::info!(
                    kind = kind.label(),
                    tx_hash = %receipt.tx_hash,
                    block = receipt.block_number,
                    "Operation succeeded"
                );
                self.after_success(kind);
                Ok(receipt)
            }
            Err(TxError::Superseded) => {
                tracing::debug!(kind = kind.label(), generation, "Operation superseded");
                Err(TxError::Superseded)
            }
            Err(e) => {
                tracing::warn!(kind = kind.label(), error = %e, "Operation failed");
                self.fail(generation, &e)?;
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        generation: u64,
        account: Address,
        request: &ActionRequest,
    ) -> Result<Receipt, TxError> {
        if let Some(approval) = &request.approval {
            self.transition(generation, FlowStatus::CheckingAllowance)?;
            let allowance = self.read_allowance_or_zero(account, approval).await;
            if allowance.needs_approval() {
                self.approve(generation, approval).await?;
            } else {
                tracing::debug!(
                    token = approval.token_symbol,
                    current = %allowance.current,
                    required = %allowance.required,
                    "Allowance sufficient, skipping approval"
                );
            }
        }

        self.update_op(generation, |op| op.current_step = op.steps.len() - 1)?;
        self.transition(generation, FlowStatus::ActionSubmitted)?;
        let tx = TxRequest::from_call(&request.call)?;
        let tx_hash = self.wallet.send_transaction(tx).await?;
        self.update_op(generation, |op| op.action_tx = Some(tx_hash))?;
        self.transition(generation, FlowStatus::ActionPending { tx_hash })?;

        wait_for_receipt(self.chain.as_ref(), tx_hash, &self.policy).await
    }

    async fn approve(&self, generation: u64, approval: &ApprovalRequirement) -> Result<(), TxError> {
        self.update_op(generation, |op| {
            op.steps = vec![Step::Approve, Step::Act];
            op.current_step = 0;
        })?;
        self.transition(generation, FlowStatus::AwaitingApproval)?;

        let call = approve_call(approval.token, approval.spender, approval.amount);
        let tx_hash = self.wallet.send_transaction(TxRequest::from_call(&call)?).await?;
        self.update_op(generation, |op| op.approval_tx = Some(tx_hash))?;
        self.transition(generation, FlowStatus::ApprovalPending { tx_hash })?;
        tracing::info!(
            token = approval.token_symbol,
            spender = %approval.spender,
            tx_hash = %tx_hash,
            "Approval submitted"
        );

        wait_for_receipt(self.chain.as_ref(), tx_hash, &self.policy).await?;
        self.transition(generation, FlowStatus::ApprovalConfirmed)
    }

    async fn read_allowance_or_zero(
        &self,
        owner: Address,
        approval: &ApprovalRequirement,
    ) -> AllowanceState {
        match allowance_state(
            self.chain.as_ref(),
            approval.token,
            owner,
            approval.spender,
            approval.amount,
        )
        .await
        {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    token = approval.token_symbol,
                    error = %e,
                    "Allowance read failed, requesting approval"
                );
                AllowanceState::unknown(approval.amount)
            }
        }
    }

    /// Race `fut` against supersession of `generation`
    async fn observe<T>(
        &self,
        generation: u64,
        fut: impl Future<Output = Result<T, TxError>>,
    ) -> Result<T, TxError> {
        let superseded = superseded(self.generation.subscribe(), generation);
        tokio::select! {
            result = fut => result,
            () = superseded => Err(TxError::Superseded),
        }
    }

    fn begin(&self, kind: OperationKind) -> u64 {
        let mut slot = self.lock_slot();
        slot.generation += 1;
        let op = PendingOperation::new(kind);
        tracing::debug!(
            id = %op.id,
            kind = kind.label(),
            generation = slot.generation,
            "Operation started"
        );
        slot.op = Some(op);
        self.generation.send_replace(slot.generation);
        self.status.send_replace(FlowStatus::Idle);
        slot.generation
    }

    /// Publish `status` if `generation` still owns the slot
    fn transition(&self, generation: u64, status: FlowStatus) -> Result<(), TxError> {
        let mut slot = self.lock_slot();
        if slot.generation != generation {
            return Err(TxError::Superseded);
        }
        if let Some(op) = slot.op.as_mut() {
            op.status = status.clone();
            tracing::debug!(id = %op.id, status = %status, "Status transition");
        }
        self.status.send_replace(status);
        Ok(())
    }

    fn update_op(
        &self,
        generation: u64,
        f: impl FnOnce(&mut PendingOperation),
    ) -> Result<(), TxError> {
        let mut slot = self.lock_slot();
        if slot.generation != generation {
            return Err(TxError::Superseded);
        }
        if let Some(op) = slot.op.as_mut() {
            f(op);
        }
        Ok(())
    }

    fn fail(&self, generation: u64, error: &TxError) -> Result<(), TxError> {
        let message = error.to_string();
        self.update_op(generation, |op| op.last_error = Some(message.clone()))?;
        self.transition(
            generation,
            FlowStatus::Failed {
                error: truncate_message(&message, self.config.status_message_max_len),
            },
        )
    }

    fn after_success(&self, kind: OperationKind) {
        if let Some(hook) = &self.on_success {
            hook(kind);
        }
        if let Some(refresh) = self.refresh.clone() {
            let delay = self.config.refresh_delay();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                tracing::debug!(kind = kind.label(), "Refreshing after confirmation");
                refresh(kind).await;
            });
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Resolves once the published generation moves past `generation`
async fn superseded(mut rx: watch::Receiver<u64>, generation: u64) {
    loop {
        if *rx.borrow_and_update() != generation {
            return;
        }
        if rx.changed().await.is_err() {
            // Sender dropped with the orchestrator; nothing can supersede us
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use alloy_primitives::U256;
    use chain_client::mock::{tx_hash, MockChain, MockWallet};
    use chain_client::ReceiptStatus;
    use evm_codec::erc20::{ALLOWANCE, APPROVE};
    use evm_codec::{AbiType, ContractCall, FunctionSig};
    use futures::FutureExt;

    const BUY: FunctionSig = FunctionSig::new("buy", &[AbiType::Address, AbiType::Uint256], &[]);
    const SELL: FunctionSig = FunctionSig::new("sell", &[AbiType::Uint256], &[]);

    fn usdc() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn market() -> Address {
        Address::repeat_byte(0xbb)
    }

    fn user() -> Address {
        Address::repeat_byte(0x01)
    }

    fn amount() -> U256 {
        U256::from(100_000_000u64)
    }

    fn config() -> TxFlowConfig {
        TxFlowConfig {
            poll_interval_ms: 1_000,
            confirmation_timeout_secs: 30,
            refresh_delay_ms: 3_000,
            ..TxFlowConfig::default()
        }
    }

    fn buy_request() -> ActionRequest {
        let call = ContractCall::new(market(), BUY, vec![user().into(), amount().into()]);
        ActionRequest::new(OperationKind::Buy, call).with_approval(usdc(), market(), amount(), "USDC")
    }

    fn sell_request() -> ActionRequest {
        let call = ContractCall::new(market(), SELL, vec![U256::from(5u64).into()]);
        ActionRequest::new(OperationKind::Sell, call)
    }

    fn setup(chain: MockChain) -> (Arc<Orchestrator<MockWallet, MockChain>>, Arc<MockWallet>, Arc<MockChain>) {
        let wallet = Arc::new(MockWallet::connected(user()));
        let chain = Arc::new(chain);
        let orchestrator = Arc::new(Orchestrator::new(wallet.clone(), chain.clone(), config()));
        (orchestrator, wallet, chain)
    }

    #[tokio::test(start_paused = true)]
    async fn test_sufficient_allowance_skips_approval() {
        let chain = MockChain::auto_confirming();
        chain.respond_uints(usdc(), &ALLOWANCE, &[amount()]);
        let (orchestrator, wallet, _) = setup(chain);

        let receipt = orchestrator.execute(buy_request()).await.unwrap();

        assert_eq!(wallet.sent_count(&APPROVE), 0);
        assert_eq!(wallet.sent_count(&BUY), 1);
        assert_eq!(
            orchestrator.status(),
            FlowStatus::Succeeded {
                tx_hash: receipt.tx_hash
            }
        );
        let op = orchestrator.pending().unwrap();
        assert_eq!(op.steps, vec![Step::Act]);
        assert!(op.approval_tx.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insufficient_allowance_approves_first() {
        let chain = MockChain::auto_confirming();
        chain.respond_uints(usdc(), &ALLOWANCE, &[U256::ZERO]);
        let (orchestrator, wallet, _) = setup(chain);

        orchestrator.execute(buy_request()).await.unwrap();

        let sent = wallet.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].selector(), Some(APPROVE.selector()));
        assert_eq!(sent[0].to, usdc());
        assert_eq!(sent[1].selector(), Some(BUY.selector()));
        assert_eq!(sent[1].to, market());

        let op = orchestrator.pending().unwrap();
        assert_eq!(op.steps, vec![Step::Approve, Step::Act]);
        assert_eq!(op.current(), Some(Step::Act));
        assert_eq!(op.approval_tx, Some(tx_hash(1)));
        assert_eq!(op.action_tx, Some(tx_hash(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_waits_for_approval_confirmation() {
        let chain = MockChain::new();
        chain.respond_uints(usdc(), &ALLOWANCE, &[U256::ZERO]);
        let (orchestrator, wallet, chain) = setup(chain);

        let task = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.execute(buy_request()).await }
        });

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(wallet.sent().len(), 1);
        assert_eq!(
            orchestrator.status(),
            FlowStatus::ApprovalPending {
                tx_hash: tx_hash(1)
            }
        );
        assert!(orchestrator.is_busy());

        chain.include(tx_hash(1), ReceiptStatus::Success);
        chain.include(tx_hash(2), ReceiptStatus::Success);

        let receipt = task.await.unwrap().unwrap();
        assert_eq!(receipt.tx_hash, tx_hash(2));
        assert_eq!(wallet.sent_count(&BUY), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unconfirmed_approval_times_out_without_action() {
        let chain = MockChain::new();
        chain.respond_uints(usdc(), &ALLOWANCE, &[U256::ZERO]);
        let (orchestrator, wallet, _) = setup(chain);

        let err = orchestrator.execute(buy_request()).await.unwrap_err();

        assert!(matches!(err, TxError::Timeout { .. }));
        assert_eq!(wallet.sent_count(&APPROVE), 1);
        assert_eq!(wallet.sent_count(&BUY), 0);
        match orchestrator.status() {
            FlowStatus::Failed { error } => assert!(error.contains("0x")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_approval_never_submits_action() {
        let chain = MockChain::auto_confirming();
        chain.respond_uints(usdc(), &ALLOWANCE, &[U256::ZERO]);
        let (orchestrator, wallet, _) = setup(chain);
        wallet.reject(&APPROVE);

        let err = orchestrator.execute(buy_request()).await.unwrap_err();

        assert!(matches!(err, TxError::SubmissionRejected { .. }));
        assert!(wallet.sent().is_empty());
        assert!(matches!(orchestrator.status(), FlowStatus::Failed { .. }));
        assert!(orchestrator.pending().unwrap().last_error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverted_action_fails() {
        let chain = MockChain::new();
        chain.include(tx_hash(1), ReceiptStatus::Reverted);
        let (orchestrator, _, _) = setup(chain);

        let err = orchestrator.execute(sell_request()).await.unwrap_err();
        assert!(matches!(err, TxError::TransactionReverted { .. }));
        assert!(orchestrator.status_message().starts_with("Sell: Failed:"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_connected_makes_no_calls() {
        let wallet = Arc::new(MockWallet::new(chain_client::Session::new()));
        let chain = Arc::new(MockChain::auto_confirming());
        let orchestrator = Orchestrator::new(wallet.clone(), chain.clone(), config());

        let err = orchestrator.execute(buy_request()).await.unwrap_err();

        assert!(matches!(err, TxError::NotConnected));
        assert!(chain.calls().is_empty());
        assert!(wallet.sent().is_empty());
        assert!(matches!(orchestrator.status(), FlowStatus::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_runs_once_after_delay() {
        let wallet = Arc::new(MockWallet::connected(user()));
        let chain = Arc::new(MockChain::auto_confirming());
        let refreshes = Arc::new(AtomicUsize::new(0));
        let cleared = Arc::new(AtomicUsize::new(0));

        let on_success: SuccessHook = {
            let cleared = cleared.clone();
            Arc::new(move |kind: OperationKind| {
                if kind.clears_position() {
                    cleared.fetch_add(1, Ordering::SeqCst);
                }
            })
        };
        let refresh: RefreshHook = {
            let refreshes = refreshes.clone();
            Arc::new(move |_kind: OperationKind| {
                let refreshes = refreshes.clone();
                async move {
                    refreshes.fetch_add(1, Ordering::SeqCst);
                }
                .boxed()
            })
        };
        let orchestrator = Orchestrator::new(wallet, chain, config())
            .with_on_success(on_success)
            .with_refresh(refresh);

        orchestrator.execute(sell_request()).await.unwrap();
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);
        assert_eq!(cleared.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);

        let close = ContractCall::new(market(), SELL, vec![U256::ZERO.into()]);
        orchestrator
            .execute(ActionRequest::new(OperationKind::ClosePosition, close))
            .await
            .unwrap();
        assert_eq!(cleared.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_operation_supersedes_pending_one() {
        let chain = MockChain::new();
        chain.respond_uints(usdc(), &ALLOWANCE, &[U256::ZERO]);
        let (orchestrator, wallet, chain) = setup(chain);

        let first = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.execute(buy_request()).await }
        });
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(wallet.sent_count(&APPROVE), 1);

        // Approval (hash 1) lands only after the second operation took over
        chain.include(tx_hash(2), ReceiptStatus::Success);
        let receipt = orchestrator.execute(sell_request()).await.unwrap();
        chain.include(tx_hash(1), ReceiptStatus::Success);

        assert!(matches!(first.await.unwrap(), Err(TxError::Superseded)));
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(wallet.sent_count(&BUY), 0);
        assert_eq!(
            orchestrator.status(),
            FlowStatus::Succeeded {
                tx_hash: receipt.tx_hash
            }
        );
        assert_eq!(orchestrator.pending().unwrap().kind, OperationKind::Sell);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_abandons_operation() {
        let chain = MockChain::new();
        let (orchestrator, _, _) = setup(chain);

        let task = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.execute(sell_request()).await }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(orchestrator.is_busy());

        orchestrator.reset();
        assert!(matches!(task.await.unwrap(), Err(TxError::Superseded)));
        assert_eq!(orchestrator.status(), FlowStatus::Idle);
        assert!(orchestrator.pending().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recheck_after_timeout() {
        let chain = MockChain::new();
        let (orchestrator, _, chain) = setup(chain);

        let err = orchestrator.execute(sell_request()).await.unwrap_err();
        assert!(matches!(err, TxError::Timeout { .. }));

        assert!(orchestrator.recheck(tx_hash(1)).await.unwrap().is_none());
        chain.include(tx_hash(1), ReceiptStatus::Success);
        let receipt = orchestrator.recheck(tx_hash(1)).await.unwrap().unwrap();
        assert!(receipt.is_success());
    }
}
