//! Debounced, display-only estimates
//!
//! Input changes restart a debounce timer; only the last input of a burst
//! is estimated. An estimate finished after the input moved on is dropped.
//! Estimates are never used to build transactions.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;
use chain_client::{read_contract, ChainReader};
use evm_codec::{parse_amount, ContractCall};
use frame_core::Error;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Produces an output amount for a parsed, non-zero input amount
pub trait EstimateSource: Send + Sync + 'static {
    fn estimate(&self, input: U256) -> impl Future<Output = Result<U256, Error>> + Send;
}

/// Pure local formula; `None` means "cannot estimate" and shows as zero
pub struct FormulaSource<F> {
    formula: F,
}

impl<F> FormulaSource<F>
where
    F: Fn(U256) -> Option<U256> + Send + Sync + 'static,
{
    pub fn new(formula: F) -> Self {
        Self { formula }
    }
}

impl<F> EstimateSource for FormulaSource<F>
where
    F: Fn(U256) -> Option<U256> + Send + Sync + 'static,
{
    async fn estimate(&self, input: U256) -> Result<U256, Error> {
        Ok((self.formula)(input).unwrap_or(U256::ZERO))
    }
}

/// Estimate via a view function returning a single uint
pub struct CallSource<C, B> {
    chain: Arc<C>,
    build: B,
}

impl<C, B> CallSource<C, B>
where
    C: ChainReader + 'static,
    B: Fn(U256) -> ContractCall + Send + Sync + 'static,
{
    pub fn new(chain: Arc<C>, build: B) -> Self {
        Self { chain, build }
    }
}

impl<C, B> EstimateSource for CallSource<C, B>
where
    C: ChainReader + 'static,
    B: Fn(U256) -> ContractCall + Send + Sync + 'static,
{
    async fn estimate(&self, input: U256) -> Result<U256, Error> {
        let call = (self.build)(input);
        read_contract(self.chain.as_ref(), &call).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Estimate {
    /// The raw input this estimate was computed for
    pub input: String,
    pub output: U256,
}

#[derive(Clone, Default)]
struct Input {
    raw: String,
    /// Bumped by `invalidate` so an unchanged input is re-estimated
    epoch: u64,
}

pub struct Estimator {
    input: watch::Sender<Input>,
    output: watch::Receiver<Estimate>,
    task: JoinHandle<()>,
}

impl Estimator {
    /// Start the background estimation task
    pub fn spawn<S: EstimateSource>(source: S, input_decimals: u8, debounce: Duration) -> Self {
        let (input, input_rx) = watch::channel(Input::default());
        let (output_tx, output) = watch::channel(Estimate::default());
        let task = tokio::spawn(run(source, input_decimals, debounce, input_rx, output_tx));
        Self {
            input,
            output,
            task,
        }
    }

    pub fn set_input(&self, raw: &str) {
        self.input.send_if_modified(|input| {
            if input.raw == raw {
                return false;
            }
            input.raw = raw.to_string();
            true
        });
    }

    /// Recompute for the current input, e.g. after the price moved
    pub fn invalidate(&self) {
        self.input.send_modify(|input| input.epoch += 1);
    }

    pub fn latest(&self) -> Estimate {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Estimate> {
        self.output.clone()
    }
}

impl Drop for Estimator {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<S: EstimateSource>(
    source: S,
    decimals: u8,
    debounce: Duration,
    mut input: watch::Receiver<Input>,
    output: watch::Sender<Estimate>,
) {
    loop {
        if input.changed().await.is_err() {
            return;
        }

        // Quiet period: every further change restarts the timer
        loop {
            match tokio::time::timeout(debounce, input.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) => return,
                Err(_) => break,
            }
        }

        let raw = input.borrow_and_update().raw.clone();
        let value = match parse_amount(&raw, decimals) {
            Ok(amount) if !amount.is_zero() => match source.estimate(amount).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::debug!(input = %raw, error = %e, "Estimate failed");
                    U256::ZERO
                }
            },
            _ => U256::ZERO,
        };

        if input.has_changed().unwrap_or(false) {
            tracing::trace!(input = %raw, "Discarding stale estimate");
            continue;
        }
        output.send_replace(Estimate { input: raw, output: value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use alloy_primitives::Address;
    use chain_client::mock::MockChain;
    use evm_codec::{AbiType, FunctionSig};

    const DEBOUNCE: Duration = Duration::from_millis(500);

    fn wei(tokens: u64) -> U256 {
        U256::from(tokens) * U256::from(10u64).pow(U256::from(18u64))
    }

    /// tokens (18 decimals) = usdc (6 decimals) / price (6 decimals)
    fn price_source(price: U256, calls: Arc<AtomicUsize>) -> FormulaSource<impl Fn(U256) -> Option<U256> + Send + Sync> {
        FormulaSource::new(move |usdc: U256| {
            calls.fetch_add(1, Ordering::SeqCst);
            if price.is_zero() {
                return None;
            }
            Some(usdc * wei(1) / price)
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_estimate_after_debounce() {
        let calls = Arc::new(AtomicUsize::new(0));
        let estimator = Estimator::spawn(price_source(U256::from(50_000u64), calls.clone()), 6, DEBOUNCE);

        estimator.set_input("100");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(estimator.latest().output, U256::ZERO);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let estimate = estimator.latest();
        assert_eq!(estimate.input, "100");
        assert_eq!(estimate.output, wei(2000));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_estimates_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let estimator = Estimator::spawn(price_source(U256::from(50_000u64), calls.clone()), 6, DEBOUNCE);

        for raw in ["1", "10", "100"] {
            estimator.set_input(raw);
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(estimator.latest().input, "100");
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_input_estimates_zero() {
        let calls = Arc::new(AtomicUsize::new(0));
        let estimator = Estimator::spawn(price_source(U256::from(50_000u64), calls.clone()), 6, DEBOUNCE);

        estimator.set_input("100");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!estimator.latest().output.is_zero());

        estimator.set_input("1.2.3");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(estimator.latest().output, U256::ZERO);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_recomputes_same_input() {
        let calls = Arc::new(AtomicUsize::new(0));
        let estimator = Estimator::spawn(price_source(U256::from(50_000u64), calls.clone()), 6, DEBOUNCE);

        estimator.set_input("5");
        tokio::time::sleep(Duration::from_secs(1)).await;
        estimator.set_input("5");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        estimator.invalidate();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_source_reads_quote() {
        const QUOTE: FunctionSig = FunctionSig::new("getBuyTokens", &[AbiType::Uint256], &[AbiType::Uint256]);
        let market = Address::repeat_byte(0xcc);
        let chain = Arc::new(MockChain::new());
        chain.respond_uints(market, &QUOTE, &[wei(42)]);

        let source = CallSource::new(chain.clone(), move |amount| {
            ContractCall::new(market, QUOTE, vec![amount.into()])
        });
        let estimator = Estimator::spawn(source, 6, DEBOUNCE);
        estimator.set_input("1");
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(estimator.latest().output, wei(42));
        assert_eq!(chain.call_count(&QUOTE), 1);

        // A failing read shows as zero rather than an error
        chain.fail_calls(true);
        estimator.set_input("2");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(estimator.latest().output, U256::ZERO);
    }
}
