//! Application state shared across API handlers

use std::sync::Arc;

use alloy_primitives::Address;
use chain_client::{ChainReader, Session, WalletSession};
use chicks::ChicksMarket;
use frame_core::{AppConfig, ContractsConfig, ProtocolError};
use futures::FutureExt;
use larry::LarryMarket;
use megapot::Megapot;
use mining::MiningBoard;
use nft::NftCollection;
use tokio::task::JoinHandle;
use tx_flow::{Estimator, OperationKind, Orchestrator, RefreshHook, SuccessHook};

use crate::positions::Positions;

/// Shared application state
pub struct AppState<W, C>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    inner: Arc<AppStateInner<W, C>>,
}

struct AppStateInner<W, C>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    config: AppConfig,
    session: Session,
    chain: Arc<C>,
    orchestrator: Arc<Orchestrator<W, C>>,
    positions: Arc<Positions<C>>,
    /// Debounced CHICKS buy preview, present when the market is configured
    chicks_estimate: Option<Arc<Estimator>>,
    followers: Vec<JoinHandle<()>>,
}

impl<W, C> Clone for AppState<W, C>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<W, C> Drop for AppStateInner<W, C>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    fn drop(&mut self) {
        for handle in &self.followers {
            handle.abort();
        }
    }
}

impl<W, C> AppState<W, C>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    /// Wire the orchestrator and position readers to one wallet session
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: AppConfig, session: Session, wallet: Arc<W>, chain: Arc<C>) -> Self {
        let contracts = &config.contracts;
        let positions = Arc::new(Positions::new(
            chain.clone(),
            larry_market(contracts).ok(),
            megapot(contracts).ok(),
            mining_board(contracts).ok(),
        ));

        let on_success: SuccessHook = {
            let positions = positions.clone();
            Arc::new(move |kind| positions.invalidate_for(kind))
        };
        let chicks_estimate = contracts.chicks.map(|market| {
            Arc::new(Estimator::spawn(
                chicks::buy_quote_source(chain.clone(), market),
                frame_core::constants::USDC_DECIMALS,
                config.tx_flow.estimate_debounce(),
            ))
        });

        let refresh: RefreshHook = {
            let positions = positions.clone();
            let chicks_estimate = chicks_estimate.clone();
            Arc::new(move |kind| {
                // A confirmed trade moves the curve price the preview reads
                if matches!(kind, OperationKind::Buy | OperationKind::Sell) {
                    if let Some(estimate) = &chicks_estimate {
                        estimate.invalidate();
                    }
                }
                let positions = positions.clone();
                async move { positions.refresh_all().await }.boxed()
            })
        };

        let orchestrator = Orchestrator::new(wallet, chain.clone(), config.tx_flow.clone())
            .with_on_success(on_success)
            .with_refresh(refresh);

        let followers = positions.follow(&session.subscribe());
        tracing::info!(
            network = %config.network,
            account = ?session.account(),
            "Application state initialized"
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                chain,
                orchestrator: Arc::new(orchestrator),
                positions,
                chicks_estimate,
                followers,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn account(&self) -> Option<Address> {
        self.inner.session.account()
    }

    pub fn chain(&self) -> &Arc<C> {
        &self.inner.chain
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator<W, C>> {
        &self.inner.orchestrator
    }

    pub fn positions(&self) -> &Positions<C> {
        &self.inner.positions
    }

    pub fn chicks_estimate(&self) -> Option<&Estimator> {
        self.inner.chicks_estimate.as_deref()
    }

    pub fn chicks(&self) -> Result<ChicksMarket, ProtocolError> {
        let contracts = self.contracts();
        Ok(ChicksMarket::new(
            ContractsConfig::require(contracts.chicks, "chicks")?,
            ContractsConfig::require(contracts.usdc, "usdc")?,
        ))
    }

    pub fn larry(&self) -> Result<LarryMarket, ProtocolError> {
        larry_market(self.contracts())
    }

    pub fn megapot(&self) -> Result<Megapot, ProtocolError> {
        megapot(self.contracts())
    }

    pub fn nft(&self) -> Result<NftCollection, ProtocolError> {
        let contracts = self.contracts();
        Ok(NftCollection::new(
            ContractsConfig::require(contracts.nft, "nft")?,
            ContractsConfig::require(contracts.usdc, "usdc")?,
        ))
    }

    pub fn mining(&self) -> Result<MiningBoard, ProtocolError> {
        mining_board(self.contracts())
    }

    fn contracts(&self) -> &ContractsConfig {
        &self.inner.config.contracts
    }
}

fn larry_market(contracts: &ContractsConfig) -> Result<LarryMarket, ProtocolError> {
    Ok(LarryMarket::new(ContractsConfig::require(contracts.larry, "larry")?))
}

fn megapot(contracts: &ContractsConfig) -> Result<Megapot, ProtocolError> {
    Ok(Megapot::new(
        ContractsConfig::require(contracts.megapot, "megapot")?,
        contracts.megapot_subscription,
        ContractsConfig::require(contracts.usdc, "usdc")?,
    ))
}

fn mining_board(contracts: &ContractsConfig) -> Result<MiningBoard, ProtocolError> {
    Ok(MiningBoard::new(ContractsConfig::require(contracts.mining, "mining")?))
}
