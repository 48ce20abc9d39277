//! Per-protocol position readers bound to the wallet session

use std::sync::Arc;

use alloy_primitives::Address;
use chain_client::ChainReader;
use larry::{LarryMarket, LoanQuery};
use megapot::{Megapot, SubscriptionQuery, UserInfoQuery};
use mining::{MiningBoard, RewardsQuery};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tx_flow::{OperationKind, PositionReader};

/// Readers for every position-bearing contract that is configured
pub struct Positions<C: ChainReader + 'static> {
    pub loan: Option<Arc<PositionReader<LoanQuery<C>>>>,
    pub user_info: Option<Arc<PositionReader<UserInfoQuery<C>>>>,
    pub subscription: Option<Arc<PositionReader<SubscriptionQuery<C>>>>,
    pub rewards: Option<Arc<PositionReader<RewardsQuery<C>>>>,
}

impl<C: ChainReader + 'static> Positions<C> {
    pub fn new(
        chain: Arc<C>,
        larry: Option<LarryMarket>,
        megapot: Option<Megapot>,
        mining: Option<MiningBoard>,
    ) -> Self {
        let subscription = megapot
            .as_ref()
            .filter(|m| m.subscription.is_some())
            .map(|m| Arc::new(PositionReader::new(SubscriptionQuery::new(chain.clone(), *m))));

        Self {
            loan: larry.map(|market| Arc::new(PositionReader::new(LoanQuery::new(chain.clone(), market)))),
            user_info: megapot.map(|m| Arc::new(PositionReader::new(UserInfoQuery::new(chain.clone(), m)))),
            subscription,
            rewards: mining.map(|board| Arc::new(PositionReader::new(RewardsQuery::new(chain, board)))),
        }
    }

    /// Keep every reader on the session's account
    pub fn follow(&self, account: &watch::Receiver<Option<Address>>) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        if let Some(reader) = &self.loan {
            handles.push(reader.clone().follow_session(account.clone()));
        }
        if let Some(reader) = &self.user_info {
            handles.push(reader.clone().follow_session(account.clone()));
        }
        if let Some(reader) = &self.subscription {
            handles.push(reader.clone().follow_session(account.clone()));
        }
        if let Some(reader) = &self.rewards {
            handles.push(reader.clone().follow_session(account.clone()));
        }
        handles
    }

    /// Point every reader at `account` at once
    ///
    /// Snapshots of the previous account are gone when this returns; the
    /// session followers then load the new account's positions.
    pub fn set_account(&self, account: Option<Address>) {
        if let Some(reader) = &self.loan {
            reader.set_account(account);
        }
        if let Some(reader) = &self.user_info {
            reader.set_account(account);
        }
        if let Some(reader) = &self.subscription {
            reader.set_account(account);
        }
        if let Some(reader) = &self.rewards {
            reader.set_account(account);
        }
    }

    /// Drop the snapshot an operation of `kind` just emptied
    pub fn invalidate_for(&self, kind: OperationKind) {
        if !kind.clears_position() {
            return;
        }
        match kind {
            OperationKind::ClosePosition => {
                if let Some(reader) = &self.loan {
                    reader.invalidate();
                }
            }
            OperationKind::CancelSubscription => {
                if let Some(reader) = &self.subscription {
                    reader.invalidate();
                }
            }
            OperationKind::WithdrawWinnings => {
                if let Some(reader) = &self.user_info {
                    reader.invalidate();
                }
            }
            OperationKind::ClaimEth | OperationKind::ClaimToken => {
                if let Some(reader) = &self.rewards {
                    reader.invalidate();
                }
            }
            _ => {}
        }
        tracing::debug!(kind = kind.label(), "Cleared position after success");
    }

    /// Re-read every position for the current account; failures keep the old snapshot
    pub async fn refresh_all(&self) {
        if let Some(reader) = &self.loan {
            let _ = reader.refresh().await;
        }
        if let Some(reader) = &self.user_info {
            let _ = reader.refresh().await;
        }
        if let Some(reader) = &self.subscription {
            let _ = reader.refresh().await;
        }
        if let Some(reader) = &self.rewards {
            let _ = reader.refresh().await;
        }
    }
}
