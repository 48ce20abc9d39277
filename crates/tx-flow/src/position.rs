//! Account-scoped position snapshots
//!
//! A snapshot belongs to exactly one account. Switching or clearing the
//! account drops the snapshot synchronously, and a fetch that finishes
//! after the account changed is discarded.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::Address;
use frame_core::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Reads one kind of position for an account
pub trait PositionQuery: Send + Sync + 'static {
    type Snapshot: Clone + Send + Sync + 'static;

    /// `Ok(None)` when the account has no position
    fn fetch(
        &self,
        account: Address,
    ) -> impl Future<Output = Result<Option<Self::Snapshot>, Error>> + Send;
}

struct ReaderState {
    account: Option<Address>,
    epoch: u64,
}

pub struct PositionReader<Q: PositionQuery> {
    query: Q,
    state: Mutex<ReaderState>,
    snapshot: watch::Sender<Option<Q::Snapshot>>,
}

impl<Q: PositionQuery> PositionReader<Q> {
    pub fn new(query: Q) -> Self {
        let (snapshot, _) = watch::channel(None);
        Self {
            query,
            state: Mutex::new(ReaderState {
                account: None,
                epoch: 0,
            }),
            snapshot,
        }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn account(&self) -> Option<Address> {
        self.lock_state().account
    }

    pub fn snapshot(&self) -> Option<Q::Snapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Q::Snapshot>> {
        self.snapshot.subscribe()
    }

    /// Point the reader at `account`; a change clears the snapshot at once
    pub fn set_account(&self, account: Option<Address>) -> bool {
        let mut state = self.lock_state();
        if state.account == account {
            return false;
        }
        state.account = account;
        state.epoch += 1;
        self.snapshot.send_replace(None);
        true
    }

    /// Drop the snapshot without changing account, e.g. after closing a position
    pub fn invalidate(&self) {
        let mut state = self.lock_state();
        state.epoch += 1;
        self.snapshot.send_replace(None);
    }

    /// One-shot read for any account
    ///
    /// `None` when no account is given or the read fails for any reason,
    /// including a malformed return. Reader state is untouched.
    pub async fn fetch(&self, account: Option<Address>) -> Option<Q::Snapshot> {
        let account = account?;
        match self.query.fetch(account).await {
            Ok(snapshot) => snapshot,
            Err(Error::Decode(e)) => {
                tracing::warn!(account = %account, error = %e, "Malformed position return");
                None
            }
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "Position read failed");
                None
            }
        }
    }

    /// Re-read the position for the current account
    ///
    /// A failed read (transport or decode) keeps the previous snapshot and
    /// reports the error; only an account change clears it.
    pub async fn refresh(&self) -> Result<Option<Q::Snapshot>, Error> {
        let (account, epoch) = {
            let state = self.lock_state();
            (state.account, state.epoch)
        };
        let Some(account) = account else {
            return Ok(None);
        };

        let fetched = match self.query.fetch(account).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "Position refresh failed, keeping previous");
                return Err(e);
            }
        };

        let state = self.lock_state();
        if state.epoch != epoch {
            tracing::debug!(account = %account, "Discarding position for stale account");
            return Ok(self.snapshot());
        }
        self.snapshot.send_replace(fetched.clone());
        Ok(fetched)
    }

    /// Switch to `account` and load its position
    pub async fn sync_account(&self, account: Option<Address>) -> Result<Option<Q::Snapshot>, Error> {
        self.set_account(account);
        self.refresh().await
    }

    fn lock_state(&self) -> MutexGuard<'_, ReaderState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Track the wallet session: every account change clears and re-reads
    pub fn follow_session(self: Arc<Self>, mut account: watch::Receiver<Option<Address>>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let current = *account.borrow_and_update();
                if self.set_account(current) || current.is_some() {
                    let _ = self.refresh().await;
                }
                if account.changed().await.is_err() {
                    return;
                }
            }
        })
    }
}
