//! Wallet session state
//!
//! Holds the connected account behind a watch channel so every consumer
//! (orchestrator, position readers) observes connects, switches and
//! disconnects without sharing any other mutable state. Passed explicitly
//! to whatever needs it.

use std::sync::Arc;

use alloy_primitives::Address;
use tokio::sync::watch;

#[derive(Clone)]
pub struct Session {
    account: Arc<watch::Sender<Option<Address>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            account: Arc::new(tx),
        }
    }

    /// Start connected to `account`
    pub fn connected(account: Address) -> Self {
        let session = Self::new();
        session.connect(account);
        session
    }

    /// Connect (or switch to) `account`. Returns true if the account changed.
    pub fn connect(&self, account: Address) -> bool {
        let changed = self.account.send_if_modified(|current| {
            if *current == Some(account) {
                false
            } else {
                *current = Some(account);
                true
            }
        });
        if changed {
            tracing::info!(account = %account, "Wallet connected");
        }
        changed
    }

    /// Disconnect. Returns true if an account was connected.
    pub fn disconnect(&self) -> bool {
        let changed = self.account.send_if_modified(|current| current.take().is_some());
        if changed {
            tracing::info!("Wallet disconnected");
        }
        changed
    }

    pub fn account(&self) -> Option<Address> {
        *self.account.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.account().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Address>> {
        self.account.subscribe()
    }
}
