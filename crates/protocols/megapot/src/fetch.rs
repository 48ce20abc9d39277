//! Megapot State Fetching

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use chain_client::{read_contract, ChainReader};
use frame_core::Error;
use tx_flow::PositionQuery;

use crate::calls::Megapot;
use crate::state::{SubscriptionSnapshot, UserInfo};

/// Current ticket price in USDC base units
pub async fn fetch_ticket_price<C: ChainReader>(chain: &C, megapot: &Megapot) -> Result<U256, Error> {
    read_contract(chain, &megapot.ticket_price_call()).await
}

pub struct UserInfoQuery<C> {
    chain: Arc<C>,
    megapot: Megapot,
}

impl<C: ChainReader + 'static> UserInfoQuery<C> {
    pub fn new(chain: Arc<C>, megapot: Megapot) -> Self {
        Self { chain, megapot }
    }
}

impl<C: ChainReader + 'static> PositionQuery for UserInfoQuery<C> {
    type Snapshot = UserInfo;

    async fn fetch(&self, account: Address) -> Result<Option<UserInfo>, Error> {
        let info = read_contract(self.chain.as_ref(), &self.megapot.users_info_call(account)).await?;
        Ok(Some(info))
    }
}

pub struct SubscriptionQuery<C> {
    chain: Arc<C>,
    megapot: Megapot,
}

impl<C: ChainReader + 'static> SubscriptionQuery<C> {
    pub fn new(chain: Arc<C>, megapot: Megapot) -> Self {
        Self { chain, megapot }
    }
}

impl<C: ChainReader + 'static> PositionQuery for SubscriptionQuery<C> {
    type Snapshot = SubscriptionSnapshot;

    async fn fetch(&self, account: Address) -> Result<Option<SubscriptionSnapshot>, Error> {
        let call = self.megapot.subscription_call(account)?;
        let subscription = read_contract(self.chain.as_ref(), &call).await?;
        Ok(Some(subscription))
    }
}
