use std::sync::Arc;

use alloy_primitives::Address;
use chain_client::{read_contract, ChainReader};
use frame_core::Error;
use tx_flow::PositionQuery;

use crate::calls::MiningBoard;
use crate::state::MinerRewards;

/// Unclaimed rewards for the position reader
pub struct RewardsQuery<C> {
    chain: Arc<C>,
    board: MiningBoard,
}

impl<C: ChainReader + 'static> RewardsQuery<C> {
    pub fn new(chain: Arc<C>, board: MiningBoard) -> Self {
        Self { chain, board }
    }
}

impl<C: ChainReader + 'static> PositionQuery for RewardsQuery<C> {
    type Snapshot = MinerRewards;

    async fn fetch(&self, account: Address) -> Result<Option<MinerRewards>, Error> {
        let rewards = read_contract(self.chain.as_ref(), &self.board.rewards_call(account)).await?;
        Ok(Some(rewards))
    }
}
