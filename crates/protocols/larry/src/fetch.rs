//! Larry State Fetching

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use chain_client::{read_contract, ChainReader};
use frame_core::Error;
use tx_flow::PositionQuery;

use crate::calls::LarryMarket;
use crate::state::LoanSnapshot;

pub async fn fetch_last_price<C: ChainReader>(chain: &C, market: &LarryMarket) -> Result<U256, Error> {
    read_contract(chain, &market.last_price_call()).await
}

/// Fee (wei) the contract charges to lever `eth` for `days`
pub async fn fetch_leverage_fee<C: ChainReader>(
    chain: &C,
    market: &LarryMarket,
    eth: U256,
    days: u64,
) -> Result<U256, Error> {
    read_contract(chain, &market.leverage_fee_call(eth, days)).await
}

/// Fee (wei) to extend a loan of `borrowed` by `days`
pub async fn fetch_interest_fee<C: ChainReader>(
    chain: &C,
    market: &LarryMarket,
    borrowed: U256,
    days: u64,
) -> Result<U256, Error> {
    read_contract(chain, &market.interest_fee_call(borrowed, days)).await
}

/// Loan position for the position reader
pub struct LoanQuery<C> {
    chain: Arc<C>,
    market: LarryMarket,
}

impl<C: ChainReader + 'static> LoanQuery<C> {
    pub fn new(chain: Arc<C>, market: LarryMarket) -> Self {
        Self { chain, market }
    }
}

impl<C: ChainReader + 'static> PositionQuery for LoanQuery<C> {
    type Snapshot = LoanSnapshot;

    async fn fetch(&self, account: Address) -> Result<Option<LoanSnapshot>, Error> {
        let loan: LoanSnapshot = read_contract(self.chain.as_ref(), &self.market.loan_call(account)).await?;
        Ok(Some(loan))
    }
}
