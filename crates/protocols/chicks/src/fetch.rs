//! Chicks State Fetching

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use chain_client::{read_contract, ChainReader};
use evm_codec::{format_amount_display, ContractCall};
use frame_core::Error;
use tx_flow::CallSource;

use crate::calculator::tokens_for_usdc;
use crate::calls::ChicksMarket;
use crate::constants::CHICKS_DECIMALS;
use crate::state::ChicksQuote;

pub async fn fetch_last_price<C: ChainReader>(chain: &C, market: &ChicksMarket) -> Result<U256, Error> {
    read_contract(chain, &market.last_price_call()).await
}

/// Quote a buy of `usdc` base units
///
/// Prefers the contract's `getBuyTokens` preview and falls back to the
/// last-price formula when the preview read fails.
pub async fn fetch_quote<C: ChainReader>(
    chain: &C,
    market: &ChicksMarket,
    usdc: U256,
) -> Result<ChicksQuote, Error> {
    let last_price = fetch_last_price(chain, market).await?;
    let tokens_out = match read_contract::<C, U256>(chain, &market.buy_tokens_call(usdc)).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::debug!(error = %e, "getBuyTokens failed, using last price");
            tokens_for_usdc(usdc, last_price)
        }
    };

    Ok(ChicksQuote {
        usdc_in: usdc,
        tokens_out,
        last_price,
        tokens_display: format_amount_display(tokens_out, CHICKS_DECIMALS, 4),
    })
}

/// Estimate source backed by the on-chain buy preview
pub fn buy_quote_source<C>(
    chain: Arc<C>,
    market: Address,
) -> CallSource<C, impl Fn(U256) -> ContractCall + Send + Sync + 'static>
where
    C: ChainReader + 'static,
{
    let market = ChicksMarket::new(market, Address::ZERO);
    CallSource::new(chain, move |usdc| market.buy_tokens_call(usdc))
}
