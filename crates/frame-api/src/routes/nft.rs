//! NFT collection endpoints

use axum::{extract::State, routing::get, Json, Router};
use chain_client::{ChainReader, WalletSession};
use evm_codec::format_amount_display;
use frame_core::constants::USDC_DECIMALS;
use nft::fetch_info;

use crate::dto::NftInfoResponse;
use crate::routes::{error_response, ApiResult};
use crate::AppState;

/// Create NFT routes
pub fn router<W, C>() -> Router<AppState<W, C>>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Router::new().route("/info", get(get_info::<W, C>))
}

/// GET /nft/info - Price and remaining supply
pub async fn get_info<W, C>(State(state): State<AppState<W, C>>) -> ApiResult<NftInfoResponse>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let collection = state.nft().map_err(error_response)?;
    let info = fetch_info(state.chain().as_ref(), &collection)
        .await
        .map_err(error_response)?;

    Ok(Json(NftInfoResponse {
        mint_price: info.mint_price,
        mint_price_display: format_amount_display(info.mint_price, USDC_DECIMALS, 2),
        total_supply: info.total_supply,
        max_supply: info.max_supply,
        remaining: info.remaining(),
        sold_out: info.is_sold_out(),
    }))
}
