//! Mining board endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chain_client::{ChainReader, WalletSession};
use frame_core::ProtocolError;
use mining::MinerRewards;

use crate::dto::PositionResponse;
use crate::routes::{error_response, parse_address, ApiResult};
use crate::AppState;

/// Create Mining routes
pub fn router<W, C>() -> Router<AppState<W, C>>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Router::new().route("/rewards/:address", get(get_rewards::<W, C>))
}

/// GET /mining/rewards/:address - Claimable ETH and token rewards
pub async fn get_rewards<W, C>(
    State(state): State<AppState<W, C>>,
    Path(address): Path<String>,
) -> ApiResult<PositionResponse<MinerRewards>>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let address = parse_address(&address)?;
    let reader = state
        .positions()
        .rewards
        .as_ref()
        .ok_or(ProtocolError::ContractNotConfigured { contract: "mining" })
        .map_err(error_response)?;

    Ok(Json(PositionResponse {
        address,
        position: reader.fetch(Some(address)).await,
    }))
}
