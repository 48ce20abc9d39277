//! Megapot jackpot endpoints

use alloy_primitives::U256;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chain_client::{ChainReader, WalletSession};
use frame_core::ProtocolError;
use megapot::{fetch_ticket_price, SubscriptionSnapshot, UserInfo};

use crate::dto::PositionResponse;
use crate::routes::{error_response, parse_address, ApiResult};
use crate::AppState;

/// Create Megapot routes
pub fn router<W, C>() -> Router<AppState<W, C>>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Router::new()
        .route("/ticket-price", get(get_ticket_price::<W, C>))
        .route("/user/:address", get(get_user_info::<W, C>))
        .route("/subscription/:address", get(get_subscription::<W, C>))
}

/// GET /megapot/ticket-price - USDC base units per ticket
pub async fn get_ticket_price<W, C>(State(state): State<AppState<W, C>>) -> ApiResult<U256>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let megapot = state.megapot().map_err(error_response)?;
    let price = fetch_ticket_price(state.chain().as_ref(), &megapot)
        .await
        .map_err(error_response)?;
    Ok(Json(price))
}

pub async fn get_user_info<W, C>(
    State(state): State<AppState<W, C>>,
    Path(address): Path<String>,
) -> ApiResult<PositionResponse<UserInfo>>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let address = parse_address(&address)?;
    let reader = state
        .positions()
        .user_info
        .as_ref()
        .ok_or(ProtocolError::ContractNotConfigured { contract: "megapot" })
        .map_err(error_response)?;

    Ok(Json(PositionResponse {
        address,
        position: reader.fetch(Some(address)).await,
    }))
}

/// GET /megapot/subscription/:address - Subscription for any account
pub async fn get_subscription<W, C>(
    State(state): State<AppState<W, C>>,
    Path(address): Path<String>,
) -> ApiResult<PositionResponse<SubscriptionSnapshot>>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let address = parse_address(&address)?;
    let reader = state
        .positions()
        .subscription
        .as_ref()
        .ok_or(ProtocolError::ContractNotConfigured {
            contract: "megapot_subscription",
        })
        .map_err(error_response)?;

    Ok(Json(PositionResponse {
        address,
        position: reader.fetch(Some(address)).await,
    }))
}
