//! Larry protocol endpoints

use alloy_primitives::U256;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chain_client::{ChainReader, WalletSession};
use frame_core::ProtocolError;
use larry::{fetch_last_price, LoanSnapshot};

use crate::dto::PositionResponse;
use crate::routes::{error_response, parse_address, ApiResult};
use crate::AppState;

/// Create Larry routes
pub fn router<W, C>() -> Router<AppState<W, C>>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Router::new()
        .route("/price", get(get_price::<W, C>))
        .route("/loan/:address", get(get_loan::<W, C>))
}

/// GET /larry/price - Last price in wei per LARRY
pub async fn get_price<W, C>(State(state): State<AppState<W, C>>) -> ApiResult<U256>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let market = state.larry().map_err(error_response)?;
    let price = fetch_last_price(state.chain().as_ref(), &market)
        .await
        .map_err(error_response)?;
    Ok(Json(price))
}

/// GET /larry/loan/:address - Loan for any account; null when unreadable
pub async fn get_loan<W, C>(
    State(state): State<AppState<W, C>>,
    Path(address): Path<String>,
) -> ApiResult<PositionResponse<LoanSnapshot>>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let address = parse_address(&address)?;
    let reader = state
        .positions()
        .loan
        .as_ref()
        .ok_or(ProtocolError::ContractNotConfigured { contract: "larry" })
        .map_err(error_response)?;

    Ok(Json(PositionResponse {
        address,
        position: reader.fetch(Some(address)).await,
    }))
}
