//! API route handlers

pub mod chicks;
pub mod health;
pub mod larry;
pub mod manifest;
pub mod megapot;
pub mod mining;
pub mod nft;
pub mod ops;
pub mod wallet;

use alloy_primitives::Address;
use axum::{http::StatusCode, routing::get, Json, Router};
use chain_client::{ChainReader, WalletSession};
use frame_core::Error;

use crate::dto::ApiError;
use crate::AppState;

pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Create the API router with all routes
pub fn create_router<W, C>(state: AppState<W, C>) -> Router
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Router::new()
        .route("/health", get(health::health_check::<W, C>))
        .route("/api/well-known/farcaster", get(manifest::get_manifest::<W, C>))
        .route("/.well-known/farcaster.json", get(manifest::get_manifest::<W, C>))
        .nest("/chicks", chicks::router())
        .nest("/larry", larry::router())
        .nest("/megapot", megapot::router())
        .nest("/mining", mining::router())
        .nest("/nft", nft::router())
        .nest("/wallet", wallet::router())
        .nest("/ops", ops::router())
        .with_state(state)
}

/// Map a workspace error onto its HTTP status and error body
pub fn error_response(e: impl Into<Error>) -> (StatusCode, Json<ApiError>) {
    let e = e.into();
    (
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ApiError::new(e.error_code(), e.to_string())),
    )
}

fn parse_address(raw: &str) -> Result<Address, (StatusCode, Json<ApiError>)> {
    raw.parse::<Address>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("invalid_address", format!("Invalid address '{}'", raw))),
        )
    })
}
