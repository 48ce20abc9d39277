//! Chicks market endpoints

use alloy_primitives::U256;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chain_client::{ChainReader, WalletSession};
use chicks::{fetch_last_price, fetch_quote, ChicksQuote};
use evm_codec::parse_amount;
use frame_core::constants::USDC_DECIMALS;
use tx_flow::Estimate;

use crate::dto::{ApiError, QuoteQuery};
use crate::routes::{error_response, ApiResult};
use crate::AppState;

/// Create Chicks routes
pub fn router<W, C>() -> Router<AppState<W, C>>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Router::new()
        .route("/quote", get(get_quote::<W, C>))
        .route("/estimate", get(get_estimate::<W, C>).post(set_estimate::<W, C>))
}

/// GET /chicks/quote?usdc= - Preview a USDC buy
///
/// Unparseable or zero input quotes zero tokens rather than failing, and
/// a failed price read then shows a zero price.
pub async fn get_quote<W, C>(
    State(state): State<AppState<W, C>>,
    Query(query): Query<QuoteQuery>,
) -> ApiResult<ChicksQuote>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let market = state.chicks().map_err(error_response)?;
    let chain = state.chain().as_ref();

    let usdc = parse_amount(&query.usdc, USDC_DECIMALS).unwrap_or(U256::ZERO);
    if usdc.is_zero() {
        let last_price = fetch_last_price(chain, &market).await.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "lastPrice read failed for empty quote");
            U256::ZERO
        });
        return Ok(Json(ChicksQuote {
            usdc_in: U256::ZERO,
            tokens_out: U256::ZERO,
            last_price,
            tokens_display: "0".to_string(),
        }));
    }

    let quote = fetch_quote(chain, &market, usdc).await.map_err(error_response)?;
    Ok(Json(quote))
}

/// POST /chicks/estimate - Feed the debounced buy estimator
pub async fn set_estimate<W, C>(
    State(state): State<AppState<W, C>>,
    Json(query): Json<QuoteQuery>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let estimator = estimator(&state)?;
    estimator.set_input(&query.usdc);
    Ok(StatusCode::ACCEPTED)
}

/// GET /chicks/estimate - Latest settled estimate
pub async fn get_estimate<W, C>(State(state): State<AppState<W, C>>) -> ApiResult<Estimate>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Ok(Json(estimator(&state)?.latest()))
}

fn estimator<W, C>(state: &AppState<W, C>) -> Result<&tx_flow::Estimator, (StatusCode, Json<ApiError>)>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    state.chicks().map_err(error_response)?;
    state.chicks_estimate().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("estimator_unavailable", "Estimator not running")),
        )
    })
}
