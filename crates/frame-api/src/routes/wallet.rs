//! Wallet session endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chain_client::{ChainReader, WalletSession};

use crate::dto::{ApiError, WalletConnectRequest, WalletResponse};
use crate::routes::{parse_address, ApiResult};
use crate::AppState;

/// Create wallet routes
pub fn router<W, C>() -> Router<AppState<W, C>>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Router::new()
        .route("/", get(get_wallet::<W, C>))
        .route("/connect", post(connect::<W, C>))
        .route("/disconnect", post(disconnect::<W, C>))
}

fn wallet_response<W, C>(state: &AppState<W, C>) -> WalletResponse
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let address = state.account();
    WalletResponse {
        connected: address.is_some(),
        address,
    }
}

/// GET /wallet - Current session
pub async fn get_wallet<W, C>(State(state): State<AppState<W, C>>) -> Json<WalletResponse>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Json(wallet_response(&state))
}

/// POST /wallet/connect - Connect or switch account
pub async fn connect<W, C>(
    State(state): State<AppState<W, C>>,
    Json(request): Json<WalletConnectRequest>,
) -> ApiResult<WalletResponse>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let address = parse_address(request.address.trim())?;
    if address.is_zero() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request("Cannot connect the zero address")),
        ));
    }
    state.session().connect(address);
    state.positions().set_account(Some(address));
    Ok(Json(wallet_response(&state)))
}

/// POST /wallet/disconnect - Drop the session
pub async fn disconnect<W, C>(State(state): State<AppState<W, C>>) -> Json<WalletResponse>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    state.session().disconnect();
    state.positions().set_account(None);
    Json(wallet_response(&state))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use alloy_primitives::{Address, U256};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chain_client::mock::{MockChain, MockWallet};
    use chain_client::Session;
    use frame_core::AppConfig;
    use larry::calls::GET_LOAN_BY_ADDRESS;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{create_app, AppState};

    use super::*;

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_then_disconnect_clears_loan() {
        let larry = Address::repeat_byte(0x1a);
        let chain = Arc::new(MockChain::new());
        chain.respond_uints(
            larry,
            &GET_LOAN_BY_ADDRESS,
            &[U256::from(1_000u64), U256::from(500u64), U256::ZERO, U256::from(30u64)],
        );
        let mut config = AppConfig::default();
        config.contracts.larry = Some(larry);
        let session = Session::new();
        let wallet = Arc::new(MockWallet::new(session.clone()));
        let state = AppState::new(config, session, wallet, chain);

        let account = Address::repeat_byte(1);
        let response = create_app(state.clone())
            .oneshot(post("/wallet/connect", &format!(r#"{{"address":"{}"}}"#, account)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["connected"], true);

        tokio::time::sleep(Duration::from_millis(10)).await;
        let loan = state.positions().loan.as_ref().unwrap();
        assert!(loan.snapshot().is_some());

        let response = create_app(state.clone())
            .oneshot(post("/wallet/disconnect", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.account().is_none());
        assert!(loan.account().is_none());
        assert!(loan.snapshot().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_account_drops_previous_loan() {
        let larry = Address::repeat_byte(0x1a);
        let chain = Arc::new(MockChain::new());
        chain.respond_uints(
            larry,
            &GET_LOAN_BY_ADDRESS,
            &[U256::from(1_000u64), U256::from(500u64), U256::ZERO, U256::from(30u64)],
        );
        let mut config = AppConfig::default();
        config.contracts.larry = Some(larry);
        let session = Session::connected(Address::repeat_byte(1));
        let wallet = Arc::new(MockWallet::new(session.clone()));
        let state = AppState::new(config, session, wallet, chain);

        tokio::time::sleep(Duration::from_millis(10)).await;
        let loan = state.positions().loan.as_ref().unwrap();
        assert!(loan.snapshot().is_some());

        let other = Address::repeat_byte(2);
        let response = create_app(state.clone())
            .oneshot(post("/wallet/connect", &format!(r#"{{"address":"{}"}}"#, other)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(loan.account(), Some(other));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(loan.snapshot().is_some());
        assert_eq!(state.chain().call_count(&GET_LOAN_BY_ADDRESS), 2);
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_address() {
        let session = Session::new();
        let wallet = Arc::new(MockWallet::new(session.clone()));
        let state = AppState::new(AppConfig::default(), session, wallet, Arc::new(MockChain::new()));

        let response = create_app(state)
            .oneshot(post("/wallet/connect", r#"{"address":"not-an-address"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
