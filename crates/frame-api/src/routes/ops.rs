//! Operation submission and lifecycle status

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chain_client::{ChainReader, WalletSession};
use frame_core::{TxError, TxHash};

use crate::dto::{ApiError, OpAccepted, OpRequest, OpStatusResponse, ReceiptResponse};
use crate::ops::build_request;
use crate::routes::{error_response, ApiResult};
use crate::AppState;

/// Create operation routes
pub fn router<W, C>() -> Router<AppState<W, C>>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Router::new()
        .route("/", post(submit::<W, C>))
        .route("/status", get(get_status::<W, C>))
        .route("/reset", post(reset::<W, C>))
        .route("/receipt/:tx_hash", get(get_receipt::<W, C>))
}

/// POST /ops - Validate and start an operation in the background
///
/// A new submission supersedes whatever operation is still running.
pub async fn submit<W, C>(
    State(state): State<AppState<W, C>>,
    Json(request): Json<OpRequest>,
) -> Result<(StatusCode, Json<OpAccepted>), (StatusCode, Json<ApiError>)>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let account = state.account().ok_or_else(|| error_response(TxError::NotConnected))?;
    let request = build_request(&state, account, request)
        .await
        .map_err(error_response)?;

    let accepted = OpAccepted {
        kind: request.kind,
        approval_token: request.approval.as_ref().map(|a| a.token_symbol),
    };

    let orchestrator = state.orchestrator().clone();
    tokio::spawn(async move {
        let kind = request.kind;
        if let Err(e) = orchestrator.execute(request).await {
            tracing::debug!(kind = kind.label(), error = %e, "Background operation ended without success");
        }
    });

    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

/// GET /ops/status - Current lifecycle status
pub async fn get_status<W, C>(State(state): State<AppState<W, C>>) -> Json<OpStatusResponse>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let orchestrator = state.orchestrator();
    Json(OpStatusResponse {
        status: orchestrator.status(),
        message: orchestrator.status_message(),
        busy: orchestrator.is_busy(),
        operation: orchestrator.pending(),
    })
}

/// POST /ops/reset - Abandon the current operation
pub async fn reset<W, C>(State(state): State<AppState<W, C>>) -> StatusCode
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    state.orchestrator().reset();
    StatusCode::NO_CONTENT
}

/// GET /ops/receipt/:tx_hash - Check a transaction directly, e.g. after a timeout
pub async fn get_receipt<W, C>(
    State(state): State<AppState<W, C>>,
    Path(tx_hash): Path<String>,
) -> ApiResult<ReceiptResponse>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let tx_hash: TxHash = tx_hash.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request(format!("Invalid transaction hash '{}'", tx_hash))),
        )
    })?;
    let receipt = state
        .orchestrator()
        .recheck(tx_hash)
        .await
        .map_err(error_response)?;

    Ok(Json(ReceiptResponse {
        tx_hash,
        included: receipt.is_some(),
        success: receipt.as_ref().map(|r| r.is_success()),
        block_number: receipt.map(|r| r.block_number),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use alloy_primitives::{Address, U256};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chain_client::mock::{tx_hash, MockChain, MockWallet};
    use chain_client::{ReceiptStatus, Session};
    use chicks::calls::GET_BUY_TOKENS;
    use evm_codec::erc20::{ALLOWANCE, APPROVE};
    use frame_core::AppConfig;
    use larry::calls::{CLOSE_POSITION, GET_LOAN_BY_ADDRESS};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{create_app, AppState};

    use super::*;

    fn usdc() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn larry() -> Address {
        Address::repeat_byte(0x1a)
    }

    struct Harness {
        state: AppState<MockWallet, MockChain>,
        chain: Arc<MockChain>,
        wallet: Arc<MockWallet>,
    }

    fn harness(chain: MockChain, account: Option<Address>) -> Harness {
        let mut config = AppConfig::default();
        config.contracts.chicks = Some(Address::repeat_byte(0xcc));
        config.contracts.usdc = Some(usdc());
        config.contracts.larry = Some(larry());
        let session = match account {
            Some(account) => Session::connected(account),
            None => Session::new(),
        };
        let chain = Arc::new(chain);
        let wallet = Arc::new(MockWallet::new(session.clone()));
        let state = AppState::new(config, session, wallet.clone(), chain.clone());
        Harness { state, chain, wallet }
    }

    async fn send(state: &AppState<MockWallet, MockChain>, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_app(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, body)
    }

    fn submit_op(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ops")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_buy_approves_then_succeeds() {
        let h = harness(MockChain::auto_confirming(), Some(Address::repeat_byte(1)));
        h.chain.respond_uints(usdc(), &ALLOWANCE, &[U256::ZERO]);

        let (status, body) = send(&h.state, submit_op(r#"{"action":"chicks_buy","usdc":"100"}"#)).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["kind"], "buy");
        assert_eq!(body["approval_token"], "USDC");

        tokio::time::sleep(Duration::from_secs(10)).await;
        let (_, body) = send(&h.state, get("/ops/status")).await;
        assert_eq!(body["status"]["state"], "succeeded");
        assert_eq!(body["busy"], false);
        assert_eq!(h.wallet.sent_count(&APPROVE), 1);
        assert_eq!(h.wallet.sent().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_buy_recomputes_estimate() {
        let h = harness(MockChain::auto_confirming(), Some(Address::repeat_byte(1)));
        let market = Address::repeat_byte(0xcc);
        h.chain.respond_uints(usdc(), &ALLOWANCE, &[U256::MAX]);
        h.chain.respond_uints(market, &GET_BUY_TOKENS, &[U256::from(42u64)]);

        let estimate = h.state.chicks_estimate().unwrap();
        estimate.set_input("5");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(estimate.latest().output, U256::from(42u64));
        assert_eq!(h.chain.call_count(&GET_BUY_TOKENS), 1);

        // The buy moves the curve, so the same input now previews fewer tokens
        h.chain.respond_uints(market, &GET_BUY_TOKENS, &[U256::from(40u64)]);
        let (status, _) = send(&h.state, submit_op(r#"{"action":"chicks_buy","usdc":"5"}"#)).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(h.wallet.sent_count(&APPROVE), 0);
        assert_eq!(h.chain.call_count(&GET_BUY_TOKENS), 2);
        assert_eq!(estimate.latest().output, U256::from(40u64));
    }

    #[tokio::test]
    async fn test_submit_requires_wallet() {
        let h = harness(MockChain::new(), None);
        let (status, body) = send(&h.state, submit_op(r#"{"action":"chicks_sell","tokens":"1"}"#)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "not_connected");
        assert!(h.wallet.sent().is_empty());
    }

    #[tokio::test]
    async fn test_close_without_loan_rejected() {
        let h = harness(MockChain::new(), Some(Address::repeat_byte(1)));
        h.chain.respond_uints(larry(), &GET_LOAN_BY_ADDRESS, &[U256::ZERO; 4]);

        let (status, body) = send(&h.state, submit_op(r#"{"action":"larry_close"}"#)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "action_not_allowed");
        assert_eq!(h.wallet.sent_count(&CLOSE_POSITION), 0);
    }

    #[tokio::test]
    async fn test_invalid_amount_rejected() {
        let h = harness(MockChain::new(), Some(Address::repeat_byte(1)));
        let (status, body) = send(&h.state, submit_op(r#"{"action":"chicks_sell","tokens":"0"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_amount");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_returns_to_idle() {
        let h = harness(MockChain::new(), Some(Address::repeat_byte(1)));
        let (status, _) = send(&h.state, submit_op(r#"{"action":"chicks_sell","tokens":"1"}"#)).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(h.state.orchestrator().is_busy());

        let reset = Request::builder()
            .method("POST")
            .uri("/ops/reset")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&h.state, reset).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&h.state, get("/ops/status")).await;
        assert_eq!(body["status"]["state"], "idle");
        assert!(body["operation"].is_null());
    }

    #[tokio::test]
    async fn test_receipt_recheck() {
        let h = harness(MockChain::new(), None);
        let hash = tx_hash(7);
        h.chain.include(hash, ReceiptStatus::Success);

        let (status, body) = send(&h.state, get(&format!("/ops/receipt/{}", hash))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["included"], true);
        assert_eq!(body["success"], true);

        let (status, _) = send(&h.state, get("/ops/receipt/0xzz")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
