//! Health check endpoint

use axum::{extract::State, Json};
use chain_client::{ChainReader, WalletSession};

use crate::dto::HealthResponse;
use crate::AppState;

/// GET /health - Check API health
pub async fn health_check<W, C>(State(state): State<AppState<W, C>>) -> Json<HealthResponse>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Json(HealthResponse::new(state.config().network, state.account().is_some()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_primitives::Address;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chain_client::mock::{MockChain, MockWallet};
    use chain_client::Session;
    use frame_core::AppConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{create_app, AppState};

    async fn get_json(state: AppState<MockWallet, MockChain>, uri: &str) -> (StatusCode, Value) {
        let response = create_app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn state(config: AppConfig) -> AppState<MockWallet, MockChain> {
        let session = Session::connected(Address::repeat_byte(1));
        let wallet = Arc::new(MockWallet::new(session.clone()));
        AppState::new(config, session, wallet, Arc::new(MockChain::new()))
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(state(AppConfig::default()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["network"], "base");
        assert_eq!(body["chain_id"], 8453);
        assert_eq!(body["wallet_connected"], true);
    }

    #[tokio::test]
    async fn test_manifest_shape() {
        let mut config = AppConfig::default();
        config.manifest.name = "Chicks".to_string();

        for uri in ["/api/well-known/farcaster", "/.well-known/farcaster.json"] {
            let (status, body) = get_json(state(config.clone()), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["frame"]["version"], "1");
            assert_eq!(body["frame"]["name"], "Chicks");
            assert_eq!(body["frame"]["buttonTitle"], "Launch");
            assert!(body.get("accountAssociation").is_none());
        }
    }
}
