//! Frame manifest endpoint

use axum::{extract::State, Json};
use chain_client::{ChainReader, WalletSession};

use crate::dto::FarcasterManifest;
use crate::AppState;

/// GET /.well-known/farcaster.json - Frame manifest
pub async fn get_manifest<W, C>(State(state): State<AppState<W, C>>) -> Json<FarcasterManifest>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    Json(FarcasterManifest::from(&state.config().manifest))
}
