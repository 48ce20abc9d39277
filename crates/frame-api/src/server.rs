//! HTTP server setup and configuration

use std::net::SocketAddr;

use axum::Router;
use chain_client::{ChainReader, WalletSession};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::routes::create_router;
use crate::AppState;

/// Create the full application router with middleware
pub fn create_app<W, C>(state: AppState<W, C>) -> Router
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server<W, C>(state: AppState<W, C>, port: u16) -> Result<(), std::io::Error>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let app = create_app(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
