//! Frame server application library

use std::sync::Arc;

use anyhow::Context;
use chain_client::{RpcClient, RpcWallet, Session};
use frame_api::AppState;
use frame_core::{AppConfig, Network};

/// Path to the JSON config file; defaults apply when unset
pub const CONFIG_ENV: &str = "FRAME_CONFIG";
/// Overrides `rpc.url` from the config file
pub const RPC_URL_ENV: &str = "FRAME_RPC_URL";
/// When set, connect the session to the node's first managed account
pub const AUTO_CONNECT_ENV: &str = "FRAME_AUTO_CONNECT";

/// Resolve configuration from the environment
pub fn load_config() -> anyhow::Result<AppConfig> {
    let mut config = match std::env::var(CONFIG_ENV) {
        Ok(path) => AppConfig::load(&path).with_context(|| format!("loading {}", path))?,
        Err(_) => AppConfig::default(),
    };
    if let Ok(url) = std::env::var(RPC_URL_ENV) {
        config.rpc.url = url;
    }
    config.validate()?;
    Ok(config)
}

/// Install the tracing subscriber
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("frame=debug".parse()?)
                .add_directive("tx_flow=debug".parse()?)
                .add_directive("chain_client=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();
    Ok(())
}

/// Run the frame server until it stops
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(network = %config.network, rpc = %config.rpc.url, "Starting frame server");

    let client = RpcClient::new(&config.rpc)?;
    match client.chain_id().await {
        Ok(id) if Network::from_chain_id(id) == Some(config.network) => {}
        Ok(id) => tracing::warn!(
            chain_id = id,
            expected = config.network.chain_id(),
            "RPC endpoint serves a different chain"
        ),
        Err(e) => tracing::warn!(error = %e, "Could not read chain id"),
    }

    let session = Session::new();
    let wallet = RpcWallet::new(client.clone(), session.clone());
    if std::env::var(AUTO_CONNECT_ENV).is_ok() {
        match wallet.connect_first_account().await {
            Ok(Some(account)) => tracing::info!(account = %account, "Connected node account"),
            Ok(None) => tracing::warn!("Node manages no accounts"),
            Err(e) => tracing::warn!(error = %e, "Could not list node accounts"),
        }
    }

    let port = config.api_port;
    let state = AppState::new(config, session, Arc::new(wallet), Arc::new(client));
    frame_api::start_server(state, port).await?;
    Ok(())
}
