//! Configuration types for the frame workspace

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Address, Error, Network, ProtocolError};

/// RPC connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// JSON-RPC URL (e.g., "https://mainnet.base.org")
    pub url: String,

    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://mainnet.base.org".to_string(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl RpcConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Transaction lifecycle tuning
///
/// All values are deployment tolerances; none of them affect correctness
/// beyond how long the orchestrator waits before giving up or refreshing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxFlowConfig {
    /// Receipt polling interval
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum wait for a single confirmation before `Failed(Timeout)`
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,

    /// Delay between a successful action and the dependent read refresh
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,

    /// Quiet period before an estimate read is issued
    #[serde(default = "default_estimate_debounce_ms")]
    pub estimate_debounce_ms: u64,

    /// Error messages longer than this are truncated in status lines
    #[serde(default = "default_status_message_max_len")]
    pub status_message_max_len: usize,
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_confirmation_timeout_secs() -> u64 {
    180
}

fn default_refresh_delay_ms() -> u64 {
    3_000
}

fn default_estimate_debounce_ms() -> u64 {
    500
}

fn default_status_message_max_len() -> usize {
    120
}

impl Default for TxFlowConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            refresh_delay_ms: default_refresh_delay_ms(),
            estimate_debounce_ms: default_estimate_debounce_ms(),
            status_message_max_len: default_status_message_max_len(),
        }
    }
}

impl TxFlowConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn estimate_debounce(&self) -> Duration {
        Duration::from_millis(self.estimate_debounce_ms)
    }
}

/// Deployed contract addresses. A protocol whose address is missing is
/// reported as unavailable rather than guessed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractsConfig {
    #[serde(default)]
    pub usdc: Option<Address>,
    #[serde(default)]
    pub chicks: Option<Address>,
    #[serde(default)]
    pub larry: Option<Address>,
    #[serde(default)]
    pub megapot: Option<Address>,
    #[serde(default)]
    pub megapot_subscription: Option<Address>,
    #[serde(default)]
    pub nft: Option<Address>,
    #[serde(default)]
    pub mining: Option<Address>,
}

impl ContractsConfig {
    /// Unwrap a configured address or report which contract is missing
    pub fn require(address: Option<Address>, contract: &'static str) -> Result<Address, ProtocolError> {
        address.ok_or(ProtocolError::ContractNotConfigured { contract })
    }
}

/// Domain ownership proof embedded in the frame manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountAssociation {
    pub header: String,
    pub payload: String,
    pub signature: String,
}

/// Fields served by the frame manifest endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    pub name: String,
    pub home_url: String,
    pub icon_url: String,
    pub image_url: String,
    pub button_title: String,
    pub splash_image_url: String,
    pub splash_background_color: String,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub account_association: Option<AccountAssociation>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        let home = "http://localhost:3000".to_string();
        Self {
            name: "Frame".to_string(),
            icon_url: format!("{}/icon.png", home),
            image_url: format!("{}/api/og", home),
            splash_image_url: format!("{}/splash.png", home),
            home_url: home,
            button_title: "Launch".to_string(),
            splash_background_color: "#0b0b0f".to_string(),
            webhook_url: None,
            account_association: None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// RPC connection settings
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Network (Base mainnet or Base Sepolia)
    pub network: Network,

    /// Transaction lifecycle tuning
    #[serde(default)]
    pub tx_flow: TxFlowConfig,

    /// Deployed contracts
    #[serde(default)]
    pub contracts: ContractsConfig,

    /// Frame manifest
    #[serde(default)]
    pub manifest: ManifestConfig,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_api_port() -> u16 {
    3030
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            network: Network::Base,
            tx_flow: TxFlowConfig::default(),
            contracts: ContractsConfig::default(),
            manifest: ManifestConfig::default(),
            api_port: default_api_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    /// Parse configuration from a JSON document
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| Error::Config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the lifecycle loop misbehave
    pub fn validate(&self) -> Result<(), Error> {
        if self.tx_flow.poll_interval_ms == 0 {
            return Err(Error::Config("tx_flow.poll_interval_ms must be > 0".into()));
        }
        if self.tx_flow.confirmation_timeout_secs == 0 {
            return Err(Error::Config(
                "tx_flow.confirmation_timeout_secs must be > 0".into(),
            ));
        }
        if self.rpc.url.is_empty() {
            return Err(Error::Config("rpc.url must not be empty".into()));
        }
        Ok(())
    }
}
