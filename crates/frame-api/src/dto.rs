//! Data Transfer Objects for API requests and responses

use alloy_primitives::{Address, U256};
use frame_core::{AccountAssociation, BlockNumber, ManifestConfig, Network, TxHash};
use serde::{Deserialize, Serialize};
use tx_flow::{FlowStatus, OperationKind, PendingOperation};

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub network: Network,
    pub chain_id: u64,
    pub wallet_connected: bool,
}

impl HealthResponse {
    pub fn new(network: Network, wallet_connected: bool) -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            network,
            chain_id: network.chain_id(),
            wallet_connected,
        }
    }
}

/// Frame manifest, fixed shape expected by frame hosts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_association: Option<AccountAssociation>,
    pub frame: FrameManifest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameManifest {
    pub version: String,
    pub name: String,
    pub icon_url: String,
    pub home_url: String,
    pub image_url: String,
    pub button_title: String,
    pub splash_image_url: String,
    pub splash_background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl From<&ManifestConfig> for FarcasterManifest {
    fn from(config: &ManifestConfig) -> Self {
        Self {
            account_association: config.account_association.clone(),
            frame: FrameManifest {
                version: "1".to_string(),
                name: config.name.clone(),
                icon_url: config.icon_url.clone(),
                home_url: config.home_url.clone(),
                image_url: config.image_url.clone(),
                button_title: config.button_title.clone(),
                splash_image_url: config.splash_image_url.clone(),
                splash_background_color: config.splash_background_color.clone(),
                webhook_url: config.webhook_url.clone(),
            },
        }
    }
}

/// `?usdc=` query for buy quotes
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteQuery {
    #[serde(default)]
    pub usdc: String,
}

/// A position read for one account; `position` is null when unreadable
#[derive(Debug, Clone, Serialize)]
pub struct PositionResponse<T> {
    pub address: Address,
    pub position: Option<T>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NftInfoResponse {
    pub mint_price: U256,
    pub mint_price_display: String,
    pub total_supply: U256,
    pub max_supply: U256,
    pub remaining: U256,
    pub sold_out: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConnectRequest {
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletResponse {
    pub connected: bool,
    pub address: Option<Address>,
}

/// An operation to run through the orchestrator
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OpRequest {
    ChicksBuy { usdc: String },
    ChicksSell { tokens: String },
    LarryBuy { eth: String },
    LarrySell { larry: String },
    LarryLeverage { eth: String, days: u64 },
    LarryBorrow { eth: String, days: u64 },
    LarryRepay { eth: String },
    LarryClose,
    LarryExtend { days: u64 },
    MegapotPurchase { tickets: u64 },
    MegapotWithdraw,
    MegapotSubscribe { tickets_per_day: u64, days: u64 },
    MegapotCancel,
    NftMint { quantity: u64 },
    MiningDeploy { squares: Vec<u8>, eth_per_square: String },
    MiningClaimEth,
    MiningClaimToken,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpAccepted {
    pub kind: OperationKind,
    /// Allowance is checked first; an approval is sent only when it falls short
    pub approval_token: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpStatusResponse {
    pub status: FlowStatus,
    pub message: String,
    pub busy: bool,
    pub operation: Option<PendingOperation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptResponse {
    pub tx_hash: TxHash,
    pub included: bool,
    pub success: Option<bool>,
    pub block_number: Option<BlockNumber>,
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }
}
