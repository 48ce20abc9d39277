//! Core type definitions for the frame workspace

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use alloy_primitives::{Address, Bytes, B256, U256};

/// Transaction hash (32 bytes, 0x-prefixed hex on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub B256);

impl TxHash {
    pub fn new(hash: B256) -> Self {
        Self(hash)
    }

    pub fn as_b256(&self) -> &B256 {
        &self.0
    }

    /// Shortened form for status lines (0x1234…abcd)
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for TxHash {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| format!("invalid tx hash hex: {}", e))?;
        if bytes.len() != 32 {
            return Err(format!("tx hash must be 32 bytes, got {}", bytes.len()));
        }
        Ok(Self(B256::from_slice(&bytes)))
    }
}

impl From<B256> for TxHash {
    fn from(hash: B256) -> Self {
        Self(hash)
    }
}

/// Network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    Base,
    BaseSepolia,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::BaseSepolia => "base_sepolia",
        }
    }

    /// EIP-155 chain id
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Base => 8453,
            Self::BaseSepolia => 84532,
        }
    }

    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        match chain_id {
            8453 => Some(Self::Base),
            84532 => Some(Self::BaseSepolia),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Block number
pub type BlockNumber = u64;

/// Constants
pub mod constants {
    /// Fractional digits of USDC-like assets
    pub const USDC_DECIMALS: u8 = 6;

    /// Fractional digits of ETH and ETH-like tokens (LARRY, CHICKS, BTB)
    pub const ETH_DECIMALS: u8 = 18;

    /// 1 ETH in wei
    pub const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

    /// 1 USDC in base units
    pub const UNITS_PER_USDC: u128 = 1_000_000;
}
