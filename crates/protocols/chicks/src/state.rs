//! Chicks State Types

use alloy_primitives::U256;
use serde::Serialize;

/// Preview of a USDC → CHICKS buy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChicksQuote {
    /// USDC spent, base units
    pub usdc_in: U256,
    /// CHICKS received, base units
    pub tokens_out: U256,
    /// USDC base units per whole CHICKS
    pub last_price: U256,
    /// Human-readable tokens_out
    pub tokens_display: String,
}
