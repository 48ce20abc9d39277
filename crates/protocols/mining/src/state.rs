use alloy_primitives::U256;
use evm_codec::{expect_arity, AbiValue, FromReturn};
use frame_core::DecodeError;
use serde::Serialize;

/// `getMinerRewards(address) -> (eth, token)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinerRewards {
    /// wei
    pub eth: U256,
    /// mining token base units
    pub token: U256,
}

impl FromReturn for MinerRewards {
    fn from_values(values: &[AbiValue]) -> Result<Self, DecodeError> {
        expect_arity(values, 2)?;
        Ok(Self {
            eth: values[0].expect_uint(0)?,
            token: values[1].expect_uint(1)?,
        })
    }
}
