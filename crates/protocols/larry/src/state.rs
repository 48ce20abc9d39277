//! Larry State Types

use alloy_primitives::U256;
use evm_codec::{expect_arity, AbiValue, FromReturn};
use frame_core::DecodeError;
use serde::Serialize;

/// `getLoanByAddress(address) -> (collateral, borrowed, endDate, numberOfDays)`
///
/// A zero snapshot is a real answer ("no loan"), distinct from a failed read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSnapshot {
    /// LARRY locked, base units
    pub collateral: U256,
    /// ETH owed, wei
    pub borrowed: U256,
    /// Unix seconds
    pub end_date: U256,
    pub number_of_days: U256,
}

impl LoanSnapshot {
    pub fn is_active(&self) -> bool {
        !self.collateral.is_zero()
    }

    /// Past its end date; the contract liquidates expired loans
    pub fn is_expired(&self, now_secs: u64) -> bool {
        self.is_active() && self.end_date < U256::from(now_secs)
    }
}

impl FromReturn for LoanSnapshot {
    fn from_values(values: &[AbiValue]) -> Result<Self, DecodeError> {
        expect_arity(values, 4)?;
        Ok(Self {
            collateral: values[0].expect_uint(0)?,
            borrowed: values[1].expect_uint(1)?,
            end_date: values[2].expect_uint(2)?,
            number_of_days: values[3].expect_uint(3)?,
        })
    }
}
