//! Megapot State Types

use alloy_primitives::U256;
use evm_codec::{expect_arity, AbiValue, FromReturn};
use frame_core::DecodeError;
use serde::Serialize;

/// `usersInfo(address) -> (ticketsPurchasedTotalBps, winningsClaimable, active)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub tickets_purchased_total_bps: U256,
    pub winnings_claimable: U256,
    pub active: bool,
}

impl UserInfo {
    pub fn has_winnings(&self) -> bool {
        !self.winnings_claimable.is_zero()
    }
}

impl FromReturn for UserInfo {
    fn from_values(values: &[AbiValue]) -> Result<Self, DecodeError> {
        expect_arity(values, 3)?;
        Ok(Self {
            tickets_purchased_total_bps: values[0].expect_uint(0)?,
            winnings_claimable: values[1].expect_uint(1)?,
            active: values[2].expect_bool(2)?,
        })
    }
}

/// `getSubscription(address) -> (ticketsPerDay, daysRemaining, lastProcessedBatchDay, isActive)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnapshot {
    pub tickets_per_day: U256,
    pub days_remaining: U256,
    pub last_processed_batch_day: U256,
    pub is_active: bool,
}

impl FromReturn for SubscriptionSnapshot {
    fn from_values(values: &[AbiValue]) -> Result<Self, DecodeError> {
        expect_arity(values, 4)?;
        Ok(Self {
            tickets_per_day: values[0].expect_uint(0)?,
            days_remaining: values[1].expect_uint(1)?,
            last_processed_batch_day: values[2].expect_uint(2)?,
            is_active: values[3].expect_bool(3)?,
        })
    }
}
