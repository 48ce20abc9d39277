//! Board selection checks and deploy cost

use alloy_primitives::U256;
use frame_core::ProtocolError;

use crate::constants::{BOARD_SIZE, BOARD_WIDTH};

/// Validate a square selection and return it sorted, ready for encoding
pub fn validate_squares(squares: &[u8]) -> Result<Vec<U256>, ProtocolError> {
    if squares.is_empty() {
        return Err(ProtocolError::invalid_amount("select at least one square"));
    }

    let mut sorted = squares.to_vec();
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            return Err(ProtocolError::invalid_amount(format!(
                "square {} selected twice",
                pair[0]
            )));
        }
    }
    if let Some(&last) = sorted.last() {
        if last >= BOARD_SIZE {
            return Err(ProtocolError::invalid_amount(format!(
                "square {} is off the board (0-{})",
                last,
                BOARD_SIZE - 1
            )));
        }
    }

    Ok(sorted.into_iter().map(U256::from).collect())
}

/// ETH attached to a deploy of `count` squares
pub fn deploy_cost(eth_per_square: U256, count: usize) -> U256 {
    eth_per_square.saturating_mul(U256::from(count))
}

/// (row, column) of a square
pub fn coordinates(square: u8) -> (u8, u8) {
    (square / BOARD_WIDTH, square % BOARD_WIDTH)
}
