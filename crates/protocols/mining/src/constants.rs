/// Squares on the board, numbered 0..25 row-major
pub const BOARD_SIZE: u8 = 25;

pub const BOARD_WIDTH: u8 = 5;

pub const MINING_TOKEN_DECIMALS: u8 = 18;
