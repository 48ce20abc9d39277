//! evm-codec: Amount and contract call encoding for EVM contracts
//!
//! Provides the decimal amount codec used for user input, a minimal ABI
//! encoder/decoder covering the argument shapes the frame contracts use,
//! and the ERC-20 function descriptors needed for approvals.

pub mod abi;
pub mod amount;
pub mod call;
pub mod erc20;

pub use abi::{decode_output, decode_values, encode_call, encode_params, AbiType, AbiValue, FunctionSig};
pub use amount::{format_amount, format_amount_display, parse_amount, MonetaryAmount};
pub use call::{expect_arity, ContractCall, FromReturn};
