//! Error types for the frame workspace

use thiserror::Error;

use crate::TxHash;

/// Core errors that can occur across the workspace
#[derive(Debug, Error)]
pub enum Error {
    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TxError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// User input that is not a valid amount
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },
}

impl AmountError {
    pub fn invalid(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// ABI encoding and decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Expected at least {expected} values, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Value at position {index} is not a valid {expected}")]
    InvalidWord { index: usize, expected: &'static str },

    #[error("Expected {expected} at position {index}, found {found}")]
    UnexpectedType {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Dynamic offset {offset} out of range for {len} bytes")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("Invalid hex data: {0}")]
    InvalidHex(String),
}

/// RPC connection and query errors
#[derive(Debug, Clone, Error)]
pub enum ChainError {
    #[error("RPC endpoint unreachable at {url}")]
    Unreachable { url: String },

    #[error("RPC returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Failed to parse RPC response: {0}")]
    ParseError(String),

    #[error("RPC request timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Contract-level preconditions checked before anything is submitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Contract not configured: {contract}")]
    ContractNotConfigured { contract: &'static str },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Action not allowed: {reason}")]
    ActionNotAllowed { reason: String },

    #[error("Sold out: requested {requested}, {remaining} remaining")]
    SoldOut { requested: u64, remaining: u64 },
}

impl ProtocolError {
    pub fn not_allowed(reason: impl Into<String>) -> Self {
        Self::ActionNotAllowed {
            reason: reason.into(),
        }
    }

    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ContractNotConfigured { .. } => "contract_not_configured",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::ActionNotAllowed { .. } => "action_not_allowed",
            Self::SoldOut { .. } => "sold_out",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::ContractNotConfigured { .. } => 503,
            Self::InvalidAmount { .. } => 400,
            Self::ActionNotAllowed { .. } | Self::SoldOut { .. } => 409,
        }
    }
}

/// Transaction submission and confirmation errors
#[derive(Debug, Clone, Error)]
pub enum TxError {
    #[error("No wallet connected")]
    NotConnected,

    #[error("Transaction rejected: {message}")]
    SubmissionRejected { message: String },

    #[error("Transaction submission failed: {message}")]
    SubmissionFailed { message: String },

    #[error("Transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: TxHash },

    #[error("Transaction {tx_hash} not confirmed after {waited_secs}s")]
    Timeout { tx_hash: TxHash, waited_secs: u64 },

    #[error("Operation superseded by a newer one")]
    Superseded,

    #[error("Chain read failed: {0}")]
    Chain(#[from] ChainError),

    #[error("Failed to encode call: {0}")]
    Encode(#[from] DecodeError),
}

/// Result type alias for frame operations
pub type Result<T> = std::result::Result<T, Error>;

impl TxError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotConnected => "not_connected",
            Self::SubmissionRejected { .. } => "submission_rejected",
            Self::SubmissionFailed { .. } => "submission_failed",
            Self::TransactionReverted { .. } => "transaction_reverted",
            Self::Timeout { .. } => "timeout",
            Self::Superseded => "superseded",
            Self::Chain(_) => "chain_error",
            Self::Encode(_) => "encode_error",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotConnected => 401,
            Self::SubmissionRejected { .. } | Self::Superseded => 409,
            Self::TransactionReverted { .. } => 422,
            Self::Encode(_) => 400,
            Self::SubmissionFailed { .. } | Self::Chain(_) => 502,
            Self::Timeout { .. } => 504,
        }
    }
}

impl Error {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Amount(_) => "invalid_amount",
            Self::Decode(_) => "decode_error",
            Self::Chain(_) => "chain_error",
            Self::Protocol(e) => e.error_code(),
            Self::Transaction(e) => e.error_code(),
            Self::Config(_) => "config_error",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Amount(_) => 400,
            Self::Decode(_) | Self::Chain(_) => 502,
            Self::Protocol(e) => e.status_code(),
            Self::Transaction(e) => e.status_code(),
            Self::Config(_) => 500,
        }
    }
}
