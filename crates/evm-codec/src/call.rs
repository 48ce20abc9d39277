//! Contract call descriptors and typed return decoding

use alloy_primitives::{Address, Bytes, U256};
use frame_core::DecodeError;

use crate::abi::{decode_output, encode_call, AbiValue, FunctionSig};

/// A named struct decoded once from a contract's return tuple.
///
/// Implementors validate arity and types up front so downstream code never
/// indexes raw return values.
pub trait FromReturn: Sized {
    fn from_values(values: &[AbiValue]) -> Result<Self, DecodeError>;
}

/// Fail with `ArityMismatch` unless `values` holds at least `n` entries
pub fn expect_arity(values: &[AbiValue], n: usize) -> Result<(), DecodeError> {
    if values.len() < n {
        return Err(DecodeError::ArityMismatch {
            expected: n,
            found: values.len(),
        });
    }
    Ok(())
}

impl FromReturn for U256 {
    fn from_values(values: &[AbiValue]) -> Result<Self, DecodeError> {
        expect_arity(values, 1)?;
        values[0].expect_uint(0)
    }
}

impl FromReturn for Address {
    fn from_values(values: &[AbiValue]) -> Result<Self, DecodeError> {
        expect_arity(values, 1)?;
        values[0].expect_address(0)
    }
}

impl FromReturn for bool {
    fn from_values(values: &[AbiValue]) -> Result<Self, DecodeError> {
        expect_arity(values, 1)?;
        values[0].expect_bool(0)
    }
}

/// A fully described call: target, function, ordered arguments, attached value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    pub function: FunctionSig,
    pub args: Vec<AbiValue>,
    /// Wei attached to the call (payable functions)
    pub value: U256,
}

impl ContractCall {
    pub fn new(to: Address, function: FunctionSig, args: Vec<AbiValue>) -> Self {
        Self {
            to,
            function,
            args,
            value: U256::ZERO,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Calldata for this call
    pub fn encode(&self) -> Result<Bytes, DecodeError> {
        encode_call(&self.function, &self.args)
    }

    /// Decode raw return data into `T`
    pub fn decode_return<T: FromReturn>(&self, data: &[u8]) -> Result<T, DecodeError> {
        let values = decode_output(&self.function, data)?;
        T::from_values(&values)
    }

    /// Short label for logs and status lines, e.g. `approve`
    pub fn label(&self) -> &'static str {
        self.function.name
    }
}
