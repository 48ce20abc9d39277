//! Minimal Solidity ABI encoding
//!
//! Covers the argument and return shapes used by the frame contracts:
//! - `uint256`, `address`, `bool`: one 32-byte word each
//! - `uint256[]`: head word holds the byte offset of the tail, tail holds
//!   the length word followed by one word per element
//!
//! Calldata is the 4-byte selector (first 4 bytes of keccak-256 of the
//! canonical signature) followed by the encoded arguments.

use alloy_primitives::{keccak256, Address, Bytes, U256};
use frame_core::DecodeError;

const WORD: usize = 32;

/// Argument/return type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiType {
    Uint256,
    Address,
    Bool,
    Uint256Array,
}

impl AbiType {
    /// Canonical name used in function signatures
    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Uint256 => "uint256",
            Self::Address => "address",
            Self::Bool => "bool",
            Self::Uint256Array => "uint256[]",
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Uint256Array)
    }
}

/// A typed ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Uint(U256),
    Address(Address),
    Bool(bool),
    UintArray(Vec<U256>),
}

impl AbiValue {
    pub fn abi_type(&self) -> AbiType {
        match self {
            Self::Uint(_) => AbiType::Uint256,
            Self::Address(_) => AbiType::Address,
            Self::Bool(_) => AbiType::Bool,
            Self::UintArray(_) => AbiType::Uint256Array,
        }
    }

    /// Read as `uint256`, reporting `index` on mismatch
    pub fn expect_uint(&self, index: usize) -> Result<U256, DecodeError> {
        match self {
            Self::Uint(v) => Ok(*v),
            other => Err(other.type_mismatch(index, AbiType::Uint256)),
        }
    }

    /// Read as `address`, reporting `index` on mismatch
    pub fn expect_address(&self, index: usize) -> Result<Address, DecodeError> {
        match self {
            Self::Address(a) => Ok(*a),
            other => Err(other.type_mismatch(index, AbiType::Address)),
        }
    }

    /// Read as `bool`, reporting `index` on mismatch
    pub fn expect_bool(&self, index: usize) -> Result<bool, DecodeError> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(other.type_mismatch(index, AbiType::Bool)),
        }
    }

    fn type_mismatch(&self, index: usize, expected: AbiType) -> DecodeError {
        DecodeError::UnexpectedType {
            index,
            expected: expected.canonical(),
            found: self.abi_type().canonical(),
        }
    }
}

impl From<U256> for AbiValue {
    fn from(v: U256) -> Self {
        Self::Uint(v)
    }
}

impl From<Address> for AbiValue {
    fn from(a: Address) -> Self {
        Self::Address(a)
    }
}

impl From<bool> for AbiValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Static description of a contract function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSig {
    pub name: &'static str,
    pub inputs: &'static [AbiType],
    pub outputs: &'static [AbiType],
}

impl FunctionSig {
    pub const fn new(
        name: &'static str,
        inputs: &'static [AbiType],
        outputs: &'static [AbiType],
    ) -> Self {
        Self {
            name,
            inputs,
            outputs,
        }
    }

    /// Canonical signature, e.g. `approve(address,uint256)`
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.inputs.iter().map(AbiType::canonical).collect();
        format!("{}({})", self.name, params.join(","))
    }

    /// 4-byte function selector
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&hash[..4]);
        selector
    }
}

/// Encode calldata for `sig` with `args`
///
/// Argument count and types must match the signature exactly.
pub fn encode_call(sig: &FunctionSig, args: &[AbiValue]) -> Result<Bytes, DecodeError> {
    if args.len() != sig.inputs.len() {
        return Err(DecodeError::ArityMismatch {
            expected: sig.inputs.len(),
            found: args.len(),
        });
    }

    for (index, (expected, arg)) in sig.inputs.iter().zip(args).enumerate() {
        if arg.abi_type() != *expected {
            return Err(DecodeError::UnexpectedType {
                index,
                expected: expected.canonical(),
                found: arg.abi_type().canonical(),
            });
        }
    }

    let mut out = sig.selector().to_vec();
    out.extend(encode_params(args));
    Ok(Bytes::from(out))
}

/// Encode an argument tuple (without selector)
pub fn encode_params(args: &[AbiValue]) -> Vec<u8> {
    let head_len = args.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for arg in args {
        match arg {
            AbiValue::Uint(v) => head.extend_from_slice(&uint_word(*v)),
            AbiValue::Address(a) => head.extend_from_slice(a.into_word().as_slice()),
            AbiValue::Bool(b) => head.extend_from_slice(&uint_word(U256::from(*b as u8))),
            AbiValue::UintArray(items) => {
                let offset = head_len + tail.len();
                head.extend_from_slice(&uint_word(U256::from(offset)));
                tail.extend_from_slice(&uint_word(U256::from(items.len())));
                for item in items {
                    tail.extend_from_slice(&uint_word(*item));
                }
            }
        }
    }

    head.extend(tail);
    head
}

/// Decode the return data of `sig`
pub fn decode_output(sig: &FunctionSig, data: &[u8]) -> Result<Vec<AbiValue>, DecodeError> {
    decode_values(sig.outputs, data)
}

/// Decode a tuple of `types` from `data`
///
/// Fails with `ArityMismatch` when `data` holds fewer head words than
/// `types` requires, which is what a call against the wrong contract (or an
/// EOA, returning `0x`) looks like.
pub fn decode_values(types: &[AbiType], data: &[u8]) -> Result<Vec<AbiValue>, DecodeError> {
    let words = data.len() / WORD;
    if words < types.len() {
        return Err(DecodeError::ArityMismatch {
            expected: types.len(),
            found: words,
        });
    }

    types
        .iter()
        .enumerate()
        .map(|(index, ty)| {
            let word = word_at(data, index * WORD)?;
            match ty {
                AbiType::Uint256 => Ok(AbiValue::Uint(U256::from_be_slice(word))),
                AbiType::Address => {
                    if word[..12].iter().any(|b| *b != 0) {
                        return Err(DecodeError::InvalidWord {
                            index,
                            expected: "address",
                        });
                    }
                    Ok(AbiValue::Address(Address::from_slice(&word[12..])))
                }
                AbiType::Bool => match U256::from_be_slice(word) {
                    v if v.is_zero() => Ok(AbiValue::Bool(false)),
                    v if v == U256::from(1u8) => Ok(AbiValue::Bool(true)),
                    _ => Err(DecodeError::InvalidWord {
                        index,
                        expected: "bool",
                    }),
                },
                AbiType::Uint256Array => {
                    let offset = word_to_offset(word, data.len())?;
                    let len = word_to_offset(word_at(data, offset)?, data.len())?;
                    let mut items = Vec::with_capacity(len);
                    for i in 0..len {
                        let item = word_at(data, offset + WORD + i * WORD)?;
                        items.push(U256::from_be_slice(item));
                    }
                    Ok(AbiValue::UintArray(items))
                }
            }
        })
        .collect()
}

fn uint_word(v: U256) -> [u8; WORD] {
    v.to_be_bytes::<WORD>()
}

fn word_at(data: &[u8], offset: usize) -> Result<&[u8], DecodeError> {
    data.get(offset..offset + WORD)
        .ok_or(DecodeError::OffsetOutOfRange {
            offset,
            len: data.len(),
        })
}

/// Interpret a word as a byte offset/length bounded by the payload size
fn word_to_offset(word: &[u8], len: usize) -> Result<usize, DecodeError> {
    let value = U256::from_be_slice(word);
    if value > U256::from(len) {
        return Err(DecodeError::OffsetOutOfRange {
            offset: usize::MAX,
            len,
        });
    }
    Ok(value.as_limbs()[0] as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSFER: FunctionSig = FunctionSig::new(
        "transfer",
        &[AbiType::Address, AbiType::Uint256],
        &[AbiType::Bool],
    );

    const DEPLOY: FunctionSig = FunctionSig::new("deploy", &[AbiType::Uint256Array], &[]);

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_known_selectors() {
        assert_eq!(TRANSFER.signature(), "transfer(address,uint256)");
        assert_eq!(hex::encode(TRANSFER.selector()), "a9059cbb");

        let balance_of = FunctionSig::new("balanceOf", &[AbiType::Address], &[AbiType::Uint256]);
        assert_eq!(hex::encode(balance_of.selector()), "70a08231");
    }

    #[test]
    fn test_encode_static_call() {
        let data = encode_call(
            &TRANSFER,
            &[addr(0x11).into(), U256::from(1_000_000u64).into()],
        )
        .unwrap();

        assert_eq!(data.len(), 4 + 2 * WORD);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert!(data[4..16].iter().all(|b| *b == 0));
        assert!(data[16..36].iter().all(|b| *b == 0x11));
        assert_eq!(U256::from_be_slice(&data[36..68]), U256::from(1_000_000u64));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let args = [addr(0x22).into(), U256::from(7u64).into()];
        assert_eq!(
            encode_call(&TRANSFER, &args).unwrap(),
            encode_call(&TRANSFER, &args).unwrap()
        );
    }

    #[test]
    fn test_encode_dynamic_array() {
        let squares = vec![U256::from(3u64), U256::from(17u64)];
        let data = encode_call(&DEPLOY, &[AbiValue::UintArray(squares)]).unwrap();
        let body = &data[4..];

        assert_eq!(body.len(), 4 * WORD);
        assert_eq!(U256::from_be_slice(&body[0..32]), U256::from(32u64)); // offset
        assert_eq!(U256::from_be_slice(&body[32..64]), U256::from(2u64)); // length
        assert_eq!(U256::from_be_slice(&body[64..96]), U256::from(3u64));
        assert_eq!(U256::from_be_slice(&body[96..128]), U256::from(17u64));
    }

    #[test]
    fn test_encode_rejects_wrong_arity_and_type() {
        assert_eq!(
            encode_call(&TRANSFER, &[addr(1).into()]),
            Err(DecodeError::ArityMismatch {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            encode_call(&TRANSFER, &[U256::from(1u64).into(), U256::from(1u64).into()]),
            Err(DecodeError::UnexpectedType {
                index: 0,
                expected: "address",
                found: "uint256"
            })
        );
    }

    #[test]
    fn test_decode_tuple() {
        let mut data = Vec::new();
        data.extend_from_slice(&uint_word(U256::from(5u64)));
        data.extend_from_slice(addr(0xab).into_word().as_slice());
        data.extend_from_slice(&uint_word(U256::from(1u64)));

        let values = decode_values(&[AbiType::Uint256, AbiType::Address, AbiType::Bool], &data)
            .unwrap();
        assert_eq!(values[0], AbiValue::Uint(U256::from(5u64)));
        assert_eq!(values[1], AbiValue::Address(addr(0xab)));
        assert_eq!(values[2], AbiValue::Bool(true));
    }

    #[test]
    fn test_decode_short_data_is_arity_mismatch() {
        let data = uint_word(U256::from(1u64)).repeat(2);
        let types = [AbiType::Uint256; 4];
        assert_eq!(
            decode_values(&types, &data),
            Err(DecodeError::ArityMismatch {
                expected: 4,
                found: 2
            })
        );
        assert!(decode_values(&types, &[]).is_err());
    }

    #[test]
    fn test_decode_rejects_dirty_words() {
        let data = uint_word(U256::MAX);
        assert!(matches!(
            decode_values(&[AbiType::Address], &data),
            Err(DecodeError::InvalidWord { .. })
        ));
        assert!(matches!(
            decode_values(&[AbiType::Bool], &data),
            Err(DecodeError::InvalidWord { .. })
        ));
    }

    #[test]
    fn test_decode_dynamic_array() {
        let encoded = encode_params(&[AbiValue::UintArray(vec![U256::from(9u64)])]);
        let values = decode_values(&[AbiType::Uint256Array], &encoded).unwrap();
        assert_eq!(values, vec![AbiValue::UintArray(vec![U256::from(9u64)])]);

        // Offset pointing past the payload
        let mut bad = encoded.clone();
        bad[..32].copy_from_slice(&uint_word(U256::from(4096u64)));
        assert!(matches!(
            decode_values(&[AbiType::Uint256Array], &bad),
            Err(DecodeError::OffsetOutOfRange { .. })
        ));
    }
}
