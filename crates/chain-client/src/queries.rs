//! Typed contract reads

use alloy_primitives::{Address, U256};
use evm_codec::erc20::allowance_call;
use evm_codec::{ContractCall, FromReturn};
use frame_core::Error;

use crate::traits::{ChainReader, TxRequest};

/// Execute a read-only call and decode its return tuple into `T`
pub async fn read_contract<C: ChainReader, T: FromReturn>(
    client: &C,
    call: &ContractCall,
) -> Result<T, Error> {
    let request = TxRequest::from_call(call)?;
    let data = client.call(&request).await?;
    let decoded = call.decode_return::<T>(&data).map_err(|e| {
        tracing::debug!(
            function = call.label(),
            to = %call.to,
            error = %e,
            "Unexpected return shape"
        );
        e
    })?;
    Ok(decoded)
}

/// Current ERC-20 allowance granted by `owner` to `spender`
pub async fn read_allowance<C: ChainReader>(
    client: &C,
    token: Address,
    owner: Address,
    spender: Address,
) -> Result<U256, Error> {
    read_contract(client, &allowance_call(token, owner, spender)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockChain;
    use evm_codec::erc20::ALLOWANCE;
    use frame_core::DecodeError;

    #[tokio::test]
    async fn test_read_allowance() {
        let chain = MockChain::new();
        let token = Address::repeat_byte(0xaa);
        chain.respond_uints(token, &ALLOWANCE, &[U256::from(42u64)]);

        let allowance = read_allowance(&chain, token, Address::repeat_byte(1), Address::repeat_byte(2))
            .await
            .unwrap();
        assert_eq!(allowance, U256::from(42u64));
        assert_eq!(chain.call_count(&ALLOWANCE), 1);
    }

    #[tokio::test]
    async fn test_empty_return_is_decode_error() {
        let chain = MockChain::new();
        let err = read_allowance(
            &chain,
            Address::repeat_byte(0xaa),
            Address::repeat_byte(1),
            Address::repeat_byte(2),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::ArityMismatch {
                expected: 1,
                found: 0
            })
        ));
    }

    #[tokio::test]
    async fn test_rpc_failure_is_chain_error() {
        let chain = MockChain::new();
        chain.fail_calls(true);
        let err = read_allowance(&chain, Address::ZERO, Address::ZERO, Address::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Chain(_)));
    }
}
