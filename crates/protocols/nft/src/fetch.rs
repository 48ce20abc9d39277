//! NFT State Fetching

use chain_client::{read_contract, ChainReader};
use frame_core::Error;

use crate::calls::NftCollection;
use crate::state::NftInfo;

pub async fn fetch_info<C: ChainReader>(chain: &C, collection: &NftCollection) -> Result<NftInfo, Error> {
    let mint_price = read_contract(chain, &collection.mint_price_call()).await?;
    let total_supply = read_contract(chain, &collection.total_supply_call()).await?;
    let max_supply = read_contract(chain, &collection.max_supply_call()).await?;
    Ok(NftInfo {
        mint_price,
        total_supply,
        max_supply,
    })
}
