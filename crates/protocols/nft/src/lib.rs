//! USDC-priced NFT collection
//!
//! Minting pulls `quantity × mintPrice` USDC from the minter, gated on the
//! remaining supply.

pub mod calls;
pub mod constants;
pub mod fetch;
pub mod state;

// Re-exports
pub use calls::NftCollection;
pub use fetch::fetch_info;
pub use state::NftInfo;
