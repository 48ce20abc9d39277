//! Turn an API operation request into an orchestrator request
//!
//! Every gate (allowance excluded) is evaluated against a fresh read, never
//! the cached snapshot, so a stale view cannot authorize a transaction.

use alloy_primitives::{Address, U256};
use chain_client::{ChainReader, WalletSession};
use evm_codec::parse_amount;
use frame_core::constants::ETH_DECIMALS;
use frame_core::{Error, ProtocolError};
use tx_flow::ActionRequest;

use crate::dto::OpRequest;
use crate::state::AppState;

pub async fn build_request<W, C>(
    state: &AppState<W, C>,
    account: Address,
    request: OpRequest,
) -> Result<ActionRequest, Error>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let chain = state.chain().as_ref();
    let positions = state.positions();

    match request {
        OpRequest::ChicksBuy { usdc } => state.chicks()?.buy(account, &usdc),
        OpRequest::ChicksSell { tokens } => state.chicks()?.sell(&tokens),

        OpRequest::LarryBuy { eth } => state.larry()?.buy(account, &eth),
        OpRequest::LarrySell { larry } => state.larry()?.sell(&larry),
        OpRequest::LarryLeverage { eth, days } => {
            let market = state.larry()?;
            let amount = parse_amount(&eth, ETH_DECIMALS)?;
            let fee = larry::fetch_leverage_fee(chain, &market, amount, days).await?;
            market.leverage(&eth, days, fee)
        }
        OpRequest::LarryBorrow { eth, days } => state.larry()?.borrow(&eth, days),
        OpRequest::LarryRepay { eth } => {
            let market = state.larry()?;
            let loan = fetch_loan(state, account).await?;
            market.repay(loan.as_ref(), &eth)
        }
        OpRequest::LarryClose => {
            let market = state.larry()?;
            let loan = fetch_loan(state, account).await?;
            market.close_position(loan.as_ref())
        }
        OpRequest::LarryExtend { days } => {
            let market = state.larry()?;
            let loan = fetch_loan(state, account).await?;
            let fee = match &loan {
                Some(loan) if loan.is_active() => {
                    larry::fetch_interest_fee(chain, &market, loan.borrowed, days).await?
                }
                _ => U256::ZERO,
            };
            market.extend_loan(loan.as_ref(), days, fee)
        }

        OpRequest::MegapotPurchase { tickets } => {
            let megapot = state.megapot()?;
            let price = megapot::fetch_ticket_price(chain, &megapot).await?;
            megapot.purchase_tickets(account, tickets, price)
        }
        OpRequest::MegapotWithdraw => {
            let megapot = state.megapot()?;
            let info = match &positions.user_info {
                Some(reader) => reader.fetch(Some(account)).await,
                None => None,
            };
            megapot.withdraw_winnings(info.as_ref())
        }
        OpRequest::MegapotSubscribe { tickets_per_day, days } => {
            let megapot = state.megapot()?;
            let current = fetch_subscription(state, account).await?;
            let price = megapot::fetch_ticket_price(chain, &megapot).await?;
            megapot.subscribe(current.as_ref(), tickets_per_day, days, price)
        }
        OpRequest::MegapotCancel => {
            let megapot = state.megapot()?;
            let current = fetch_subscription(state, account).await?;
            megapot.cancel_subscription(current.as_ref())
        }

        OpRequest::NftMint { quantity } => {
            let collection = state.nft()?;
            let info = nft::fetch_info(chain, &collection).await?;
            collection.mint(&info, quantity)
        }

        OpRequest::MiningDeploy { squares, eth_per_square } => {
            state.mining()?.deploy(&squares, &eth_per_square)
        }
        OpRequest::MiningClaimEth => {
            let board = state.mining()?;
            let rewards = fetch_rewards(state, account).await;
            board.claim_eth(rewards.as_ref())
        }
        OpRequest::MiningClaimToken => {
            let board = state.mining()?;
            let rewards = fetch_rewards(state, account).await;
            board.claim_token(rewards.as_ref())
        }
    }
}

async fn fetch_loan<W, C>(state: &AppState<W, C>, account: Address) -> Result<Option<larry::LoanSnapshot>, Error>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let reader = state
        .positions()
        .loan
        .as_ref()
        .ok_or(ProtocolError::ContractNotConfigured { contract: "larry" })?;
    Ok(reader.fetch(Some(account)).await)
}

async fn fetch_subscription<W, C>(
    state: &AppState<W, C>,
    account: Address,
) -> Result<Option<megapot::SubscriptionSnapshot>, Error>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    let reader = state
        .positions()
        .subscription
        .as_ref()
        .ok_or(ProtocolError::ContractNotConfigured {
            contract: "megapot_subscription",
        })?;
    Ok(reader.fetch(Some(account)).await)
}

async fn fetch_rewards<W, C>(state: &AppState<W, C>, account: Address) -> Option<mining::MinerRewards>
where
    W: WalletSession + 'static,
    C: ChainReader + 'static,
{
    match &state.positions().rewards {
        Some(reader) => reader.fetch(Some(account)).await,
        None => None,
    }
}
