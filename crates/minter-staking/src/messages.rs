//! Outbound message body builders.
//!
//! Each builder produces the complete internal-message body for one contract
//! operation: 32-bit opcode, 64-bit query id (always zero), then the
//! operation's fields. The deploy message has an empty body and is built by
//! the operator layer around the state init instead.

use std::sync::Arc;

use minter_cell::{Cell, CellBuilder, MsgAddress};

use crate::content::{JettonContent, content_to_cell};
use crate::error::StakingResult;
use crate::ops::*;

fn body(op: u32) -> StakingResult<CellBuilder> {
    let mut builder = CellBuilder::new();
    builder.store_u32(op)?;
    builder.store_u64(QUERY_ID)?;
    Ok(builder)
}

/// Mint `jetton_amount` to `destination`, forwarding `forward_ton` with the
/// transfer and shipping `total_ton` overall.
pub fn mint(
    destination: &MsgAddress,
    jetton_amount: u128,
    forward_ton: u128,
    total_ton: u128,
) -> StakingResult<Cell> {
    let mut builder = body(OP_MINT)?;
    builder.store_address(destination)?;
    builder.store_coins(jetton_amount)?;
    builder.store_coins(forward_ton)?;
    builder.store_coins(total_ton)?;
    Ok(builder.build()?)
}

/// Ask the minter for `owner`'s jetton wallet address, optionally echoing
/// the owner address in the response.
pub fn provide_wallet_address(
    owner: &MsgAddress,
    include_address: bool,
) -> StakingResult<Cell> {
    let mut builder = body(OP_PROVIDE_WALLET_ADDRESS)?;
    builder.store_address(owner)?;
    builder.store_bit(include_address)?;
    Ok(builder.build()?)
}

/// Hand the admin role to `new_admin`.
pub fn change_admin(new_admin: &MsgAddress) -> StakingResult<Cell> {
    let mut builder = body(OP_CHANGE_ADMIN)?;
    builder.store_address(new_admin)?;
    Ok(builder.build()?)
}

/// Point withdrawals at `new_address`.
pub fn change_withdraw_address(new_address: &MsgAddress) -> StakingResult<Cell> {
    let mut builder = body(OP_CHANGE_WITHDRAW_ADDRESS)?;
    builder.store_address(new_address)?;
    Ok(builder.build()?)
}

/// Replace the jetton content.
pub fn change_content(content: &JettonContent) -> StakingResult<Cell> {
    let mut builder = body(OP_CHANGE_CONTENT)?;
    builder.store_ref(Arc::new(content_to_cell(content)?))?;
    Ok(builder.build()?)
}

/// Open (`true`) or close (`false`) staking.
pub fn change_state(state: bool) -> StakingResult<Cell> {
    let mut builder = body(OP_CHANGE_STATE)?;
    builder.store_bit(state)?;
    Ok(builder.build()?)
}

/// Sweep accumulated TON to the withdraw address.
pub fn withdraw() -> StakingResult<Cell> {
    Ok(body(OP_WITHDRAW)?.build()?)
}

/// Stake the attached TON for jettons.
pub fn buy() -> StakingResult<Cell> {
    Ok(body(OP_BUY)?.build()?)
}

/// Set the price to `price` nanotons per jetton unit.
pub fn change_price(price: u128) -> StakingResult<Cell> {
    let mut builder = body(OP_CHANGE_PRICE)?;
    builder.store_coins(price)?;
    Ok(builder.build()?)
}

/// Set the withdraw minimum.
pub fn change_withdraw_minimum(minimum: u128) -> StakingResult<Cell> {
    let mut builder = body(OP_CHANGE_WITHDRAW_MINIMUM)?;
    builder.store_coins(minimum)?;
    Ok(builder.build()?)
}
