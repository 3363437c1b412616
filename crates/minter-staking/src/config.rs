//! Deploy configuration: initial storage, state init, contract address.

use std::sync::Arc;

use minter_cell::{Cell, CellBuilder, MsgAddress};

use crate::content::{JettonContent, content_to_cell};
use crate::error::StakingResult;
use crate::ops::RESERVE_COINS;

/// Parameters fixed at deploy time.
#[derive(Debug, Clone)]
pub struct MinterConfig {
    /// Admin address, also the initial withdraw address.
    pub admin: MsgAddress,
    /// Jetton metadata.
    pub content: JettonContent,
    /// Jetton wallet contract code.
    pub wallet_code: Arc<Cell>,
    /// Whether staking starts open.
    pub state: bool,
    /// Jettons granted per TON, scaled by 10^9.
    pub price: u64,
    /// Coins reserved in storage; the historical deployments all use
    /// [`RESERVE_COINS`].
    pub cap: u128,
}

impl MinterConfig {
    /// Config with the standard reserve.
    pub fn new(
        admin: MsgAddress,
        content: JettonContent,
        wallet_code: Arc<Cell>,
        state: bool,
        price: u64,
    ) -> Self {
        Self {
            admin,
            content,
            wallet_code,
            state,
            price,
            cap: RESERVE_COINS,
        }
    }

    /// The initial storage cell: zero supply, state bit, price, reserve,
    /// admin twice (admin and withdraw address), content ref, wallet code ref.
    pub fn data_cell(&self) -> StakingResult<Cell> {
        let mut builder = CellBuilder::new();
        builder.store_coins(0)?;
        builder.store_bit(self.state)?;
        builder.store_u64(self.price)?;
        builder.store_coins(self.cap)?;
        builder.store_address(&self.admin)?;
        builder.store_address(&self.admin)?;
        builder.store_ref(Arc::new(content_to_cell(&self.content)?))?;
        builder.store_ref(self.wallet_code.clone())?;
        Ok(builder.build()?)
    }
}

/// A contract's `{code, data}` pair.
#[derive(Debug, Clone)]
pub struct StateInit {
    pub code: Arc<Cell>,
    pub data: Arc<Cell>,
}

impl StateInit {
    /// Serialize: no split depth, not special, code ref present, data ref
    /// present, no libraries.
    pub fn to_cell(&self) -> StakingResult<Cell> {
        let mut builder = CellBuilder::new();
        builder.store_bit(false)?;
        builder.store_bit(false)?;
        builder.store_bit(true)?;
        builder.store_ref(self.code.clone())?;
        builder.store_bit(true)?;
        builder.store_ref(self.data.clone())?;
        builder.store_bit(false)?;
        Ok(builder.build()?)
    }
}

/// The minter contract: its address and the state init that produces it.
#[derive(Debug, Clone)]
pub struct JettonMinterStaking {
    pub address: MsgAddress,
    pub state_init: StateInit,
}

impl JettonMinterStaking {
    /// Derive the contract from its code and deploy config in `workchain`.
    pub fn from_config(
        workchain: i8,
        code: Arc<Cell>,
        config: &MinterConfig,
    ) -> StakingResult<Self> {
        let state_init = StateInit {
            code,
            data: Arc::new(config.data_cell()?),
        };
        let address = MsgAddress::internal(workchain, state_init.to_cell()?.hash());
        Ok(Self {
            address,
            state_init,
        })
    }
}
