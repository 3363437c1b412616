//! One operator session against one minter contract.
//!
//! [`MinterSession`] carries the contract address and the client explicitly;
//! there is no ambient current-contract state. Each `send_*` method encodes
//! the operation body and ships it with the operation's attached value; each
//! `get_*` method runs the matching get-method and decodes the stack.

use std::sync::Arc;

use tracing::info;

use minter_cell::{Cell, CellBuilder, MsgAddress};
use minter_staking::{
    JettonData, JettonMinterStaking, StackValue, StakingData, WithdrawData, messages, ops,
    parse_jetton_amount, parse_jetton_data, parse_staking_data, parse_wallet_address,
    parse_withdraw_data, JettonContent,
};

use crate::client::{AccountStatus, ChainClient};
use crate::error::{OpsError, OpsResult};
use crate::poll::{PollPolicy, wait_for_settlement};

/// A session bound to a deployed (or about-to-be-deployed) minter.
pub struct MinterSession<C: ChainClient> {
    client: C,
    address: MsgAddress,
    poll: PollPolicy,
}

impl<C: ChainClient> MinterSession<C> {
    /// Bind `client` to the minter at `address`.
    pub fn new(client: C, address: MsgAddress, poll: PollPolicy) -> Self {
        Self {
            client,
            address,
            poll,
        }
    }

    /// The minter's address.
    pub fn address(&self) -> &MsgAddress {
        &self.address
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Rebind to a different contract, keeping the client.
    pub fn set_address(&mut self, address: MsgAddress) {
        self.address = address;
    }

    /// Current account status of the minter.
    pub async fn status(&self) -> OpsResult<AccountStatus> {
        self.client.account_status(&self.address).await
    }

    /// The last-transaction logical time, or an error when the account has
    /// no history yet. Mutating flows snapshot this before sending.
    pub async fn snapshot_lt(&self) -> OpsResult<u64> {
        self.status()
            .await?
            .last_lt
            .ok_or(OpsError::NoTransactionHistory)
    }

    /// Wait for a transaction to land after `prev_lt`. `Ok(false)` means the
    /// poll budget ran out without an observation.
    pub async fn wait_settlement(&self, prev_lt: u64) -> OpsResult<bool> {
        wait_for_settlement(&self.client, &self.address, prev_lt, &self.poll).await
    }

    // Get-methods.

    pub async fn get_jetton_data(&self) -> OpsResult<JettonData> {
        let stack = self
            .client
            .run_get_method(&self.address, "get_jetton_data", &[])
            .await?;
        Ok(parse_jetton_data(&stack)?)
    }

    pub async fn get_staking_data(&self) -> OpsResult<StakingData> {
        let stack = self
            .client
            .run_get_method(&self.address, "get_staking_data", &[])
            .await?;
        Ok(parse_staking_data(&stack)?)
    }

    pub async fn get_withdraw_data(&self) -> OpsResult<WithdrawData> {
        let stack = self
            .client
            .run_get_method(&self.address, "get_withdraw_data", &[])
            .await?;
        Ok(parse_withdraw_data(&stack)?)
    }

    pub async fn get_wallet_address(&self, owner: &MsgAddress) -> OpsResult<MsgAddress> {
        let mut builder = CellBuilder::new();
        builder.store_address(owner)?;
        let param = StackValue::Slice(Arc::new(builder.build()?));
        let stack = self
            .client
            .run_get_method(&self.address, "get_wallet_address", &[param])
            .await?;
        Ok(parse_wallet_address(&stack)?)
    }

    pub async fn get_jetton_amount(&self, stake: u128) -> OpsResult<u128> {
        let param = StackValue::Int(stake as i128);
        let stack = self
            .client
            .run_get_method(&self.address, "get_jetton_amount", &[param])
            .await?;
        Ok(parse_jetton_amount(&stack)?)
    }

    // Sends.

    /// Deploy the contract: empty body, state init attached.
    pub async fn send_deploy(&self, contract: &JettonMinterStaking) -> OpsResult<()> {
        info!(address = %contract.address, "deploying minter");
        self.client
            .send_internal(
                &contract.address,
                ops::DEPLOY_VALUE,
                None,
                Some(&contract.state_init),
                ops::SEND_MODE_PAY_GAS_SEPARATELY,
            )
            .await
    }

    /// Mint `jetton_amount` to `destination`. The attached value is the
    /// shipped total plus the processing surcharge.
    pub async fn send_mint(
        &self,
        destination: &MsgAddress,
        jetton_amount: u128,
        forward_ton: u128,
        total_ton: u128,
    ) -> OpsResult<()> {
        let body = messages::mint(destination, jetton_amount, forward_ton, total_ton)?;
        self.send(body, total_ton + ops::MINT_SURCHARGE).await
    }

    pub async fn send_provide_wallet_address(
        &self,
        owner: &MsgAddress,
        include_address: bool,
    ) -> OpsResult<()> {
        let body = messages::provide_wallet_address(owner, include_address)?;
        self.send(body, ops::SIMPLE_CHANGE_VALUE).await
    }

    pub async fn send_change_admin(&self, new_admin: &MsgAddress) -> OpsResult<()> {
        let body = messages::change_admin(new_admin)?;
        self.send(body, ops::SIMPLE_CHANGE_VALUE).await
    }

    pub async fn send_change_withdraw_address(&self, address: &MsgAddress) -> OpsResult<()> {
        let body = messages::change_withdraw_address(address)?;
        self.send(body, ops::SIMPLE_CHANGE_VALUE).await
    }

    pub async fn send_change_content(&self, content: &JettonContent) -> OpsResult<()> {
        let body = messages::change_content(content)?;
        self.send(body, ops::SIMPLE_CHANGE_VALUE).await
    }

    pub async fn send_change_state(&self, state: bool) -> OpsResult<()> {
        let body = messages::change_state(state)?;
        self.send(body, ops::GATED_CHANGE_VALUE).await
    }

    pub async fn send_withdraw(&self) -> OpsResult<()> {
        self.send(messages::withdraw()?, ops::SIMPLE_CHANGE_VALUE).await
    }

    /// Stake `value` nanotons.
    pub async fn send_buy(&self, value: u128) -> OpsResult<()> {
        self.send(messages::buy()?, value).await
    }

    pub async fn send_change_price(&self, price: u128) -> OpsResult<()> {
        let body = messages::change_price(price)?;
        self.send(body, ops::GATED_CHANGE_VALUE).await
    }

    pub async fn send_change_withdraw_minimum(&self, minimum: u128) -> OpsResult<()> {
        let body = messages::change_withdraw_minimum(minimum)?;
        self.send(body, ops::GATED_CHANGE_VALUE).await
    }

    async fn send(&self, body: Cell, value: u128) -> OpsResult<()> {
        self.client
            .send_internal(
                &self.address,
                value,
                Some(Arc::new(body)),
                None,
                ops::SEND_MODE_PAY_GAS_SEPARATELY,
            )
            .await
    }
}
