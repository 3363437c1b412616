//! The RPC seam between the operator flows and the chain.

use std::sync::Arc;

use minter_cell::{Cell, MsgAddress};
use minter_staking::{StackValue, StateInit};

use crate::error::OpsResult;

/// A point-in-time view of an account.
#[derive(Debug, Clone)]
pub struct AccountStatus {
    /// Whether the account is active (code and data present).
    pub deployed: bool,
    /// Balance in nanotons.
    pub balance: u128,
    /// Logical time of the last transaction, if any.
    pub last_lt: Option<u64>,
    /// The account's code cell, if active.
    pub code: Option<Arc<Cell>>,
}

/// Chain access as the operator flows need it.
///
/// The production implementation is [`crate::toncenter::ToncenterClient`];
/// tests drive the flows through an in-memory simulator.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Fetch the current status of `address`.
    async fn account_status(&self, address: &MsgAddress) -> OpsResult<AccountStatus>;

    /// Run a get-method on `address` and return the result stack.
    async fn run_get_method(
        &self,
        address: &MsgAddress,
        method: &str,
        params: &[StackValue],
    ) -> OpsResult<Vec<StackValue>>;

    /// Send an internal message from the operator wallet.
    async fn send_internal(
        &self,
        to: &MsgAddress,
        value: u128,
        body: Option<Arc<Cell>>,
        state_init: Option<&StateInit>,
        mode: u8,
    ) -> OpsResult<()>;

    /// The operator wallet's own address, when a wallet is connected.
    fn sender_address(&self) -> Option<MsgAddress>;
}
