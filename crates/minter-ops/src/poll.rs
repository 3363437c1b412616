//! Transaction settlement polling.

use std::time::Duration;

use tracing::{debug, warn};

use minter_cell::MsgAddress;

use crate::client::ChainClient;
use crate::error::OpsResult;

/// How long and how often to re-check for settlement.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Number of status re-reads before giving up.
    pub attempts: u32,
    /// Pause between re-reads.
    pub delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_millis(1500),
        }
    }
}

/// Wait for a transaction to land on `address`: settlement means the
/// account's last-transaction logical time has advanced past `prev_lt`.
///
/// Returns `Ok(true)` once the logical time moves, `Ok(false)` when the
/// attempt budget runs out. A timeout is inconclusive, not an error; the
/// transaction may still settle later. Transient client errors count as
/// missed attempts.
pub async fn wait_for_settlement(
    client: &impl ChainClient,
    address: &MsgAddress,
    prev_lt: u64,
    policy: &PollPolicy,
) -> OpsResult<bool> {
    for attempt in 1..=policy.attempts {
        tokio::time::sleep(policy.delay).await;
        match client.account_status(address).await {
            Ok(status) => {
                debug!(attempt, last_lt = ?status.last_lt, "polling for settlement");
                if status.last_lt.unwrap_or(0) > prev_lt {
                    return Ok(true);
                }
            }
            Err(error) => {
                warn!(attempt, %error, "status check failed while polling");
            }
        }
    }
    Ok(false)
}
