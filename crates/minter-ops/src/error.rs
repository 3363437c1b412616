//! Operator-layer errors.

use thiserror::Error;

use minter_cell::CellError;
use minter_staking::StakingError;

/// Errors from the operator layer: RPC, signing, console, and flow
/// preconditions.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Cell encoding or decoding failed.
    #[error(transparent)]
    Cell(#[from] CellError),

    /// Message codec failed.
    #[error(transparent)]
    Codec(#[from] StakingError),

    /// HTTP transport failure.
    #[error("rpc transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The RPC endpoint answered but with an error or unusable payload.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// A get-method exited with a non-zero TVM exit code.
    #[error("get-method {method} exited with code {exit_code}")]
    ExitCode { method: String, exit_code: i32 },

    /// The target contract is not deployed.
    #[error("contract at {0} is not deployed")]
    NotDeployed(String),

    /// The account has no transaction history to snapshot.
    #[error("failed to fetch last transaction of the contract")]
    NoTransactionHistory,

    /// Wallet secret key is missing or malformed.
    #[error("invalid wallet key: {0}")]
    InvalidKey(String),

    /// Console read failed (stream closed or I/O error).
    #[error("console error: {0}")]
    Console(#[from] std::io::Error),

    /// A required setting is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias for operator operations.
pub type OpsResult<T> = Result<T, OpsError>;
