//! Operator tooling for the jetton minter-staking contract.
//!
//! Everything stateful lives here: the RPC seam to the chain
//! ([`ChainClient`]), the toncenter HTTP backend, the wallet signer, the
//! console seam, settlement polling, and the interactive session that
//! sequences codec calls with confirmation and verification.

pub mod actions;
pub mod amount;
pub mod client;
pub mod console;
mod error;
pub mod keys;
pub mod poll;
pub mod session;
pub mod settings;
pub mod telemetry;
pub mod toncenter;
pub mod wallet;

pub use client::{AccountStatus, ChainClient};
pub use error::{OpsError, OpsResult};
pub use session::MinterSession;
pub use settings::Settings;
