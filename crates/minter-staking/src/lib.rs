//! Message codec for the jetton minter-staking contract.
//!
//! This crate is pure and deterministic: it turns typed operation parameters
//! into binary message cells and typed get-method stacks into records, and
//! nothing here performs I/O. The operator layer sequences these encoders
//! against a live chain.
//!
//! The contract accepts eleven operations (deploy plus ten opcode-tagged
//! bodies) and answers five get-methods. See [`ops`] for the constant table
//! and [`messages`] for the body builders.

mod config;
mod content;
mod data;
mod error;
pub mod messages;
pub mod ops;
mod stack;

pub use config::{JettonMinterStaking, MinterConfig, StateInit};
pub use content::{content_from_cell, content_to_cell, JettonContent};
pub use data::{
    parse_jetton_amount, parse_jetton_data, parse_staking_data, parse_wallet_address,
    parse_withdraw_data, JettonData, StakingData, WithdrawData,
};
pub use error::{StakingError, StakingResult};
pub use stack::StackValue;
