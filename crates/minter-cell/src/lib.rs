//! Cell primitives for TON contract tooling.
//!
//! Everything the minter codec touches on-chain is expressed as cells:
//! up to 1023 bits of data plus up to 4 references to other cells, forming
//! a DAG identified by its standard-representation SHA-256 hash.
//!
//! This crate provides:
//!
//! - [`Cell`]: an immutable ordinary cell with its hash and depth precomputed
//! - [`CellBuilder`]: sequential writer for bits, integers, coins, addresses
//! - [`CellSlice`]: sequential reader over a cell's data and references
//! - [`MsgAddress`]: TON address in raw and user-friendly forms
//! - [`BagOfCells`]: the BoC wire format used to ship cells to the network
//!
//! # Example
//!
//! ```
//! use minter_cell::{CellBuilder, CellSlice};
//!
//! let mut builder = CellBuilder::new();
//! builder.store_u32(0x4fda1e51).unwrap();
//! builder.store_coins(1_000_000_000).unwrap();
//! let cell = builder.build().unwrap();
//!
//! let mut slice = CellSlice::new(&cell);
//! assert_eq!(slice.load_u32().unwrap(), 0x4fda1e51);
//! assert_eq!(slice.load_coins().unwrap(), 1_000_000_000);
//! ```

use sha2::{Digest, Sha256};
use thiserror::Error;

mod address;
mod boc;
mod builder;
mod cell;
mod slice;

pub use address::MsgAddress;
pub use boc::BagOfCells;
pub use builder::CellBuilder;
pub use cell::Cell;
pub use slice::CellSlice;

/// Maximum number of data bits in a single cell.
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum number of references a cell can carry.
pub const MAX_CELL_REFS: usize = 4;

/// BoC magic for the generic serialization format.
pub const BOC_GENERIC_MAGIC: u32 = 0xb5ee9c72;

/// Errors from cell construction, parsing, and BoC (de)serialization.
#[derive(Debug, Error)]
pub enum CellError {
    /// Cell data would exceed the 1023-bit limit.
    #[error("cell data overflow: {0} bits (max 1023)")]
    DataOverflow(usize),

    /// Cell would carry more than 4 references.
    #[error("too many cell references: {0} (max 4)")]
    TooManyRefs(usize),

    /// Integer width outside the supported 0..=64 range.
    #[error("unsupported integer width: {0} bits")]
    InvalidBitWidth(usize),

    /// Reader ran out of data bits.
    #[error("not enough bits: need {need}, have {have}")]
    NotEnoughBits { need: usize, have: usize },

    /// Reader ran out of references.
    #[error("not enough refs: need {need}, have {have}")]
    NotEnoughRefs { need: usize, have: usize },

    /// Coins value does not fit VarUInteger 16.
    #[error("coins value too large: {0}")]
    CoinsOverflow(u128),

    /// Address string or bit pattern is not a valid TON address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed BoC bytes.
    #[error("invalid BoC: {0}")]
    InvalidBoc(String),

    /// BoC checksum did not match its payload.
    #[error("BoC CRC32-C mismatch: expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch { expected: u32, actual: u32 },

    /// BoC did not contain exactly one root cell.
    #[error("expected a single root cell, found {0}")]
    NotSingleRoot(usize),

    /// Invalid base64 payload.
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
}

/// Result alias for cell operations.
pub type CellResult<T> = Result<T, CellError>;

/// SHA-256 over `data`.
pub(crate) fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// CRC32-C (Castagnoli), used by the BoC trailer.
pub(crate) fn crc32c(data: &[u8]) -> u32 {
    const CRC: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISCSI);
    CRC.checksum(data)
}

/// CRC16-XMODEM, used by user-friendly addresses.
pub(crate) fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
