//! Codec errors.

use thiserror::Error;

use minter_cell::CellError;

/// Errors from encoding contract messages or decoding get-method results.
#[derive(Debug, Error)]
pub enum StakingError {
    /// Underlying cell operation failed.
    #[error(transparent)]
    Cell(#[from] CellError),

    /// Get-method stack had the wrong number of entries.
    #[error("unexpected stack length: expected {expected}, got {got}")]
    StackLength { expected: usize, got: usize },

    /// Get-method stack entry had the wrong type.
    #[error("unexpected stack entry at {index}: expected {expected}")]
    StackShape {
        index: usize,
        expected: &'static str,
    },

    /// Content cell did not carry the expected type tag.
    #[error("unsupported content type tag {0:#04x}")]
    ContentType(u8),

    /// Content URI is not valid UTF-8.
    #[error("content URI is not valid UTF-8")]
    ContentEncoding,
}

/// Result alias for codec operations.
pub type StakingResult<T> = Result<T, StakingError>;
