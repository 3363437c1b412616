//! Typed TVM stack values for get-method calls.

use std::sync::Arc;

use minter_cell::{Cell, CellSlice, MsgAddress};

use crate::error::{StakingError, StakingResult};

/// One entry of a get-method parameter or result stack.
#[derive(Debug, Clone)]
pub enum StackValue {
    /// TVM null.
    Null,
    /// An integer. 257-bit in the VM; everything the minter returns fits i128.
    Int(i128),
    /// A cell.
    Cell(Arc<Cell>),
    /// A cell slice. Carried as the cell it points into; the minter's slices
    /// always start at the cell boundary.
    Slice(Arc<Cell>),
}

impl StackValue {
    /// The integer at `index`, or a shape error.
    pub fn expect_int(&self, index: usize) -> StakingResult<i128> {
        match self {
            Self::Int(value) => Ok(*value),
            _ => Err(StakingError::StackShape {
                index,
                expected: "int",
            }),
        }
    }

    /// The cell at `index`, or a shape error.
    pub fn expect_cell(&self, index: usize) -> StakingResult<Arc<Cell>> {
        match self {
            Self::Cell(cell) => Ok(cell.clone()),
            _ => Err(StakingError::StackShape {
                index,
                expected: "cell",
            }),
        }
    }

    /// The address in the slice at `index`, or a shape error.
    pub fn expect_address(&self, index: usize) -> StakingResult<MsgAddress> {
        match self {
            Self::Slice(cell) | Self::Cell(cell) => {
                let mut slice = CellSlice::new(cell);
                Ok(slice.load_address()?)
            }
            _ => Err(StakingError::StackShape {
                index,
                expected: "slice",
            }),
        }
    }
}

/// Check the stack length before field extraction.
pub fn expect_len(stack: &[StackValue], expected: usize) -> StakingResult<()> {
    if stack.len() != expected {
        return Err(StakingError::StackLength {
            expected,
            got: stack.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minter_cell::CellBuilder;

    #[test]
    fn shape_errors_name_the_index() {
        let err = StackValue::Null.expect_int(3).unwrap_err();
        assert!(matches!(err, StakingError::StackShape { index: 3, .. }));
    }

    #[test]
    fn address_from_slice() {
        let address = MsgAddress::internal(0, [0x55; 32]);
        let mut builder = CellBuilder::new();
        builder.store_address(&address).unwrap();
        let value = StackValue::Slice(Arc::new(builder.build().unwrap()));
        assert_eq!(value.expect_address(0).unwrap(), address);
    }

    #[test]
    fn length_mismatch() {
        assert!(expect_len(&[StackValue::Int(1)], 2).is_err());
        assert!(expect_len(&[StackValue::Int(1)], 1).is_ok());
    }
}
