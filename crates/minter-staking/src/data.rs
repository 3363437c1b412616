//! Typed views over get-method result stacks.

use std::sync::Arc;

use minter_cell::{Cell, MsgAddress};

use crate::error::StakingResult;
use crate::stack::{StackValue, expect_len};

/// Result of `get_jetton_data`.
#[derive(Debug, Clone)]
pub struct JettonData {
    pub total_supply: u128,
    pub mintable: bool,
    pub admin: MsgAddress,
    pub content: Arc<Cell>,
    pub wallet_code: Arc<Cell>,
}

impl JettonData {
    /// Decode the content cell into its metadata URI.
    pub fn content_uri(&self) -> StakingResult<String> {
        Ok(crate::content_from_cell(&self.content)?.uri)
    }
}

/// Result of `get_staking_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakingData {
    pub state: bool,
    pub price: u64,
}

/// Result of `get_withdraw_data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawData {
    pub minimum: u128,
    pub address: MsgAddress,
}

/// Decode the `get_jetton_data` stack: total supply, mintable flag, admin
/// address, content cell, wallet code.
pub fn parse_jetton_data(stack: &[StackValue]) -> StakingResult<JettonData> {
    expect_len(stack, 5)?;
    Ok(JettonData {
        total_supply: stack[0].expect_int(0)? as u128,
        mintable: stack[1].expect_int(1)? != 0,
        admin: stack[2].expect_address(2)?,
        content: stack[3].expect_cell(3)?,
        wallet_code: stack[4].expect_cell(4)?,
    })
}

/// Decode the `get_staking_data` stack: state flag, price.
pub fn parse_staking_data(stack: &[StackValue]) -> StakingResult<StakingData> {
    expect_len(stack, 2)?;
    Ok(StakingData {
        state: stack[0].expect_int(0)? != 0,
        price: stack[1].expect_int(1)? as u64,
    })
}

/// Decode the `get_withdraw_data` stack: minimum, withdraw address.
pub fn parse_withdraw_data(stack: &[StackValue]) -> StakingResult<WithdrawData> {
    expect_len(stack, 2)?;
    Ok(WithdrawData {
        minimum: stack[0].expect_int(0)? as u128,
        address: stack[1].expect_address(1)?,
    })
}

/// Decode the `get_wallet_address` stack: the owner's jetton wallet address.
pub fn parse_wallet_address(stack: &[StackValue]) -> StakingResult<MsgAddress> {
    expect_len(stack, 1)?;
    stack[0].expect_address(0)
}

/// Decode the `get_jetton_amount` stack: jettons granted for a stake.
pub fn parse_jetton_amount(stack: &[StackValue]) -> StakingResult<u128> {
    expect_len(stack, 1)?;
    Ok(stack[0].expect_int(0)? as u128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StakingError;
    use minter_cell::CellBuilder;

    fn address_slice(address: &MsgAddress) -> StackValue {
        let mut builder = CellBuilder::new();
        builder.store_address(address).unwrap();
        StackValue::Slice(Arc::new(builder.build().unwrap()))
    }

    fn some_cell(tag: u32) -> Arc<Cell> {
        let mut builder = CellBuilder::new();
        builder.store_u32(tag).unwrap();
        Arc::new(builder.build().unwrap())
    }

    #[test]
    fn jetton_data_in_order() {
        let admin = MsgAddress::internal(0, [0x31; 32]);
        let stack = [
            StackValue::Int(12_000_000_000),
            StackValue::Int(-1),
            address_slice(&admin),
            StackValue::Cell(some_cell(1)),
            StackValue::Cell(some_cell(2)),
        ];
        let data = parse_jetton_data(&stack).unwrap();
        assert_eq!(data.total_supply, 12_000_000_000);
        assert!(data.mintable);
        assert_eq!(data.admin, admin);
    }

    #[test]
    fn staking_data_in_order() {
        let stack = [StackValue::Int(0), StackValue::Int(1_000_000_000)];
        let data = parse_staking_data(&stack).unwrap();
        assert_eq!(
            data,
            StakingData {
                state: false,
                price: 1_000_000_000
            }
        );
    }

    #[test]
    fn withdraw_data_in_order() {
        let address = MsgAddress::internal(0, [0x77; 32]);
        let stack = [StackValue::Int(500_000_000), address_slice(&address)];
        let data = parse_withdraw_data(&stack).unwrap();
        assert_eq!(data.minimum, 500_000_000);
        assert_eq!(data.address, address);
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(matches!(
            parse_jetton_data(&[StackValue::Int(1)]),
            Err(StakingError::StackLength {
                expected: 5,
                got: 1
            })
        ));
    }

    #[test]
    fn wrong_shape_rejected() {
        let stack = [
            StackValue::Null,
            StackValue::Int(-1),
            StackValue::Null,
            StackValue::Null,
            StackValue::Null,
        ];
        assert!(parse_jetton_data(&stack).is_err());
    }
}
