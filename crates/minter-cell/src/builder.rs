//! Sequential cell writer.

use std::sync::Arc;

use crate::{Cell, CellError, CellResult, MAX_CELL_BITS, MAX_CELL_REFS, MsgAddress};

/// Builds a [`Cell`] by appending bits, integers, and references in order.
///
/// # Example
/// ```
/// use minter_cell::CellBuilder;
///
/// let mut builder = CellBuilder::new();
/// builder.store_u32(0x4840664f).unwrap();
/// builder.store_u64(0).unwrap();
/// let cell = builder.build().unwrap();
/// assert_eq!(cell.bit_len(), 96);
/// ```
#[derive(Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    references: Vec<Arc<Cell>>,
}

impl CellBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits already written.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Bits still available before the 1023-bit limit.
    pub fn bits_left(&self) -> usize {
        MAX_CELL_BITS - self.bit_len
    }

    /// References still available before the 4-reference limit.
    pub fn refs_left(&self) -> usize {
        MAX_CELL_REFS - self.references.len()
    }

    /// Append a single bit.
    pub fn store_bit(&mut self, bit: bool) -> CellResult<&mut Self> {
        if self.bit_len >= MAX_CELL_BITS {
            return Err(CellError::DataOverflow(self.bit_len + 1));
        }
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
        Ok(self)
    }

    /// Append the first `bit_len` bits of `data` (most significant bit first).
    pub fn store_bits(&mut self, data: &[u8], bit_len: usize) -> CellResult<&mut Self> {
        if data.len() * 8 < bit_len {
            return Err(CellError::NotEnoughBits {
                need: bit_len,
                have: data.len() * 8,
            });
        }
        if self.bit_len + bit_len > MAX_CELL_BITS {
            return Err(CellError::DataOverflow(self.bit_len + bit_len));
        }
        for i in 0..bit_len {
            let bit = data[i / 8] & (0x80 >> (i % 8)) != 0;
            self.store_bit(bit)?;
        }
        Ok(self)
    }

    /// Append an unsigned integer in `bits` bits (big-endian), `bits <= 64`.
    pub fn store_uint(&mut self, value: u64, bits: usize) -> CellResult<&mut Self> {
        if bits > 64 {
            return Err(CellError::InvalidBitWidth(bits));
        }
        if bits < 64 && value >> bits != 0 {
            return Err(CellError::InvalidBitWidth(bits));
        }
        for i in (0..bits).rev() {
            self.store_bit(value >> i & 1 != 0)?;
        }
        Ok(self)
    }

    /// Append a signed integer in `bits` bits (two's complement), `bits <= 64`.
    pub fn store_int(&mut self, value: i64, bits: usize) -> CellResult<&mut Self> {
        if bits == 0 || bits > 64 {
            return Err(CellError::InvalidBitWidth(bits));
        }
        self.store_uint(value as u64 & mask(bits), bits)
    }

    /// Append an unsigned 8-bit integer.
    pub fn store_u8(&mut self, value: u8) -> CellResult<&mut Self> {
        self.store_uint(value as u64, 8)
    }

    /// Append an unsigned 16-bit integer.
    pub fn store_u16(&mut self, value: u16) -> CellResult<&mut Self> {
        self.store_uint(value as u64, 16)
    }

    /// Append an unsigned 32-bit integer.
    pub fn store_u32(&mut self, value: u32) -> CellResult<&mut Self> {
        self.store_uint(value as u64, 32)
    }

    /// Append an unsigned 64-bit integer.
    pub fn store_u64(&mut self, value: u64) -> CellResult<&mut Self> {
        self.store_uint(value, 64)
    }

    /// Append whole bytes.
    pub fn store_bytes(&mut self, bytes: &[u8]) -> CellResult<&mut Self> {
        self.store_bits(bytes, bytes.len() * 8)
    }

    /// Append a TON coins amount as VarUInteger 16: a 4-bit byte length
    /// followed by that many big-endian value bytes.
    pub fn store_coins(&mut self, amount: u128) -> CellResult<&mut Self> {
        let byte_len = (16 - amount.leading_zeros() as usize / 8).min(16);
        if byte_len > 15 {
            return Err(CellError::CoinsOverflow(amount));
        }
        self.store_uint(byte_len as u64, 4)?;
        let bytes = amount.to_be_bytes();
        self.store_bytes(&bytes[16 - byte_len..])
    }

    /// Append a message address.
    pub fn store_address(&mut self, address: &MsgAddress) -> CellResult<&mut Self> {
        address.store_into(self)?;
        Ok(self)
    }

    /// Append a reference to another cell.
    pub fn store_ref(&mut self, cell: Arc<Cell>) -> CellResult<&mut Self> {
        if self.references.len() >= MAX_CELL_REFS {
            return Err(CellError::TooManyRefs(self.references.len() + 1));
        }
        self.references.push(cell);
        Ok(self)
    }

    /// Finalize into an immutable [`Cell`].
    pub fn build(self) -> CellResult<Cell> {
        Cell::new(self.data, self.bit_len, self.references)
    }
}

fn mask(bits: usize) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellSlice;

    #[test]
    fn uint_width_is_checked() {
        let mut builder = CellBuilder::new();
        assert!(builder.store_uint(0, 65).is_err());
        assert!(builder.store_uint(4, 2).is_err());
        assert!(builder.store_uint(3, 2).is_ok());
    }

    #[test]
    fn coins_zero_is_a_single_nibble() {
        let mut builder = CellBuilder::new();
        builder.store_coins(0).unwrap();
        let cell = builder.build().unwrap();
        assert_eq!(cell.bit_len(), 4);
    }

    #[test]
    fn coins_one_ton_layout() {
        // 1_000_000_000 = 0x3B9ACA00, 4 bytes.
        let mut builder = CellBuilder::new();
        builder.store_coins(1_000_000_000).unwrap();
        let cell = builder.build().unwrap();
        assert_eq!(cell.bit_len(), 4 + 32);

        let mut slice = CellSlice::new(&cell);
        assert_eq!(slice.load_uint(4).unwrap(), 4);
        assert_eq!(slice.load_uint(32).unwrap(), 0x3B9A_CA00);
    }

    #[test]
    fn signed_roundtrip() {
        for value in [-1i64, -128, 0, 1, 127] {
            let mut builder = CellBuilder::new();
            builder.store_int(value, 8).unwrap();
            let cell = builder.build().unwrap();
            let mut slice = CellSlice::new(&cell);
            assert_eq!(slice.load_int(8).unwrap(), value);
        }
    }

    #[test]
    fn short_source_slice_rejected() {
        let mut builder = CellBuilder::new();
        assert!(matches!(
            builder.store_bits(&[0xFF], 9),
            Err(CellError::NotEnoughBits { need: 9, have: 8 })
        ));
        assert!(builder.store_bits(&[0xFF], 8).is_ok());
    }

    #[test]
    fn unaligned_bits_then_bytes() {
        let mut builder = CellBuilder::new();
        builder.store_bit(true).unwrap();
        builder.store_bytes(&[0xAB, 0xCD]).unwrap();
        let cell = builder.build().unwrap();
        assert_eq!(cell.bit_len(), 17);

        let mut slice = CellSlice::new(&cell);
        assert!(slice.load_bit().unwrap());
        assert_eq!(slice.load_uint(16).unwrap(), 0xABCD);
    }
}
