//! Sequential cell reader.

use std::sync::Arc;

use crate::{Cell, CellError, CellResult, MsgAddress};

/// Reads bits, integers, and references from a [`Cell`] in order.
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> CellSlice<'a> {
    /// Start reading `cell` from the beginning.
    pub fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    /// Bits remaining.
    pub fn bits_left(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    /// References remaining.
    pub fn refs_left(&self) -> usize {
        self.cell.reference_count() - self.ref_pos
    }

    /// True when no bits and no references remain.
    pub fn is_empty(&self) -> bool {
        self.bits_left() == 0 && self.refs_left() == 0
    }

    /// Read one bit.
    pub fn load_bit(&mut self) -> CellResult<bool> {
        if self.bits_left() == 0 {
            return Err(CellError::NotEnoughBits {
                need: 1,
                have: 0,
            });
        }
        let bit = self.cell.bit(self.bit_pos)?;
        self.bit_pos += 1;
        Ok(bit)
    }

    /// Read an unsigned integer of `bits` bits, `bits <= 64`.
    pub fn load_uint(&mut self, bits: usize) -> CellResult<u64> {
        if bits > 64 {
            return Err(CellError::InvalidBitWidth(bits));
        }
        if self.bits_left() < bits {
            return Err(CellError::NotEnoughBits {
                need: bits,
                have: self.bits_left(),
            });
        }
        let mut value = 0u64;
        for _ in 0..bits {
            value = value << 1 | self.load_bit()? as u64;
        }
        Ok(value)
    }

    /// Read a signed integer of `bits` bits (two's complement), `bits <= 64`.
    pub fn load_int(&mut self, bits: usize) -> CellResult<i64> {
        if bits == 0 || bits > 64 {
            return Err(CellError::InvalidBitWidth(bits));
        }
        let raw = self.load_uint(bits)?;
        let shift = 64 - bits;
        Ok((raw << shift) as i64 >> shift)
    }

    /// Read an unsigned 8-bit integer.
    pub fn load_u8(&mut self) -> CellResult<u8> {
        Ok(self.load_uint(8)? as u8)
    }

    /// Read an unsigned 16-bit integer.
    pub fn load_u16(&mut self) -> CellResult<u16> {
        Ok(self.load_uint(16)? as u16)
    }

    /// Read an unsigned 32-bit integer.
    pub fn load_u32(&mut self) -> CellResult<u32> {
        Ok(self.load_uint(32)? as u32)
    }

    /// Read an unsigned 64-bit integer.
    pub fn load_u64(&mut self) -> CellResult<u64> {
        self.load_uint(64)
    }

    /// Read `len` whole bytes.
    pub fn load_bytes(&mut self, len: usize) -> CellResult<Vec<u8>> {
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.load_u8()?);
        }
        Ok(out)
    }

    /// Skip `bits` bits.
    pub fn skip_bits(&mut self, bits: usize) -> CellResult<()> {
        if self.bits_left() < bits {
            return Err(CellError::NotEnoughBits {
                need: bits,
                have: self.bits_left(),
            });
        }
        self.bit_pos += bits;
        Ok(())
    }

    /// Read a VarUInteger-16 coins amount.
    pub fn load_coins(&mut self) -> CellResult<u128> {
        let byte_len = self.load_uint(4)? as usize;
        let mut value = 0u128;
        for _ in 0..byte_len {
            value = value << 8 | self.load_u8()? as u128;
        }
        Ok(value)
    }

    /// Read a message address.
    pub fn load_address(&mut self) -> CellResult<MsgAddress> {
        MsgAddress::load_from(self)
    }

    /// Read the next reference.
    pub fn load_ref(&mut self) -> CellResult<&'a Arc<Cell>> {
        let reference = self
            .cell
            .references()
            .get(self.ref_pos)
            .ok_or(CellError::NotEnoughRefs {
                need: self.ref_pos + 1,
                have: self.cell.reference_count(),
            })?;
        self.ref_pos += 1;
        Ok(reference)
    }
}
