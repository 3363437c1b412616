//! Immutable ordinary cells with precomputed standard-representation hashes.

use std::fmt;
use std::sync::Arc;

use crate::{CellError, CellResult, MAX_CELL_BITS, MAX_CELL_REFS, sha256};

/// An immutable TON cell: up to 1023 data bits and up to 4 references.
///
/// Only ordinary cells are supported; exotic cells (pruned branches, library
/// references, merkle proofs) never appear in minter message traffic. The
/// standard-representation SHA-256 hash and the depth are computed once at
/// construction, so hashing a deep tree is O(1) per node.
#[derive(Clone)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    references: Vec<Arc<Cell>>,
    hash: [u8; 32],
    depth: u16,
}

impl Cell {
    /// Construct a cell from raw data bits and references.
    ///
    /// `data` must hold at least `ceil(bit_len / 8)` bytes; unused trailing
    /// bits in the last byte must be zero.
    pub fn new(data: Vec<u8>, bit_len: usize, references: Vec<Arc<Cell>>) -> CellResult<Self> {
        if bit_len > MAX_CELL_BITS {
            return Err(CellError::DataOverflow(bit_len));
        }
        if references.len() > MAX_CELL_REFS {
            return Err(CellError::TooManyRefs(references.len()));
        }

        let depth = references
            .iter()
            .map(|r| r.depth + 1)
            .max()
            .unwrap_or(0);
        let hash = Self::representation_hash(&data, bit_len, &references, depth);

        Ok(Self {
            data,
            bit_len,
            references,
            hash,
            depth,
        })
    }

    /// The raw data bytes (the last byte may be partially used).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of data bits stored in this cell.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// References carried by this cell, in order.
    pub fn references(&self) -> &[Arc<Cell>] {
        &self.references
    }

    /// Number of references.
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Standard-representation SHA-256 hash of this cell.
    pub fn hash(&self) -> [u8; 32] {
        self.hash
    }

    /// Depth of the cell tree rooted here (0 for a leaf).
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// The value of the bit at `index`, counted from the start of the data.
    pub fn bit(&self, index: usize) -> CellResult<bool> {
        if index >= self.bit_len {
            return Err(CellError::NotEnoughBits {
                need: index + 1,
                have: self.bit_len,
            });
        }
        Ok(self.data[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Descriptor bytes d1, d2 per the standard cell representation.
    pub(crate) fn descriptors(&self) -> [u8; 2] {
        let d1 = self.references.len() as u8;
        let d2 = (self.bit_len / 8 + self.bit_len.div_ceil(8)) as u8;
        [d1, d2]
    }

    /// Data bytes augmented with the completion tag when the bit length is
    /// not byte-aligned: a 1 bit after the data, then zero padding.
    pub(crate) fn augmented_data(&self) -> Vec<u8> {
        let byte_len = self.bit_len.div_ceil(8);
        let mut out = self.data[..byte_len].to_vec();
        if self.bit_len % 8 != 0 {
            let tag_pos = self.bit_len % 8;
            out[byte_len - 1] |= 0x80 >> tag_pos;
        }
        out
    }

    fn representation_hash(
        data: &[u8],
        bit_len: usize,
        references: &[Arc<Cell>],
        _depth: u16,
    ) -> [u8; 32] {
        let mut buf = Vec::with_capacity(2 + data.len() + references.len() * 34);
        buf.push(references.len() as u8);
        buf.push((bit_len / 8 + bit_len.div_ceil(8)) as u8);

        let byte_len = bit_len.div_ceil(8);
        let mut augmented = data[..byte_len].to_vec();
        if bit_len % 8 != 0 {
            augmented[byte_len - 1] |= 0x80 >> (bit_len % 8);
        }
        buf.extend_from_slice(&augmented);

        for reference in references {
            buf.extend_from_slice(&reference.depth.to_be_bytes());
        }
        for reference in references {
            buf.extend_from_slice(&reference.hash);
        }

        sha256(&buf)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Cell {}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("bit_len", &self.bit_len)
            .field("refs", &self.references.len())
            .field("hash", &hex_prefix(&self.hash))
            .finish()
    }
}

fn hex_prefix(hash: &[u8; 32]) -> String {
    hash[..4].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellBuilder;

    #[test]
    fn empty_cell_hash() {
        // Standard representation of the empty cell: sha256(00 00).
        let cell = Cell::new(vec![], 0, vec![]).unwrap();
        assert_eq!(
            cell.hash(),
            crate::sha256(&[0x00, 0x00]),
        );
        assert_eq!(cell.depth(), 0);
    }

    #[test]
    fn completion_tag_affects_hash() {
        let mut a = CellBuilder::new();
        a.store_bits(&[0b1010_0000], 3).unwrap();
        let a = a.build().unwrap();

        let mut b = CellBuilder::new();
        b.store_bits(&[0b1010_0000], 4).unwrap();
        let b = b.build().unwrap();

        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn depth_follows_deepest_reference() {
        let leaf = Arc::new(Cell::new(vec![], 0, vec![]).unwrap());
        let mid = Arc::new(Cell::new(vec![], 0, vec![leaf.clone()]).unwrap());
        let root = Cell::new(vec![], 0, vec![leaf, mid]).unwrap();
        assert_eq!(root.depth(), 2);
    }

    #[test]
    fn equality_is_structural() {
        let make = || {
            let mut b = CellBuilder::new();
            b.store_u16(0xABCD).unwrap();
            b.build().unwrap()
        };
        assert_eq!(make(), make());
    }

    #[test]
    fn oversized_cell_rejected() {
        assert!(Cell::new(vec![0u8; 128], 1024, vec![]).is_err());
    }
}
