//! Bag of Cells serialization.
//!
//! The BoC format ships a cell DAG as a flat byte string: a header with
//! counts and sizes, the cells in topological order (every parent before its
//! children, references encoded as indices), and an optional CRC32-C trailer.

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::{BOC_GENERIC_MAGIC, Cell, CellError, CellResult, crc32c};

const FLAG_HAS_IDX: u8 = 0x80;
const FLAG_HAS_CRC: u8 = 0x40;
const FLAG_HAS_CACHE_BITS: u8 = 0x20;

/// A serialized-form view of a cell DAG with a single root.
pub struct BagOfCells {
    root: Arc<Cell>,
}

impl BagOfCells {
    /// Wrap a root cell.
    pub fn from_root(root: Cell) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// Wrap a shared root cell.
    pub fn from_root_arc(root: Arc<Cell>) -> Self {
        Self { root }
    }

    /// The single root.
    pub fn single_root(&self) -> CellResult<&Arc<Cell>> {
        Ok(&self.root)
    }

    /// Serialize with a CRC32-C trailer and no index section.
    pub fn serialize(&self) -> CellResult<Vec<u8>> {
        let cells = self.topological_order();
        let mut index = HashMap::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            index.insert(cell.hash(), i);
        }

        let ref_size = bytes_for(cells.len() as u64);

        let mut cell_bytes = Vec::new();
        for cell in &cells {
            cell_bytes.extend_from_slice(&cell.descriptors());
            cell_bytes.extend_from_slice(&cell.augmented_data());
            for reference in cell.references() {
                let ref_index = index[&reference.hash()] as u64;
                cell_bytes.extend_from_slice(&to_be_bytes(ref_index, ref_size));
            }
        }

        let off_bytes = bytes_for(cell_bytes.len() as u64);

        let mut out = Vec::with_capacity(cell_bytes.len() + 32);
        out.extend_from_slice(&BOC_GENERIC_MAGIC.to_be_bytes());
        out.push(FLAG_HAS_CRC | ref_size as u8);
        out.push(off_bytes as u8);
        out.extend_from_slice(&to_be_bytes(cells.len() as u64, ref_size));
        out.extend_from_slice(&to_be_bytes(1, ref_size)); // roots
        out.extend_from_slice(&to_be_bytes(0, ref_size)); // absent
        out.extend_from_slice(&to_be_bytes(cell_bytes.len() as u64, off_bytes));
        out.extend_from_slice(&to_be_bytes(0, ref_size)); // root index
        out.extend_from_slice(&cell_bytes);

        let checksum = crc32c(&out);
        out.extend_from_slice(&checksum.to_le_bytes());
        Ok(out)
    }

    /// Serialize and base64-encode.
    pub fn serialize_base64(&self) -> CellResult<String> {
        Ok(STANDARD.encode(self.serialize()?))
    }

    /// Deserialize from raw bytes. Index and cache-bit sections produced by
    /// other serializers are accepted and skipped.
    pub fn deserialize(bytes: &[u8]) -> CellResult<Self> {
        let mut reader = ByteReader::new(bytes);

        let magic = reader.read_u32()?;
        if magic != BOC_GENERIC_MAGIC {
            return Err(CellError::InvalidBoc(format!(
                "unexpected magic {magic:#010x}"
            )));
        }

        let flags = reader.read_u8()?;
        let has_idx = flags & FLAG_HAS_IDX != 0;
        let has_crc = flags & FLAG_HAS_CRC != 0;
        let _has_cache_bits = flags & FLAG_HAS_CACHE_BITS != 0;
        let ref_size = (flags & 0x07) as usize;
        if ref_size == 0 || ref_size > 4 {
            return Err(CellError::InvalidBoc(format!("bad ref size {ref_size}")));
        }

        let off_bytes = reader.read_u8()? as usize;
        if off_bytes == 0 || off_bytes > 8 {
            return Err(CellError::InvalidBoc(format!(
                "bad offset size {off_bytes}"
            )));
        }

        let cell_count = reader.read_be(ref_size)? as usize;
        let root_count = reader.read_be(ref_size)? as usize;
        let absent_count = reader.read_be(ref_size)? as usize;
        let _total_size = reader.read_be(off_bytes)?;

        if root_count != 1 {
            return Err(CellError::NotSingleRoot(root_count));
        }
        if absent_count != 0 {
            return Err(CellError::InvalidBoc("absent cells not supported".into()));
        }

        let root_index = reader.read_be(ref_size)? as usize;
        if root_index >= cell_count {
            return Err(CellError::InvalidBoc(format!(
                "root index {root_index} out of range"
            )));
        }

        if has_idx {
            reader.skip(cell_count * off_bytes)?;
        }

        // First pass: raw cells with reference indices.
        let mut raw_cells = Vec::with_capacity(cell_count);
        for _ in 0..cell_count {
            let d1 = reader.read_u8()?;
            let d2 = reader.read_u8()?;
            if d1 & 0x08 != 0 {
                return Err(CellError::InvalidBoc("exotic cells not supported".into()));
            }
            let ref_count = (d1 & 0x07) as usize;
            let byte_len = (d2 as usize).div_ceil(2);
            let full_bytes = (d2 / 2) as usize;
            let data = reader.read_bytes(byte_len)?.to_vec();

            let bit_len = if d2 % 2 == 0 {
                full_bytes * 8
            } else {
                // Partial last byte: drop the completion tag.
                let last = data[byte_len - 1];
                let tag_pos = last.trailing_zeros() as usize;
                if tag_pos >= 8 {
                    return Err(CellError::InvalidBoc("missing completion tag".into()));
                }
                byte_len * 8 - tag_pos - 1
            };

            let mut refs = Vec::with_capacity(ref_count);
            for _ in 0..ref_count {
                refs.push(reader.read_be(ref_size)? as usize);
            }
            raw_cells.push((data, bit_len, refs));
        }

        if has_crc {
            let body_len = bytes.len() - 4;
            let expected = u32::from_le_bytes(
                bytes[body_len..]
                    .try_into()
                    .map_err(|_| CellError::InvalidBoc("truncated checksum".into()))?,
            );
            let actual = crc32c(&bytes[..body_len]);
            if expected != actual {
                return Err(CellError::CrcMismatch { expected, actual });
            }
        }

        // Second pass, back to front: references always point forward.
        let mut built: Vec<Option<Arc<Cell>>> = vec![None; cell_count];
        for i in (0..cell_count).rev() {
            let (data, bit_len, ref_indices) = &raw_cells[i];
            let mut references = Vec::with_capacity(ref_indices.len());
            for &ref_index in ref_indices {
                if ref_index <= i || ref_index >= cell_count {
                    return Err(CellError::InvalidBoc(format!(
                        "cell {i} references {ref_index}"
                    )));
                }
                let reference = built[ref_index]
                    .clone()
                    .ok_or_else(|| CellError::InvalidBoc("dangling reference".into()))?;
                references.push(reference);
            }
            let mut normalized = data.clone();
            if bit_len % 8 != 0 {
                // Clear the completion tag and padding for Cell::new.
                let last = normalized.len() - 1;
                let keep = bit_len % 8;
                normalized[last] &= !(0xFFu8 >> keep);
            }
            built[i] = Some(Arc::new(Cell::new(normalized, *bit_len, references)?));
        }

        let root = built[root_index]
            .clone()
            .ok_or_else(|| CellError::InvalidBoc("missing root cell".into()))?;
        Ok(Self { root })
    }

    /// Deserialize from a base64 string.
    pub fn deserialize_base64(text: &str) -> CellResult<Self> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|e| CellError::InvalidBase64(e.to_string()))?;
        Self::deserialize(&bytes)
    }

    /// Unique cells in reverse DFS postorder: for every reference edge the
    /// parent's index is strictly lower than the child's, as the format
    /// requires, with the root at index 0.
    fn topological_order(&self) -> Vec<Arc<Cell>> {
        let mut postorder = Vec::new();
        let mut seen: HashMap<[u8; 32], ()> = HashMap::new();
        let mut stack: Vec<(Arc<Cell>, bool)> = vec![(self.root.clone(), false)];
        while let Some((cell, expanded)) = stack.pop() {
            if expanded {
                postorder.push(cell);
                continue;
            }
            if seen.insert(cell.hash(), ()).is_some() {
                continue;
            }
            stack.push((cell.clone(), true));
            for reference in cell.references() {
                stack.push((reference.clone(), false));
            }
        }
        postorder.reverse();
        postorder
    }
}

fn bytes_for(value: u64) -> usize {
    let mut bytes = 1;
    while value >= 1u64 << (8 * bytes) {
        bytes += 1;
    }
    bytes
}

fn to_be_bytes(value: u64, len: usize) -> Vec<u8> {
    value.to_be_bytes()[8 - len..].to_vec()
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn read_bytes(&mut self, len: usize) -> CellResult<&'a [u8]> {
        if self.pos + len > self.bytes.len() {
            return Err(CellError::InvalidBoc("truncated input".into()));
        }
        let out = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn read_u8(&mut self) -> CellResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self) -> CellResult<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_be(&mut self, len: usize) -> CellResult<u64> {
        let bytes = self.read_bytes(len)?;
        let mut value = 0u64;
        for &byte in bytes {
            value = value << 8 | byte as u64;
        }
        Ok(value)
    }

    fn skip(&mut self, len: usize) -> CellResult<()> {
        self.read_bytes(len).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellBuilder;

    #[test]
    fn empty_cell_roundtrip() {
        let cell = CellBuilder::new().build().unwrap();
        let hash = cell.hash();
        let bytes = BagOfCells::from_root(cell).serialize().unwrap();
        let restored = BagOfCells::deserialize(&bytes).unwrap();
        assert_eq!(restored.single_root().unwrap().hash(), hash);
    }

    #[test]
    fn unaligned_data_roundtrip() {
        let mut builder = CellBuilder::new();
        builder.store_uint(0b101, 3).unwrap();
        let cell = builder.build().unwrap();
        let hash = cell.hash();

        let bytes = BagOfCells::from_root(cell).serialize().unwrap();
        let restored = BagOfCells::deserialize(&bytes).unwrap();
        let root = restored.single_root().unwrap();
        assert_eq!(root.bit_len(), 3);
        assert_eq!(root.hash(), hash);
    }

    #[test]
    fn shared_subtree_is_deduplicated() {
        let shared = Arc::new({
            let mut b = CellBuilder::new();
            b.store_u32(0xAAAA5555).unwrap();
            b.build().unwrap()
        });
        let left = Arc::new({
            let mut b = CellBuilder::new();
            b.store_u8(1).unwrap();
            b.store_ref(shared.clone()).unwrap();
            b.build().unwrap()
        });
        let right = Arc::new({
            let mut b = CellBuilder::new();
            b.store_u8(2).unwrap();
            b.store_ref(shared.clone()).unwrap();
            b.build().unwrap()
        });
        let mut root = CellBuilder::new();
        root.store_ref(left).unwrap();
        root.store_ref(right).unwrap();
        let root = root.build().unwrap();
        let hash = root.hash();

        let boc = BagOfCells::from_root(root);
        // root, left, right, shared once.
        assert_eq!(boc.topological_order().len(), 4);

        let bytes = boc.serialize().unwrap();
        let restored = BagOfCells::deserialize(&bytes).unwrap();
        assert_eq!(restored.single_root().unwrap().hash(), hash);
    }

    #[test]
    fn base64_roundtrip() {
        let mut builder = CellBuilder::new();
        builder.store_u64(0x0123456789ABCDEF).unwrap();
        let cell = builder.build().unwrap();
        let hash = cell.hash();

        let text = BagOfCells::from_root(cell).serialize_base64().unwrap();
        let restored = BagOfCells::deserialize_base64(&text).unwrap();
        assert_eq!(restored.single_root().unwrap().hash(), hash);
    }

    #[test]
    fn corrupted_checksum_rejected() {
        let cell = CellBuilder::new().build().unwrap();
        let mut bytes = BagOfCells::from_root(cell).serialize().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(matches!(
            BagOfCells::deserialize(&bytes),
            Err(CellError::CrcMismatch { .. })
        ));
    }

    #[test]
    fn bad_magic_rejected() {
        assert!(BagOfCells::deserialize(&[0u8; 16]).is_err());
    }

    #[test]
    fn wallet_v3r2_code_parses() {
        // Published wallet v3r2 code cell, as distributed in wallet tooling.
        let text = "te6cckEBAQEAcQAA3v8AIN0gggFMl7ohggEznLqxn3Gw7UTQ0x/THzHXC//jBOCk8mCDCNcYINMf0x/TH/gjE7vyY+1E0NMf0x/T/9FRMrryoVFEuvKiBPkBVBBV+RDyo/gAkyDXSpbTB9QC+wDo0QGkyMsfyx/L/8ntVBC9ba0=";
        let boc = BagOfCells::deserialize_base64(text).unwrap();
        let root = boc.single_root().unwrap();
        assert_eq!(root.bit_len(), 888);
        // Matches the well-known v3r2 code hash.
        assert_eq!(
            root.hash().map(|b| format!("{b:02x}")).join(""),
            "84dafa449f98a6987789ba232358072bc0f76dc4524002a5d0918b9a75d2d599"
        );
    }
}
