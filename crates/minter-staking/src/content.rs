//! Jetton content cells (TEP-64 off-chain form).
//!
//! The content cell carries an 8-bit type tag followed by the metadata URI
//! as a snake-format string: up to 127 bytes per cell, the remainder
//! continuing in a single reference, chained as deep as needed.

use std::sync::Arc;

use minter_cell::{Cell, CellBuilder, CellSlice};

use crate::error::{StakingError, StakingResult};

/// Bytes of string data per snake cell.
const SNAKE_CHUNK: usize = 127;

/// Off-chain content type tag.
const CONTENT_OFF_CHAIN: u8 = 0x01;

/// Jetton metadata as the contract stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JettonContent {
    /// URI of the off-chain metadata JSON.
    pub uri: String,
}

impl JettonContent {
    /// Wrap a metadata URI.
    pub fn off_chain(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Encode content into its cell form. Deterministic: equal input produces
/// byte-identical cells.
pub fn content_to_cell(content: &JettonContent) -> StakingResult<Cell> {
    let bytes = content.uri.as_bytes();
    let mut builder = CellBuilder::new();
    builder.store_u8(CONTENT_OFF_CHAIN)?;

    let head_len = bytes.len().min(SNAKE_CHUNK - 1);
    builder.store_bytes(&bytes[..head_len])?;

    let mut tail = snake_tail(&bytes[head_len..])?;
    if let Some(cell) = tail.take() {
        builder.store_ref(cell)?;
    }
    Ok(builder.build()?)
}

/// Decode a content cell back into its URI.
pub fn content_from_cell(cell: &Cell) -> StakingResult<JettonContent> {
    let mut slice = CellSlice::new(cell);
    let tag = slice.load_u8()?;
    if tag != CONTENT_OFF_CHAIN {
        return Err(StakingError::ContentType(tag));
    }

    let head_len = slice.bits_left() / 8;
    let mut bytes = slice.load_bytes(head_len)?;
    if slice.refs_left() > 0 {
        let tail = slice.load_ref()?.clone();
        bytes.extend(collect_snake(&tail)?);
    }

    let uri = String::from_utf8(bytes).map_err(|_| StakingError::ContentEncoding)?;
    Ok(JettonContent { uri })
}

fn snake_tail(bytes: &[u8]) -> StakingResult<Option<Arc<Cell>>> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let head_len = bytes.len().min(SNAKE_CHUNK);
    let mut builder = CellBuilder::new();
    builder.store_bytes(&bytes[..head_len])?;
    if let Some(cell) = snake_tail(&bytes[head_len..])? {
        builder.store_ref(cell)?;
    }
    Ok(Some(Arc::new(builder.build()?)))
}

fn collect_snake(cell: &Arc<Cell>) -> StakingResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut current = cell.clone();
    loop {
        let mut slice = CellSlice::new(&current);
        let byte_len = slice.bits_left() / 8;
        bytes.extend(slice.load_bytes(byte_len)?);
        let next = if slice.refs_left() > 0 {
            slice.load_ref()?.clone()
        } else {
            break;
        };
        current = next;
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_uri_roundtrip() {
        let content = JettonContent::off_chain("https://example.com/jetton.json");
        let cell = content_to_cell(&content).unwrap();
        assert_eq!(cell.reference_count(), 0);
        assert_eq!(content_from_cell(&cell).unwrap(), content);
    }

    #[test]
    fn empty_uri_roundtrip() {
        let content = JettonContent::off_chain("");
        let cell = content_to_cell(&content).unwrap();
        assert_eq!(cell.bit_len(), 8);
        assert_eq!(content_from_cell(&cell).unwrap(), content);
    }

    #[test]
    fn long_uri_spills_into_references() {
        let uri: String = std::iter::repeat('a').take(400).collect();
        let content = JettonContent::off_chain(uri);
        let cell = content_to_cell(&content).unwrap();
        assert!(cell.reference_count() > 0);
        assert!(cell.depth() >= 2);
        assert_eq!(content_from_cell(&cell).unwrap(), content);
    }

    #[test]
    fn encoding_is_deterministic() {
        let content = JettonContent::off_chain("ipfs://bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi");
        let a = content_to_cell(&content).unwrap();
        let b = content_to_cell(&content).unwrap();
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn wrong_tag_rejected() {
        let mut builder = CellBuilder::new();
        builder.store_u8(0x00).unwrap();
        let cell = builder.build().unwrap();
        assert!(matches!(
            content_from_cell(&cell),
            Err(StakingError::ContentType(0))
        ));
    }
}
