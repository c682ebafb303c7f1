//! Turns node coordinates of a decoded block into node names.

use crate::mapblock::decoder::DecodedChunk;
use crate::mapblock::layout::has_wide_content;

/// Nodes along each edge of a map block.
pub const BLOCK_SIDE: usize = 16;
/// Nodes in a map block.
pub const NODE_COUNT: usize = BLOCK_SIDE * BLOCK_SIDE * BLOCK_SIDE;

/// Distance from a node's first content byte to the byte holding its extra id bits in the
/// narrow (pre-24) grid layout.
const NARROW_EXTENSION_OFFSET: usize = 0x2000;
/// Largest content id the narrow layout stores in a single byte.
const NARROW_MAX_SINGLE_BYTE: u8 = 0x80;

/// Linear node index of a coordinate inside a block.
pub fn node_index(x: usize, y: usize, z: usize) -> usize {
    x + BLOCK_SIDE * y + BLOCK_SIDE * BLOCK_SIDE * z
}

/// Minimum inflated grid length for every node index to be readable.
pub fn required_payload_len(version: u8) -> usize {
    if has_wide_content(version) {
        NODE_COUNT * 2
    } else {
        NARROW_EXTENSION_OFFSET + NODE_COUNT
    }
}

/// Reads the content id at `index` out of an inflated grid.
///
/// Version 24 and later store a big-endian u16 per node. Older versions store one byte per
/// node and, for ids that do not fit, take four extra bits from the high nibble of a second
/// byte 0x2000 further on.
pub fn read_content_id(payload: &[u8], version: u8, index: usize) -> u16 {
    assert!(index < NODE_COUNT, "node index {index} out of range");

    if has_wide_content(version) {
        let offset = index * 2;
        return u16::from_be_bytes([payload[offset], payload[offset + 1]]);
    }

    let first = payload[index];
    if first <= NARROW_MAX_SINGLE_BYTE {
        first as u16
    } else {
        ((first as u16) << 4) | ((payload[index + NARROW_EXTENSION_OFFSET] as u16) >> 4)
    }
}

/// What a single node resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    /// Air or ignore. Not counted.
    Empty,
    Named(&'a str),
    /// The id is not reserved and the block's name map has no entry for it.
    Unknown(u16),
}

/// Resolves nodes of one decoded block.
pub struct ContentResolver<'a> {
    chunk: &'a DecodedChunk,
}

impl<'a> ContentResolver<'a> {
    pub fn new(chunk: &'a DecodedChunk) -> Self {
        Self { chunk }
    }

    pub fn resolve(&self, x: usize, y: usize, z: usize) -> Content<'a> {
        self.resolve_index(node_index(x, y, z))
    }

    pub fn resolve_index(&self, index: usize) -> Content<'a> {
        let id = self.chunk.content_id(index);
        if self.chunk.is_reserved(id) {
            return Content::Empty;
        }
        match self.chunk.name_map().get(&id) {
            Some(name) => Content::Named(name.as_str()),
            None => Content::Unknown(id),
        }
    }

    /// Every node of the block, in node index order.
    pub fn nodes(&self) -> impl Iterator<Item = Content<'a>> + '_ {
        (0..NODE_COUNT).map(move |index| self.resolve_index(index))
    }
}
