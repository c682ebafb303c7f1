//! Decoding of persisted map blocks, format versions 20 through 28.

pub mod content;
pub mod cursor;
pub mod decoder;
pub mod layout;
pub mod zlib;

pub use content::{node_index, Content, ContentResolver, BLOCK_SIDE, NODE_COUNT};
pub use cursor::BlockCursor;
pub use decoder::{decode, DecodedChunk, LEGACY_AIR_ID, LEGACY_IGNORE_ID};
pub use layout::{MAX_VERSION, MIN_VERSION};
