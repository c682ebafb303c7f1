//! Error types for decoding chunks, reading the store and running a job.

use thiserror::Error;

use crate::store::BlockPos;

/// Why a single map block could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The version byte is outside the supported 20..=28 range.
    #[error("unsupported map block format version {version}")]
    UnsupportedFormat { version: u8 },

    /// A zlib stream inside the block is corrupt or ends before its terminator.
    #[error("decompression failed at offset {offset}: {reason}")]
    Decompression { offset: usize, reason: String },

    /// A read or skip ran past the end of the buffer.
    #[error("truncated data in {context}: needed {needed} bytes at offset {offset}, {available} available")]
    TruncatedData {
        context: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// A decode failure tagged with the block it happened in.
#[derive(Debug, Error)]
#[error("map block {position} (key {key}): {source}")]
pub struct ChunkError {
    pub key: i64,
    pub position: BlockPos,
    #[source]
    pub source: DecodeError,
}

impl ChunkError {
    pub fn new(key: i64, source: DecodeError) -> Self {
        Self {
            key,
            position: BlockPos::from_key(key),
            source,
        }
    }
}

/// Errors raised while reading records out of a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("no map database found at {0}")]
    MissingDatabase(String),
}

/// Top-level error of a statistics run.
#[derive(Debug, Error)]
pub enum NodeStatsError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// A worker task panicked or the runtime shut it down.
    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("run cancelled after {processed} map blocks")]
    Cancelled { processed: u64 },
}

impl DecodeError {
    /// Whether this failure ends the whole run regardless of the failure policy.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DecodeError::UnsupportedFormat { .. })
    }
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

pub type Result<T> = std::result::Result<T, NodeStatsError>;
