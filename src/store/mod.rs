//! Sources of raw map block records.

mod position;
mod sqlite;

use std::ops::ControlFlow;

use bytes::Bytes;

use crate::error::StoreError;

pub use position::BlockPos;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One persisted map block: its integer key and the still-compressed record.
#[derive(Debug, Clone)]
pub struct RawChunkRecord {
    pub key: i64,
    pub data: Bytes,
}

impl RawChunkRecord {
    pub fn new(key: i64, data: impl Into<Bytes>) -> Self {
        Self {
            key,
            data: data.into(),
        }
    }

    pub fn position(&self) -> BlockPos {
        BlockPos::from_key(self.key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A backend holding map blocks.
///
/// Records are visited one at a time, in whatever order the backend returns them. The
/// visitor can stop the walk early by returning [`ControlFlow::Break`].
pub trait ChunkStore {
    /// Number of records `for_each_record` is expected to visit. Used for progress only.
    fn count(&self) -> StoreResult<u64>;

    fn for_each_record(
        &self,
        visit: &mut dyn FnMut(RawChunkRecord) -> ControlFlow<()>,
    ) -> StoreResult<()>;
}

/// Keeps records in memory. Handy for tests and for callers that already hold the blobs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Vec<RawChunkRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: i64, data: impl Into<Bytes>) {
        self.records.push(RawChunkRecord::new(key, data));
    }
}

impl FromIterator<RawChunkRecord> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = RawChunkRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl ChunkStore for MemoryStore {
    fn count(&self) -> StoreResult<u64> {
        Ok(self.records.len() as u64)
    }

    fn for_each_record(
        &self,
        visit: &mut dyn FnMut(RawChunkRecord) -> ControlFlow<()>,
    ) -> StoreResult<()> {
        for record in &self.records {
            if visit(record.clone()).is_break() {
                break;
            }
        }
        Ok(())
    }
}
