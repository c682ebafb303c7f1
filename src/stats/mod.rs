//! Per-block node counting and the world-wide fold.

pub mod histogram;
pub mod report;

pub use histogram::{analyze, ChunkStats, Histogram};
pub use report::{FailedChunk, NodeCount, WorldReport, WorldStats};
