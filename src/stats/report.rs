use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::ChunkError;
use crate::stats::histogram::{ChunkStats, Histogram};
use crate::store::BlockPos;

/// Running totals of a whole world. Built by folding in per-block results in any order.
#[derive(Debug, Clone, Default)]
pub struct WorldStats {
    histogram: Histogram,
    chunks_processed: u64,
    unknown_nodes: u64,
    failures: Vec<FailedChunk>,
}

impl WorldStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, chunk: ChunkStats) {
        self.chunks_processed += 1;
        self.unknown_nodes += chunk.unknown_nodes();
        self.histogram.merge(chunk.histogram);
    }

    pub fn record_failure(&mut self, error: &ChunkError) {
        self.chunks_processed += 1;
        self.failures.push(FailedChunk {
            key: error.key,
            position: error.position,
            error: error.source.to_string(),
        });
    }

    /// Combines two partial folds.
    pub fn merge(&mut self, other: WorldStats) {
        self.chunks_processed += other.chunks_processed;
        self.unknown_nodes += other.unknown_nodes;
        self.histogram.merge(other.histogram);
        self.failures.extend(other.failures);
    }

    pub fn chunks_processed(&self) -> u64 {
        self.chunks_processed
    }

    pub fn finish(self, elapsed: Duration) -> WorldReport {
        let mut failed_chunks = self.failures;
        failed_chunks.sort_by_key(|failure| failure.key);

        WorldReport {
            nodes: self
                .histogram
                .into_sorted()
                .into_iter()
                .map(|(name, count)| NodeCount { name, count })
                .collect(),
            chunks_processed: self.chunks_processed,
            unknown_nodes: self.unknown_nodes,
            failed_chunks,
            elapsed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedChunk {
    pub key: i64,
    pub position: BlockPos,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeCount {
    pub name: String,
    pub count: u64,
}

/// Final result of a run, nodes sorted by name.
#[derive(Debug, Clone, Serialize)]
pub struct WorldReport {
    pub nodes: Vec<NodeCount>,
    pub chunks_processed: u64,
    pub unknown_nodes: u64,
    pub failed_chunks: Vec<FailedChunk>,
    pub elapsed: Duration,
}

impl WorldReport {
    pub fn count(&self, name: &str) -> u64 {
        self.nodes
            .iter()
            .find(|node| node.name == name)
            .map(|node| node.count)
            .unwrap_or(0)
    }

    pub fn is_success(&self) -> bool {
        self.failed_chunks.is_empty()
    }
}

impl fmt::Display for WorldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{}: {}", node.name, node.count)?;
        }
        if self.unknown_nodes > 0 {
            writeln!(f, "Nodes with unknown content id: {}", self.unknown_nodes)?;
        }
        for failure in &self.failed_chunks {
            writeln!(
                f,
                "Failed map block {} (key {}): {}",
                failure.position, failure.key, failure.error
            )?;
        }
        write!(
            f,
            "Processed {} map blocks in {:?}",
            self.chunks_processed, self.elapsed
        )
    }
}
