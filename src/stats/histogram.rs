use std::collections::{BTreeMap, HashMap};

use crate::error::ChunkError;
use crate::logger::{log, LogSeverity};
use crate::mapblock::{decode, Content, ContentResolver, DecodedChunk};
use crate::store::{BlockPos, RawChunkRecord};

/// Node name to number of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: HashMap<String, u64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, count: u64) {
        match self.counts.get_mut(name) {
            Some(total) => *total += count,
            None => {
                self.counts.insert(name.to_owned(), count);
            }
        }
    }

    /// Adds every count of `other` into `self`. Order of merges never changes the result.
    pub fn merge(&mut self, other: Histogram) {
        for (name, count) in other.counts {
            *self.counts.entry(name).or_insert(0) += count;
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum over all names.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries sorted by name.
    pub fn into_sorted(self) -> Vec<(String, u64)> {
        let sorted: BTreeMap<String, u64> = self.counts.into_iter().collect();
        sorted.into_iter().collect()
    }
}

/// Counts of a single map block.
#[derive(Debug, Clone)]
pub struct ChunkStats {
    pub key: i64,
    pub histogram: Histogram,
    /// Content ids missing from the block's name map, with how many nodes carried them.
    pub unknown_ids: BTreeMap<u16, u64>,
}

impl ChunkStats {
    /// Scans all 4096 nodes of a decoded block.
    pub fn from_chunk(key: i64, chunk: &DecodedChunk) -> Self {
        let mut histogram = Histogram::new();
        let mut unknown_ids = BTreeMap::new();

        for content in ContentResolver::new(chunk).nodes() {
            match content {
                Content::Empty => {}
                Content::Named(name) => histogram.add(name, 1),
                Content::Unknown(id) => *unknown_ids.entry(id).or_insert(0) += 1,
            }
        }

        Self {
            key,
            histogram,
            unknown_ids,
        }
    }

    pub fn unknown_nodes(&self) -> u64 {
        self.unknown_ids.values().sum()
    }
}

/// Decodes a raw record and counts its nodes.
///
/// Unknown content ids do not fail the block. They are logged as warnings, left out of the
/// histogram and kept in [`ChunkStats::unknown_ids`].
pub fn analyze(record: &RawChunkRecord) -> Result<ChunkStats, ChunkError> {
    let chunk = decode(&record.data).map_err(|source| ChunkError::new(record.key, source))?;
    let stats = ChunkStats::from_chunk(record.key, &chunk);

    if !stats.unknown_ids.is_empty() {
        let position = BlockPos::from_key(record.key);
        for (id, nodes) in &stats.unknown_ids {
            log(
                format!(
                    "Skipping {} nodes with unknown content id {} in map block {}",
                    nodes, id, position
                ),
                LogSeverity::Warning,
            );
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(entries: &[(&str, u64)]) -> Histogram {
        let mut histogram = Histogram::new();
        for (name, count) in entries {
            histogram.add(name, *count);
        }
        histogram
    }

    #[test]
    fn test_add_accumulates() {
        let mut counts = Histogram::new();
        counts.add("default:stone", 3);
        counts.add("default:stone", 2);
        counts.add("default:dirt", 1);

        assert_eq!(counts.get("default:stone"), 5);
        assert_eq!(counts.get("default:dirt"), 1);
        assert_eq!(counts.get("default:sand"), 0);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let parts = vec![
            histogram(&[("a", 1), ("b", 2)]),
            histogram(&[("b", 5), ("c", 7)]),
            histogram(&[]),
            histogram(&[("a", 10), ("c", 1), ("d", 4)]),
        ];

        let mut forward = Histogram::new();
        for part in parts.iter().cloned() {
            forward.merge(part);
        }

        let mut backward = Histogram::new();
        for part in parts.iter().rev().cloned() {
            backward.merge(part);
        }

        // (p0 + p1) + (p2 + p3)
        let mut left = parts[0].clone();
        left.merge(parts[1].clone());
        let mut right = parts[2].clone();
        right.merge(parts[3].clone());
        right.merge(left);

        assert_eq!(forward, backward);
        assert_eq!(forward, right);
        assert_eq!(
            forward.into_sorted(),
            vec![
                ("a".to_string(), 11),
                ("b".to_string(), 7),
                ("c".to_string(), 8),
                ("d".to_string(), 4),
            ]
        );
    }

    #[test]
    fn test_empty_histogram() {
        let counts = Histogram::new();
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
        assert!(counts.into_sorted().is_empty());
    }
}
