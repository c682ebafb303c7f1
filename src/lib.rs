pub mod config;
pub mod driver;
pub mod error;
pub mod logger;
pub mod mapblock;
pub mod stats;
pub mod store;

// Re-export commonly used items
pub use config::{FailurePolicy, StatsConfig};
pub use error::{ChunkError, DecodeError, NodeStatsError};
pub use logger::{log, LogSeverity};
pub use mapblock::{decode, ContentResolver, DecodedChunk};
pub use stats::{Histogram, WorldReport};
pub use store::{ChunkStore, MemoryStore, RawChunkRecord, SqliteStore};
