//! Runs a statistics job: drains a store, decodes blocks on a worker pool and folds results.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::{self, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::config::{FailurePolicy, StatsConfig};
use crate::error::{ChunkError, NodeStatsError, Result};
use crate::logger::{log, LogSeverity};
use crate::stats::{analyze, ChunkStats, WorldReport, WorldStats};
use crate::store::{ChunkStore, RawChunkRecord, StoreResult};
use LogSeverity::*;

/// Counts every node of every block in `store`.
///
/// Records are read on a single blocking thread and handed over through a bounded channel,
/// so only a handful of blocks are held in memory at once. Each block is decoded on its own
/// blocking task with at most `config.jobs` in flight. Results are folded in completion
/// order. Cancelling `cancel` abandons all blocks not yet decoded. An unsupported block format
/// ends the run under either failure policy.
pub async fn run<S>(store: S, config: &StatsConfig, cancel: CancellationToken) -> Result<WorldReport>
where
    S: ChunkStore + Send + 'static,
{
    let started = Instant::now();
    let jobs = config.jobs.max(1);

    let (store, total) = task::spawn_blocking(move || {
        let total = store.count();
        (store, total)
    })
    .await?;
    let total = total?;
    log(
        format!("Counting nodes in {} map blocks using {} workers", total, jobs),
        Info,
    );

    let (sender, mut receiver) = mpsc::channel::<RawChunkRecord>(jobs * 2);
    let feed_cancel = cancel.child_token();
    let feeder = {
        let feed_cancel = feed_cancel.clone();
        task::spawn_blocking(move || feed_records(&store, sender, &feed_cancel))
    };

    let mut workers: JoinSet<std::result::Result<ChunkStats, ChunkError>> = JoinSet::new();
    let mut world = WorldStats::new();
    let mut progress = Progress::new(total, config.progress_interval);
    let mut input_open = true;

    while input_open || !workers.is_empty() {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                workers.abort_all();
                log(
                    format!("Run cancelled after {} map blocks", world.chunks_processed()),
                    Warning,
                );
                return Err(NodeStatsError::Cancelled {
                    processed: world.chunks_processed(),
                });
            }

            Some(joined) = workers.join_next(), if !workers.is_empty() => {
                if let Err(error) = fold(&mut world, joined?, config.policy) {
                    workers.abort_all();
                    feed_cancel.cancel();
                    return Err(error);
                }
                progress.tick(world.chunks_processed());
            }

            received = receiver.recv(), if input_open && workers.len() < jobs => {
                match received {
                    Some(record) => {
                        workers.spawn_blocking(move || analyze(&record));
                    }
                    None => input_open = false,
                }
            }
        }
    }

    feeder.await??;

    let elapsed = started.elapsed();
    log(format!("Processed world in {:?}", elapsed), Info);
    Ok(world.finish(elapsed))
}

/// Sends every record of the store down `sender` until the store is exhausted, the
/// receiving side hangs up or the run is cancelled.
fn feed_records<S: ChunkStore>(
    store: &S,
    sender: mpsc::Sender<RawChunkRecord>,
    cancel: &CancellationToken,
) -> StoreResult<()> {
    store.for_each_record(&mut |record| {
        if cancel.is_cancelled() || sender.blocking_send(record).is_err() {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    })
}

fn fold(
    world: &mut WorldStats,
    outcome: std::result::Result<ChunkStats, ChunkError>,
    policy: FailurePolicy,
) -> Result<()> {
    match outcome {
        Ok(chunk) => world.absorb(chunk),
        Err(error) if error.source.is_fatal() || policy == FailurePolicy::Abort => {
            log(format!("Aborting: {}", error), Error);
            return Err(error.into());
        }
        Err(error) => {
            log(format!("Skipping {}", error), Error);
            world.record_failure(&error);
        }
    }
    Ok(())
}

/// Logs how far the run got, at most once per interval.
struct Progress {
    total: u64,
    interval: Duration,
    last_report: Instant,
}

impl Progress {
    fn new(total: u64, interval: Duration) -> Self {
        Self {
            total,
            interval,
            last_report: Instant::now(),
        }
    }

    fn tick(&mut self, done: u64) {
        if self.last_report.elapsed() < self.interval {
            return;
        }
        self.last_report = Instant::now();
        log(
            format!(
                "{:.2}% ({} of {})",
                done as f64 / self.total.max(1) as f64 * 100.0,
                done,
                self.total
            ),
            Info,
        );
    }
}
