//! Demo pipeline: parallel workers, one in-order consumer
//!
//! Workers claim indices from a shared counter, simulate a variable amount
//! of work, and publish their result into a reordering channel. Because the
//! work time varies, results arrive out of order; the consumer still sees
//! `item-1`, `item-2`, ... in sequence.

use crate::core::error_handling::ContextualError;
use crate::core::shutdown::{ShutdownCoordinator, ShutdownRequested};
use crate::queue::{
    channel_with_baseline, CloseCause, QueueConsumer, QueueError, QueuePublisher,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Resolved pipeline settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub workers: usize,
    pub items: usize,
    pub capacity: usize,
    pub baseline: u64,
    pub max_delay_ms: u64,
    pub verbose: bool,
}

/// Outcome of a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub expected: usize,
    pub delivered: usize,
    pub in_order: bool,
    pub interrupted: bool,
    /// Reason the channel was closed early, if it was
    pub close_reason: Option<String>,
    pub elapsed_ms: u64,
}

impl PipelineReport {
    /// All items arrived, in order, without interruption
    pub fn is_complete(&self) -> bool {
        !self.interrupted && self.in_order && self.delivered == self.expected
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("Pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ContextualError for PipelineError {
    fn is_user_actionable(&self) -> bool {
        match self {
            PipelineError::Queue(e) => e.is_user_actionable(),
            PipelineError::Task(_) => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PipelineError::Queue(e) => e.user_message(),
            PipelineError::Task(_) => None,
        }
    }
}

/// Simulated work time for an index, uniformly spread over `0..=max_delay_ms`
///
/// Seeded from the index, so runs are reproducible.
pub fn work_delay(index: u64, max_delay_ms: u64) -> Duration {
    let mut rng = StdRng::seed_from_u64(index);
    Duration::from_millis(rng.gen_range(0..=max_delay_ms))
}

/// Payload produced for an index
pub fn item_for(index: u64) -> String {
    format!("item-{}", index)
}

/// Run the pipeline to completion or until shutdown closes the channel
pub async fn run(
    config: &PipelineConfig,
    shutdown: &ShutdownCoordinator,
) -> Result<PipelineReport, PipelineError> {
    let started = Instant::now();
    let (publisher, consumer) =
        channel_with_baseline::<String>(config.capacity, config.baseline)?;
    let closer = shutdown.close_on_shutdown(Arc::clone(publisher.channel()));

    log::info!(
        "Starting pipeline: {} items, {} workers, window {}",
        config.items,
        config.workers,
        config.capacity
    );

    let consumer_task = {
        let baseline = config.baseline;
        let verbose = config.verbose;
        tokio::task::spawn_blocking(move || consume(consumer, baseline, verbose))
    };

    let claimed = Arc::new(AtomicUsize::new(0));
    let mut workers = JoinSet::new();
    for worker_id in 0..config.workers {
        let publisher = publisher.clone();
        let claimed = Arc::clone(&claimed);
        let config = config.clone();
        workers.spawn_blocking(move || produce(worker_id, publisher, claimed, &config));
    }

    let mut failure: Option<PipelineError> = None;
    while let Some(joined) = workers.join_next().await {
        let outcome = match joined {
            Ok(result) => result.map_err(PipelineError::from),
            Err(e) => Err(PipelineError::from(e)),
        };
        if let Err(e) = outcome {
            if failure.is_none() {
                log::error!("Worker failed: {}", e);
                publisher.close_with(WorkerFailed(e.to_string()));
                failure = Some(e);
            }
        }
    }
    publisher.close();

    let (delivered, in_order, terminal) = consumer_task.await?;
    closer.abort();

    if let Some(e) = failure {
        return Err(e);
    }

    if let Some(e) = terminal.as_ref().filter(|e| !e.is_closed()) {
        return Err(e.clone().into());
    }
    let cause = terminal.as_ref().and_then(QueueError::close_cause);
    let interrupted = was_interrupted(cause, delivered, config.items);

    let report = PipelineReport {
        expected: config.items,
        delivered,
        in_order,
        interrupted,
        close_reason: cause.map(|c| c.to_string()),
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };
    log::info!(
        "Pipeline finished: {}/{} delivered in {} ms",
        report.delivered,
        report.expected,
        report.elapsed_ms
    );
    Ok(report)
}

/// A shutdown only counts as an interruption if it cost items
fn was_interrupted(cause: Option<&CloseCause>, delivered: usize, expected: usize) -> bool {
    delivered < expected && cause.is_some_and(|c| c.downcast_ref::<ShutdownRequested>().is_some())
}

/// Close cause used when a worker fails
#[derive(Debug, thiserror::Error)]
#[error("worker failed: {0}")]
struct WorkerFailed(String);

fn produce(
    worker_id: usize,
    publisher: QueuePublisher<String>,
    claimed: Arc<AtomicUsize>,
    config: &PipelineConfig,
) -> Result<usize, QueueError> {
    let mut published = 0;
    loop {
        let n = claimed.fetch_add(1, Ordering::Relaxed);
        if n >= config.items {
            break;
        }
        let index = config.baseline + 1 + n as u64;
        std::thread::sleep(work_delay(index, config.max_delay_ms));

        match publisher.publish(item_for(index), index) {
            Ok(_) => published += 1,
            Err(e) if e.is_closed() => {
                log::debug!("Worker {} stopping: {}", worker_id, e);
                break;
            }
            Err(e) => return Err(e),
        }
    }
    log::trace!("Worker {} published {} items", worker_id, published);
    Ok(published)
}

/// Drain the channel, checking every item arrives at its expected position
fn consume(
    mut consumer: QueueConsumer<String>,
    baseline: u64,
    verbose: bool,
) -> (usize, bool, Option<QueueError>) {
    let mut delivered = 0usize;
    let mut in_order = true;

    for item in consumer.by_ref() {
        let expected = item_for(baseline + 1 + delivered as u64);
        if item != expected {
            log::warn!("Out of order: expected {}, got {}", expected, item);
            in_order = false;
        }
        if verbose {
            println!("{}", item);
        }
        delivered += 1;
    }

    (delivered, in_order, consumer.terminal_error().cloned())
}
