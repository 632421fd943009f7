//! Reordering Channel Component
//!
//! A bounded channel that accepts items tagged with unique, increasing
//! indices from any number of concurrent producers and releases them to a
//! consumer strictly in index order, with no gaps, whatever order they
//! arrived in. It turns the output of parallel, out-of-order work back into
//! a deterministic sequential stream.
//!
//! # Overview
//!
//! - **Many Producers**: any thread may `put` an item at its index
//! - **Ordered Delivery**: `take` returns index `last + 1`, then `last + 2`, ...
//! - **Backpressure**: only the next `capacity` indices are buffered; a
//!   producer whose index is further ahead blocks until the window moves
//! - **Close-then-drain**: after `close`, buffered items can still be taken;
//!   every later `put` and the first `take` on an empty channel fail with the
//!   latched close cause
//!
//! # Architecture
//!
//! ```text
//!  ┌────────────┐ put(v, 3) ┌────────────┐ put(v, 1) ┌────────────┐ put(v, 5)
//!  │ Producer A │──────┐    │ Producer B │────┐      │ Producer C │───┐ (blocks:
//!  └────────────┘      │    └────────────┘    │      └────────────┘   │  5 > 0+4)
//!                      ▼                      ▼                       ▼
//!  ┌──────────────────────────────────────────────────────────────────────┐
//!  │ ReorderChannel (capacity 4, last_output_index 0)                     │
//!  │   offset:  1     2     3     4                                       │
//!  │          ┌─────┬─────┬─────┬─────┐                                   │
//!  │          │ v1  │  -  │ v3  │  -  │   available = 1                   │
//!  │          └─────┴─────┴─────┴─────┘                                   │
//!  └──────────────────────────────────┬───────────────────────────────────┘
//!                                     │ take() -> v1, window slides by one
//!                                     ▼
//!                               ┌────────────┐
//!                               │  Consumer  │
//!                               └────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use reorder::queue::ReorderChannel;
//! use std::sync::Arc;
//! use std::thread;
//!
//! # fn example() -> Result<(), reorder::queue::QueueError> {
//! let channel = Arc::new(ReorderChannel::new(5)?);
//!
//! channel.put(3, 3)?;
//! assert!(!channel.is_ready());
//!
//! let producer = {
//!     let channel = Arc::clone(&channel);
//!     thread::spawn(move || channel.put(1, 1))
//! };
//! producer.join().unwrap()?;
//!
//! assert!(channel.is_ready());
//! assert_eq!(channel.take()?, 1);
//! assert!(!channel.is_ready()); // index 2 is still missing
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod consumer;
mod error;
mod guard;
mod internal;
mod publisher;
mod reorder_channel;
mod types;

pub mod api;

pub use consumer::QueueConsumer;
pub use error::{CloseCause, DuplicateReason, QueueError, QueueResult};
pub use guard::ChannelGuard;
pub use publisher::QueuePublisher;
pub use reorder_channel::ReorderChannel;
pub use types::ChannelStats;

use std::sync::Arc;

/// Create a channel and split it into a publisher and a consumer
///
/// The publisher can be cloned for every producer; the consumer is unique.
pub fn channel<T>(capacity: usize) -> QueueResult<(QueuePublisher<T>, QueueConsumer<T>)> {
    channel_with_baseline(capacity, 0)
}

/// Like [`channel`], with the first expected index at `baseline + 1`
pub fn channel_with_baseline<T>(
    capacity: usize,
    baseline: u64,
) -> QueueResult<(QueuePublisher<T>, QueueConsumer<T>)> {
    let shared = Arc::new(ReorderChannel::with_baseline(capacity, baseline)?);
    Ok((
        QueuePublisher::new(Arc::clone(&shared)),
        QueueConsumer::new(shared),
    ))
}

#[cfg(test)]
mod tests;
