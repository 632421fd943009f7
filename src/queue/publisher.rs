//! Queue Publisher for committing indexed items
//!
//! Publishers are cheap, cloneable handles that any number of producer
//! threads can hold at once. Each one forwards to the same shared channel.

use crate::queue::error::QueueResult;
use crate::queue::reorder_channel::ReorderChannel;
use std::error::Error as StdError;
use std::sync::Arc;

/// Producer handle for a reordering channel
///
/// # Example
///
/// ```rust
/// # use reorder::queue::channel;
/// # fn example() -> Result<(), reorder::queue::QueueError> {
/// let (publisher, consumer) = channel::<String>(4)?;
///
/// let workers: Vec<_> = (1..=4u64)
///     .rev()
///     .map(|index| {
///         let publisher = publisher.clone();
///         std::thread::spawn(move || publisher.publish(format!("item-{}", index), index))
///     })
///     .collect();
/// for worker in workers {
///     worker.join().unwrap()?;
/// }
///
/// assert_eq!(consumer.read()?, "item-1");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct QueuePublisher<T> {
    channel: Arc<ReorderChannel<T>>,
}

impl<T> QueuePublisher<T> {
    pub(crate) fn new(channel: Arc<ReorderChannel<T>>) -> Self {
        Self { channel }
    }

    /// Commit `value` at `index`; blocks while `index` is beyond the window
    pub fn publish(&self, value: T, index: u64) -> QueueResult<u64> {
        self.channel.put(value, index)
    }

    pub fn close(&self) {
        self.channel.close();
    }

    pub fn close_with<E>(&self, cause: E)
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        self.channel.close_with(cause);
    }

    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    /// The shared channel behind this handle
    pub fn channel(&self) -> &Arc<ReorderChannel<T>> {
        &self.channel
    }
}

impl<T> Clone for QueuePublisher<T> {
    fn clone(&self) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
        }
    }
}
