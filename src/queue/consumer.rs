//! Queue Consumer for draining items in index order
//!
//! There is one consumer per channel; the handle is not `Clone`.

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::reorder_channel::ReorderChannel;
use std::sync::Arc;

/// Consumer handle for a reordering channel
///
/// Besides `read`, the consumer is an [`Iterator`] that yields items in
/// index order until the channel is closed and drained (or fails). The error
/// that ended iteration is kept and available through
/// [`QueueConsumer::terminal_error`].
///
/// ```rust
/// # use reorder::queue::channel;
/// let (publisher, mut consumer) = channel::<u32>(3).unwrap();
/// publisher.publish(30, 3).unwrap();
/// publisher.publish(10, 1).unwrap();
/// publisher.publish(20, 2).unwrap();
/// publisher.close();
///
/// let drained: Vec<u32> = consumer.by_ref().collect();
/// assert_eq!(drained, vec![10, 20, 30]);
/// assert!(consumer.terminal_error().unwrap().is_closed());
/// ```
pub struct QueueConsumer<T> {
    channel: Arc<ReorderChannel<T>>,
    terminal: Option<QueueError>,
}

impl<T> QueueConsumer<T> {
    pub(crate) fn new(channel: Arc<ReorderChannel<T>>) -> Self {
        Self {
            channel,
            terminal: None,
        }
    }

    /// Read the next item in order, blocking until it is committed
    pub fn read(&self) -> QueueResult<T> {
        self.channel.take()
    }

    /// True if the next item can be taken without blocking (racy)
    pub fn is_ready(&self) -> bool {
        self.channel.is_ready()
    }

    /// The error that ended iteration, if iteration has ended
    pub fn terminal_error(&self) -> Option<&QueueError> {
        self.terminal.as_ref()
    }

    /// Iteration ended because the channel was closed and drained
    pub fn is_drained(&self) -> bool {
        self.terminal.as_ref().is_some_and(QueueError::is_closed)
    }

    /// The shared channel behind this handle
    pub fn channel(&self) -> &Arc<ReorderChannel<T>> {
        &self.channel
    }
}

impl<T> Iterator for QueueConsumer<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.terminal.is_some() {
            return None;
        }

        match self.channel.take() {
            Ok(value) => Some(value),
            Err(e) => {
                if !e.is_closed() {
                    log::debug!("Consumer stopped on error: {}", e);
                }
                self.terminal = Some(e);
                None
            }
        }
    }
}
