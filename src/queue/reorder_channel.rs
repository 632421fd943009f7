//! ReorderChannel - blocking, index-ordered reordering channel
//!
//! Producers `put` values tagged with unique indices in any order; a consumer
//! `take`s them back strictly in index order with no gaps. The channel only
//! buffers the next `capacity` indices after the last one taken, so a
//! producer that runs too far ahead blocks until the consumer catches up.
//!
//! # Synchronisation
//!
//! One mutex guards the whole window. Two condition variables share it:
//! `item_ready` for the consumer waiting on the head of the window and
//! `space_freed` for producers whose index is beyond the window. The open
//! flag and the available count are mirrored into atomics, stored with
//! `Release` while the lock is held, so `is_open` and `is_ready` can answer
//! without locking.
//!
//! # Wake policy
//!
//! The channel assumes a single logical consumer: a commit that makes the
//! head ready wakes one consumer, a take wakes one more consumer if items
//! remain and wakes every producer, because any of several blocked indices
//! may now fit. With several consumers blocked at once some may wait longer
//! than necessary.

use crate::core::sync::{handle_mutex_poison, handle_try_lock, recover_mutex_poison};
use crate::queue::error::{CloseCause, QueueError, QueueResult};
use crate::queue::guard::ChannelGuard;
use crate::queue::internal::{Insert, ReorderState};
use crate::queue::types::ChannelStats;
use log::{debug, trace};
use std::error::Error as StdError;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};

/// Bounded channel that releases items in strict index order
///
/// # Thread Safety
///
/// `ReorderChannel<T>` is `Send + Sync` when `T: Send` and is meant to be
/// shared through `Arc`. Any number of threads may `put` concurrently; `take`
/// is designed for one consumer at a time.
///
/// # Example
///
/// ```rust
/// use reorder::queue::ReorderChannel;
///
/// # fn example() -> Result<(), reorder::queue::QueueError> {
/// let channel = ReorderChannel::new(2)?;
/// channel.put("second", 2)?;
/// channel.put("first", 1)?;
///
/// assert_eq!(channel.take()?, "first");
/// assert_eq!(channel.take()?, "second");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct ReorderChannel<T> {
    state: Mutex<ReorderState<T>>,
    /// Consumers wait here for the head of the window
    item_ready: Condvar,
    /// Producers wait here for the window to move
    space_freed: Condvar,
    open: AtomicBool,
    available: AtomicUsize,
    capacity: usize,
}

impl<T> ReorderChannel<T> {
    /// Create an open channel whose first expected index is 1
    pub fn new(capacity: usize) -> QueueResult<Self> {
        Self::with_baseline(capacity, 0)
    }

    /// Create an open channel whose first expected index is `baseline + 1`
    pub fn with_baseline(capacity: usize, baseline: u64) -> QueueResult<Self> {
        let state = ReorderState::new(capacity, baseline)?;
        debug!(
            "Created reorder channel of {} (capacity {}, baseline {})",
            std::any::type_name::<T>(),
            capacity,
            baseline
        );

        Ok(Self {
            state: Mutex::new(state),
            item_ready: Condvar::new(),
            space_freed: Condvar::new(),
            open: AtomicBool::new(true),
            available: AtomicUsize::new(0),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Name of the element type carried by this channel
    pub fn element_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    /// Commit `value` at `index`, blocking while `index` is beyond the window
    ///
    /// Returns the committed index.
    ///
    /// # Errors
    ///
    /// - `Closed` if the channel is closed, including while blocked
    /// - `Duplicate` with `AlreadyConsumed` if `index` was already taken,
    ///   or `AlreadyPresent` if it is already buffered; the channel is
    ///   unchanged either way
    ///
    /// Calling this while holding this channel's [`ChannelGuard`] deadlocks.
    pub fn put(&self, value: T, index: u64) -> QueueResult<u64> {
        let observed_closed = !self.open.load(Ordering::Acquire);
        let mut state = self.lock_state()?;

        if observed_closed && !state.is_closed() {
            return Err(QueueError::ConcurrencyViolation {
                message: format!(
                    "fast path reported closed but locked state is open (put of index {})",
                    index
                ),
            });
        }

        let mut pending = value;
        loop {
            match state.try_insert(pending, index)? {
                Insert::Committed => break,
                Insert::Deferred(value) => {
                    pending = value;
                    trace!(
                        "put({}) waiting for space (window {}..={})",
                        index,
                        state.last_output_index().saturating_add(1),
                        state.last_output_index().saturating_add(self.capacity as u64)
                    );
                    state =
                        handle_mutex_poison(self.space_freed.wait(state), QueueError::poisoned)?;
                }
            }
        }

        let available = state.available();
        self.available.store(available, Ordering::Release);
        trace!("put({}) committed, {} ready", index, available);

        if available > 0 {
            self.item_ready.notify_one();
        }

        Ok(index)
    }

    /// Remove and return the next item in index order, blocking until it
    /// has been committed
    ///
    /// Buffered items remain retrievable after `close`.
    ///
    /// # Errors
    ///
    /// `Closed` once the channel is closed and nothing is ready.
    ///
    /// Calling this while holding this channel's [`ChannelGuard`] deadlocks.
    pub fn take(&self) -> QueueResult<T> {
        let mut state = self.lock_state()?;

        let value = loop {
            if let Some(value) = state.pop_front() {
                break value;
            }
            if state.is_closed() {
                return Err(state.closed_error());
            }
            trace!(
                "take waiting for index {}",
                state.last_output_index().saturating_add(1)
            );
            state = handle_mutex_poison(self.item_ready.wait(state), QueueError::poisoned)?;
        };

        let remaining = state.available();
        self.available.store(remaining, Ordering::Release);
        trace!(
            "take delivered index {}, {} ready",
            state.last_output_index(),
            remaining
        );

        if remaining > 0 {
            self.item_ready.notify_one();
        }
        self.space_freed.notify_all();

        Ok(value)
    }

    /// Close the channel without a cause
    pub fn close(&self) {
        self.close_inner(None);
    }

    /// Close the channel, latching `cause` for every blocked and future caller
    ///
    /// Closing again replaces the latched cause.
    pub fn close_with<E>(&self, cause: E)
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        self.close_inner(Some(CloseCause::new(cause)));
    }

    fn close_inner(&self, cause: Option<CloseCause>) {
        let mut state = recover_mutex_poison(self.state.lock(), "close");
        let first = !state.is_closed();
        state.close(cause);
        self.open.store(false, Ordering::Release);

        if first {
            debug!(
                "Closed reorder channel at index {} ({} buffered){}",
                state.last_output_index(),
                state.buffered(),
                state
                    .close_cause()
                    .map(|c| format!(": {}", c))
                    .unwrap_or_default()
            );
        }
        drop(state);

        self.item_ready.notify_all();
        self.space_freed.notify_all();
    }

    /// Lock-free check of the open flag
    ///
    /// A `true` result may be stale by the time the caller acts on it.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Lock-free check whether the next index is ready to take
    ///
    /// Racy against concurrent `put`, `take` and `close`; hold the lock via
    /// [`ReorderChannel::lock`] for a consistent answer.
    pub fn is_ready(&self) -> bool {
        self.available.load(Ordering::Acquire) > 0
    }

    /// True if no slot in the window holds a committed item
    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.lock_state()?.is_empty())
    }

    /// Index of the most recently taken item
    pub fn last_output_index(&self) -> QueueResult<u64> {
        Ok(self.lock_state()?.last_output_index())
    }

    /// The cause latched by `close_with`, if any
    pub fn close_cause(&self) -> QueueResult<Option<CloseCause>> {
        Ok(self.lock_state()?.close_cause().cloned())
    }

    pub fn stats(&self) -> QueueResult<ChannelStats> {
        Ok(self.lock_state()?.stats())
    }

    /// Acquire the channel lock for a consistent multi-field read
    ///
    /// The channel stays locked until the guard is dropped. Do not call
    /// `put` or `take` on the same channel while holding it.
    pub fn lock(&self) -> QueueResult<ChannelGuard<'_, T>> {
        Ok(ChannelGuard::new(self.lock_state()?))
    }

    /// Acquire the channel lock only if it is free right now
    pub fn try_lock(&self) -> QueueResult<Option<ChannelGuard<'_, T>>> {
        let guard = handle_try_lock(self.state.try_lock(), QueueError::poisoned)?;
        Ok(guard.map(ChannelGuard::new))
    }

    fn lock_state(&self) -> QueueResult<MutexGuard<'_, ReorderState<T>>> {
        handle_mutex_poison(self.state.lock(), QueueError::poisoned)
    }
}

impl<T> fmt::Debug for ReorderChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("ReorderChannel");
        out.field("element_type", &self.element_type())
            .field("capacity", &self.capacity);
        match self.state.try_lock() {
            Ok(state) => out.field("stats", &state.stats()),
            Err(_) => out.field("stats", &format_args!("<locked>")),
        };
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_zero_capacity_is_construction_error() {
        let result = ReorderChannel::<String>::new(0);
        assert!(matches!(
            result,
            Err(QueueError::Construction { capacity: 0 })
        ));
    }

    #[test]
    fn test_element_type_names_the_payload() {
        let channel = ReorderChannel::<String>::new(1).unwrap();
        assert!(channel.element_type().ends_with("String"));
        assert_eq!(channel.capacity(), 1);
    }

    #[test]
    fn test_put_returns_committed_index() {
        let channel = ReorderChannel::new(3).unwrap();
        assert_eq!(channel.put('x', 2).unwrap(), 2);
    }

    #[test]
    fn test_baseline_shifts_first_expected_index() {
        let channel = ReorderChannel::with_baseline(2, 100).unwrap();

        let err = channel.put(0, 100).unwrap_err();
        assert!(matches!(err, QueueError::Duplicate { index: 100, .. }));

        channel.put(101, 101).unwrap();
        assert!(channel.is_ready());
        assert_eq!(channel.take().unwrap(), 101);
        assert_eq!(channel.last_output_index().unwrap(), 101);
    }

    #[test]
    fn test_blocked_take_wakes_on_put() {
        let channel = Arc::new(ReorderChannel::new(2).unwrap());
        let consumer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.take())
        };

        thread::sleep(Duration::from_millis(50));
        channel.put(7u32, 1).unwrap();

        assert_eq!(consumer.join().unwrap().unwrap(), 7);
    }

    #[test]
    fn test_close_with_cause_reaches_blocked_producer() {
        let channel = Arc::new(ReorderChannel::new(1).unwrap());
        let producer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.put("far", 5))
        };

        thread::sleep(Duration::from_millis(50));
        channel.close_with("shutting down");

        let err = producer.join().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "Channel is closed: shutting down");
        assert!(channel.is_empty().unwrap());
    }

    #[test]
    fn test_debug_output_does_not_block_when_locked() {
        let channel = ReorderChannel::<u8>::new(2).unwrap();
        let guard = channel.lock().unwrap();

        let rendered = format!("{:?}", channel);
        assert!(rendered.contains("<locked>"));
        drop(guard);

        let rendered = format!("{:?}", channel);
        assert!(rendered.contains("capacity: 2"));
    }
}
