//! Lock pass-through for composing consistent reads

use crate::queue::internal::ReorderState;
use crate::queue::types::ChannelStats;
use std::sync::MutexGuard;

/// Holds a channel's lock; the channel is unlocked when this is dropped
///
/// While a guard is alive no `put`, `take` or `close` can proceed on the
/// channel, so several reads through it describe one instant. Calling a
/// blocking operation on the same channel from the thread holding the guard
/// deadlocks.
///
/// ```rust
/// use reorder::queue::ReorderChannel;
///
/// let channel = ReorderChannel::new(4).unwrap();
/// channel.put('b', 2).unwrap();
///
/// let guard = channel.lock().unwrap();
/// assert!(!guard.is_ready());
/// assert!(!guard.is_empty());
/// assert_eq!(guard.buffered(), 1);
/// drop(guard); // unlock
/// ```
pub struct ChannelGuard<'a, T> {
    state: MutexGuard<'a, ReorderState<T>>,
}

impl<'a, T> ChannelGuard<'a, T> {
    pub(crate) fn new(state: MutexGuard<'a, ReorderState<T>>) -> Self {
        Self { state }
    }

    pub fn is_open(&self) -> bool {
        !self.state.is_closed()
    }

    pub fn is_ready(&self) -> bool {
        self.state.available() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn last_output_index(&self) -> u64 {
        self.state.last_output_index()
    }

    pub fn available(&self) -> usize {
        self.state.available()
    }

    pub fn buffered(&self) -> usize {
        self.state.buffered()
    }

    /// True if `index` is buffered and not yet taken
    pub fn contains(&self, index: u64) -> bool {
        self.state.is_committed(index)
    }

    pub fn stats(&self) -> ChannelStats {
        self.state.stats()
    }

    /// Release the lock
    pub fn unlock(self) {}
}
