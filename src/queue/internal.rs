//! Reorder window bookkeeping
//!
//! `ReorderState` is the lock-protected heart of the channel. It owns a ring
//! of `capacity` slots where the slot at offset `k` (1-based) holds the item
//! for index `last_output_index + k`. Advancing the ring head on every take
//! keeps that mapping without moving any values.
//!
//! Nothing here blocks or synchronises; `ReorderChannel` wraps it in a mutex
//! and decides when to wait and whom to wake.

use crate::queue::error::{CloseCause, DuplicateReason, QueueError, QueueResult};
use crate::queue::types::ChannelStats;

/// Outcome of a single insert attempt
#[derive(Debug)]
pub(crate) enum Insert<T> {
    /// The value now occupies its slot
    Committed,
    /// The index is beyond the window; the value is handed back so the
    /// caller can wait for space and retry
    Deferred(T),
}

#[derive(Debug)]
pub(crate) struct ReorderState<T> {
    slots: Vec<Option<T>>,
    /// Physical position of offset 1
    head: usize,
    last_output_index: u64,
    /// Length of the leading run of committed slots
    available: usize,
    /// Total committed slots, contiguous or not
    buffered: usize,
    closed: bool,
    close_cause: Option<CloseCause>,
}

impl<T> ReorderState<T> {
    pub(crate) fn new(capacity: usize, baseline: u64) -> QueueResult<Self> {
        if capacity == 0 {
            return Err(QueueError::Construction { capacity });
        }

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Ok(Self {
            slots,
            head: 0,
            last_output_index: baseline,
            available: 0,
            buffered: 0,
            closed: false,
            close_cause: None,
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn last_output_index(&self) -> u64 {
        self.last_output_index
    }

    pub(crate) fn available(&self) -> usize {
        self.available
    }

    pub(crate) fn buffered(&self) -> usize {
        self.buffered
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buffered == 0
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn close_cause(&self) -> Option<&CloseCause> {
        self.close_cause.as_ref()
    }

    pub(crate) fn closed_error(&self) -> QueueError {
        QueueError::closed(&self.close_cause)
    }

    /// Physical slot for a 1-based window offset
    fn position(&self, offset: usize) -> usize {
        (self.head + offset - 1) % self.slots.len()
    }

    /// True if the slot for absolute `index` holds a committed value
    pub(crate) fn is_committed(&self, index: u64) -> bool {
        match index.checked_sub(self.last_output_index) {
            Some(offset) if offset >= 1 && offset <= self.capacity() as u64 => {
                self.slots[self.position(offset as usize)].is_some()
            }
            _ => false,
        }
    }

    /// Try to place `value` at absolute `index`
    ///
    /// Closed and duplicate checks run on every attempt, so a retry after a
    /// wait observes a close or a frontier that moved past `index`.
    pub(crate) fn try_insert(&mut self, value: T, index: u64) -> QueueResult<Insert<T>> {
        if self.closed {
            return Err(self.closed_error());
        }

        if index <= self.last_output_index {
            return Err(QueueError::Duplicate {
                index,
                reason: DuplicateReason::AlreadyConsumed,
            });
        }

        let offset = index - self.last_output_index;
        if offset > self.capacity() as u64 {
            return Ok(Insert::Deferred(value));
        }

        let position = self.position(offset as usize);
        if self.slots[position].is_some() {
            return Err(QueueError::Duplicate {
                index,
                reason: DuplicateReason::AlreadyPresent,
            });
        }

        self.slots[position] = Some(value);
        self.buffered += 1;
        self.extend_available();
        Ok(Insert::Committed)
    }

    /// Grow the leading run; slots inside the current run stay committed
    /// until taken, so scanning starts at its end.
    fn extend_available(&mut self) {
        while self.available < self.capacity() {
            let position = self.position(self.available + 1);
            if self.slots[position].is_none() {
                break;
            }
            self.available += 1;
        }
    }

    /// Remove the item at offset 1 and advance the frontier by one
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.available == 0 {
            return None;
        }

        let value = self.slots[self.head].take()?;
        self.head = (self.head + 1) % self.slots.len();
        self.available -= 1;
        self.buffered -= 1;
        self.last_output_index += 1;
        Some(value)
    }

    /// Mark closed and latch `cause`; a later close replaces the cause
    pub(crate) fn close(&mut self, cause: Option<CloseCause>) {
        self.closed = true;
        if cause.is_some() {
            self.close_cause = cause;
        }
    }

    pub(crate) fn stats(&self) -> ChannelStats {
        ChannelStats {
            capacity: self.capacity(),
            last_output_index: self.last_output_index,
            available: self.available,
            buffered: self.buffered,
            is_open: !self.closed,
        }
    }
}
