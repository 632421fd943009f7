//! Type definitions for the queue system
//!
//! Snapshot structures describing a channel's window at one instant.

use std::fmt;

/// Consistent snapshot of a channel's window, taken under its lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    /// Size of the lookahead window
    pub capacity: usize,
    /// Index of the most recently taken item (the baseline if none)
    pub last_output_index: u64,
    /// Items consumable right now without a gap
    pub available: usize,
    /// Committed items in the window, including those behind a gap
    pub buffered: usize,
    /// False once the channel has been closed
    pub is_open: bool,
}

impl ChannelStats {
    /// Committed items waiting behind a missing index
    pub fn stalled(&self) -> usize {
        self.buffered - self.available
    }

    /// Highest index that currently fits the window
    pub fn window_end(&self) -> u64 {
        self.last_output_index.saturating_add(self.capacity as u64)
    }
}

impl fmt::Display for ChannelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} window ({}..={}): {} ready, {} buffered of {}",
            if self.is_open { "open" } else { "closed" },
            self.last_output_index.saturating_add(1),
            self.window_end(),
            self.available,
            self.buffered,
            self.capacity
        )
    }
}
