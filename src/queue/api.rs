//! Public API for the queue system
//!
//! External modules should import from here rather than directly from
//! internal modules. See the module documentation for usage and design.

// Core channel and its split handles
pub use crate::queue::{channel, channel_with_baseline};
pub use crate::queue::reorder_channel::ReorderChannel;
pub use crate::queue::consumer::QueueConsumer;
pub use crate::queue::publisher::QueuePublisher;

// Lock pass-through and snapshots
pub use crate::queue::guard::ChannelGuard;
pub use crate::queue::types::ChannelStats;

// Error handling
pub use crate::queue::error::{CloseCause, DuplicateReason, QueueError, QueueResult};
