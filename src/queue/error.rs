//! Queue Error Types

use crate::core::error_handling::ContextualError;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Why an index was rejected as a duplicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateReason {
    /// The index is at or below the last output index
    AlreadyConsumed,
    /// The index is inside the window and its slot is already committed
    AlreadyPresent,
}

impl fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateReason::AlreadyConsumed => write!(f, "already consumed"),
            DuplicateReason::AlreadyPresent => write!(f, "already present"),
        }
    }
}

/// Error value latched by `close_with` and re-delivered to every caller
///
/// Cloning shares the same underlying error, so all blocked and future
/// callers observe the identical cause.
#[derive(Clone)]
pub struct CloseCause(Arc<dyn StdError + Send + Sync + 'static>);

impl CloseCause {
    pub fn new<E>(cause: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self(Arc::from(cause.into()))
    }

    /// Borrow the wrapped error
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Attempt to view the cause as a concrete error type
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    /// True if both causes share the same allocation
    pub fn ptr_eq(&self, other: &CloseCause) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CloseCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CloseCause").field(&self.0).finish()
    }
}

impl fmt::Display for CloseCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for CloseCause {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.as_ref().source()
    }
}

fn describe_cause(cause: &Option<CloseCause>) -> String {
    match cause {
        Some(cause) => format!(": {cause}"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum QueueError {
    #[error("Invalid channel capacity: {capacity} (must be greater than 0)")]
    Construction { capacity: usize },

    #[error("Duplicate index {index}: {reason}")]
    Duplicate {
        index: u64,
        reason: DuplicateReason,
    },

    #[error("Channel is closed{}", describe_cause(.cause))]
    Closed {
        #[source]
        cause: Option<CloseCause>,
    },

    #[error("Concurrency violation: {message}")]
    ConcurrencyViolation { message: String },

    #[error("Channel lock poisoned: {message}")]
    Poisoned { message: String },
}

impl QueueError {
    pub(crate) fn closed(cause: &Option<CloseCause>) -> Self {
        QueueError::Closed {
            cause: cause.clone(),
        }
    }

    pub(crate) fn poisoned(message: String) -> Self {
        QueueError::Poisoned { message }
    }

    /// True for the `Closed` variant
    pub fn is_closed(&self) -> bool {
        matches!(self, QueueError::Closed { .. })
    }

    /// The duplicate reason, if this is a `Duplicate` error
    pub fn duplicate_reason(&self) -> Option<DuplicateReason> {
        match self {
            QueueError::Duplicate { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// The latched close cause, if this is a `Closed` error carrying one
    pub fn close_cause(&self) -> Option<&CloseCause> {
        match self {
            QueueError::Closed { cause } => cause.as_ref(),
            _ => None,
        }
    }
}

impl ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            QueueError::Construction { .. } | QueueError::Closed { .. }
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            QueueError::Construction { .. } => Some("Channel capacity must be greater than 0"),
            QueueError::Closed { .. } => Some("The channel was closed before all items were delivered"),
            _ => None,
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
