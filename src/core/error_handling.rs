//! Generic error handling utilities
//!
//! Provides unified error reporting that works across the crate's error types
//! (queue errors, configuration errors) while keeping user-facing output
//! short and pushing detail to debug logs.

use std::error::Error as StdError;

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: StdError {
    /// Returns true if this error carries a message the user can act on
    /// (bad argument, invalid config value, a deliberately closed channel)
    fn is_user_actionable(&self) -> bool;

    /// The user-facing message for actionable errors
    fn user_message(&self) -> Option<&str>;
}

/// The single line reported for a fatal error
///
/// User-actionable errors report their own message; everything else reports
/// the operation that failed.
pub fn fatal_message<E: ContextualError + ?Sized>(error: &E, operation_context: &str) -> String {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => format!("FATAL: {}", user_msg),
        _ => format!("FATAL: {}", operation_context),
    }
}

/// Render an error and its `source()` chain as `outer: inner: innermost`
pub fn error_chain(error: &dyn StdError) -> String {
    let mut rendered = error.to_string();
    let mut current = error.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        // Display impls often already embed their source
        if !rendered.ends_with(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        current = cause.source();
    }
    rendered
}

/// Log errors with appropriate detail level based on error specificity
///
/// # Examples
/// ```rust
/// # use reorder::core::error_handling::log_error_with_context;
/// # use reorder::queue::QueueError;
/// let err = QueueError::Construction { capacity: 0 };
/// log_error_with_context(&err, "Creating pipeline channel");
/// // Logs: "FATAL: Channel capacity must be greater than 0"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("{}", fatal_message(error, operation_context));
    log::debug!("DETAIL: {}", error_chain(error));
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
