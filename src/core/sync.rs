//! Synchronization utilities for robust mutex handling
//!
//! This module provides utilities for handling mutex poisoning in a
//! consistent manner across the codebase. Condition variable waits return the
//! same `LockResult` shape as `lock()`, so the same helpers cover both.

use std::sync::{LockResult, PoisonError, TryLockError, TryLockResult};

/// Handle poisoned mutex cases with consistent error handling
///
/// Converts a poisoned lock (or a poisoned condvar wait) into an
/// application-specific error using the provided constructor.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use reorder::core::sync::handle_mutex_poison;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |msg| msg).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| error_constructor(poison_message(&poison_err)))
}

/// Handle a `try_lock` result: contention becomes `Ok(None)`, poison an error
pub fn handle_try_lock<T, E>(
    result: TryLockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<Option<T>, E> {
    match result {
        Ok(guard) => Ok(Some(guard)),
        Err(TryLockError::WouldBlock) => Ok(None),
        Err(TryLockError::Poisoned(poison_err)) => {
            Err(error_constructor(poison_message(&poison_err)))
        }
    }
}

/// Take the guard even if the lock is poisoned
///
/// For paths that must make progress regardless, such as closing a channel
/// so that blocked threads can unwind.
pub fn recover_mutex_poison<T>(result: LockResult<T>, context: &str) -> T {
    result.unwrap_or_else(|poison_err| {
        log::warn!("{}: recovering from poisoned lock", context);
        poison_err.into_inner()
    })
}

fn poison_message<T>(poison_err: &PoisonError<T>) -> String {
    format!(
        "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
        poison_err
    )
}
