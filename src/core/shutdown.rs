//! Shutdown Coordination
//!
//! Turns process signals into a broadcast shutdown notification and lets
//! reordering channels be closed when it fires, so threads blocked in `put`
//! or `take` unwind with a `Closed` error instead of hanging.

use crate::queue::ReorderChannel;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Close cause latched into channels when shutdown is requested
#[derive(Debug, Clone, thiserror::Error)]
#[error("shutdown requested: {reason}")]
pub struct ShutdownRequested {
    pub reason: String,
}

/// Coordinates graceful shutdown across the application
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<String>,
    shutdown_requested: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        // Room for a burst of repeated signals
        let (shutdown_tx, _) = broadcast::channel(8);
        Self {
            shutdown_tx,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to shutdown notifications; each carries the reason
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.shutdown_tx.subscribe()
    }

    /// Trigger shutdown
    pub fn trigger_shutdown(&self, reason: &str) {
        // Release pairs with the Acquire load in is_shutdown_requested
        self.shutdown_requested.store(true, Ordering::Release);
        let _ = self.shutdown_tx.send(reason.to_string());
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Close `channel` with a [`ShutdownRequested`] cause once shutdown fires
    ///
    /// The returned task ends after closing, or without closing if the
    /// coordinator is dropped first.
    pub fn close_on_shutdown<T>(&self, channel: Arc<ReorderChannel<T>>) -> JoinHandle<bool>
    where
        T: Send + 'static,
    {
        let mut shutdown_rx = self.subscribe();
        let already = self.is_shutdown_requested();

        tokio::spawn(async move {
            let reason = if already {
                "shutdown requested before channel registration".to_string()
            } else {
                match shutdown_rx.recv().await {
                    Ok(reason) => reason,
                    Err(broadcast::error::RecvError::Lagged(_)) => "repeated signals".to_string(),
                    Err(broadcast::error::RecvError::Closed) => return false,
                }
            };

            log::info!("Closing pipeline channel: {}", reason);
            channel.close_with(ShutdownRequested { reason });
            true
        })
    }

    /// Install process signal handlers that trigger this coordinator
    ///
    /// The first signal requests shutdown; a second forces exit with 130.
    pub fn install_signal_handlers(self: &Arc<Self>) {
        #[cfg(unix)]
        {
            unsafe {
                libc::signal(libc::SIGPIPE, libc::SIG_DFL);
            }

            use std::sync::atomic::AtomicUsize;
            use tokio::signal::unix::{signal, SignalKind};
            let signal_count = Arc::new(AtomicUsize::new(0));
            let signals = [
                (SignalKind::interrupt(), "SIGINT"),
                (SignalKind::terminate(), "SIGTERM"),
                (SignalKind::hangup(), "SIGHUP"),
            ];

            for (kind, name) in signals {
                let coordinator = Arc::clone(self);
                let sig_ctr = Arc::clone(&signal_count);

                tokio::spawn(async move {
                    if let Ok(mut sig) = signal(kind) {
                        while sig.recv().await.is_some() {
                            let prev = sig_ctr.fetch_add(1, Ordering::AcqRel);
                            if prev >= 1 {
                                log::warn!("{} received again; exiting", name);
                                std::process::exit(130);
                            }
                            coordinator.trigger_shutdown(&format!("received {}", name));
                        }
                    }
                });
            }
        }

        #[cfg(not(unix))]
        {
            let coordinator = Arc::clone(self);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    coordinator.trigger_shutdown("received Ctrl-C");
                }
            });
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
