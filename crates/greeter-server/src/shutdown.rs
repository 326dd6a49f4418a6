//! Shared shutdown signalling.
//!
//! A [`ShutdownSignal`] is the one object shared between the foreground
//! path of a server run and its background serving task. It carries no
//! payload: holders either observe it ([`recv`](ShutdownSignal::recv),
//! [`is_triggered`](ShutdownSignal::is_triggered)) or trigger it
//! ([`trigger`](ShutdownSignal::trigger)). A serving failure triggers the
//! same signal an external caller would, so both cancellation paths wake
//! the same waiters.
//!
//! # Example
//!
//! ```rust
//! use greeter_server::ShutdownSignal;
//!
//! let shutdown = ShutdownSignal::new();
//! let observer = shutdown.clone();
//!
//! shutdown.trigger();
//! assert!(observer.is_triggered());
//! ```

use std::sync::Arc;

use tokio::sync::watch;

/// A cloneable signal coordinating graceful shutdown.
///
/// All clones share the same underlying state: once any clone calls
/// [`trigger`](Self::trigger), every pending and future
/// [`recv`](Self::recv) completes. Triggering is idempotent.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Creates a new, untriggered shutdown signal.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Triggers the signal, waking all waiters.
    ///
    /// Safe to call more than once; later calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Returns `true` once the signal has been triggered.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Waits until the signal is triggered.
    ///
    /// Completes immediately if it already was.
    pub async fn recv(&self) {
        let mut rx = self.tx.subscribe();
        // The sender outlives this borrow of `self`, so the channel
        // cannot close while we wait.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }

    /// Creates a signal wired to the process shutdown signals.
    ///
    /// The returned signal triggers on SIGTERM or SIGINT (Ctrl+C).
    ///
    /// # Panics
    ///
    /// Panics if the OS signal handlers cannot be registered.
    #[must_use]
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();

        tokio::spawn(async move {
            wait_for_os_signal().await;
            trigger.trigger();
        });

        signal
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for SIGTERM or SIGINT on Unix, Ctrl+C elsewhere.
async fn wait_for_os_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("received SIGTERM, initiating graceful shutdown");
            }
            _ = sigint.recv() => {
                tracing::info!("received SIGINT, initiating graceful shutdown");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to wait for Ctrl+C");
        tracing::info!("received Ctrl+C, initiating graceful shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_signal_is_untriggered() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_triggered());
    }

    #[test]
    fn test_trigger_is_idempotent() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        signal.trigger();
        signal.trigger();
        assert!(signal.is_triggered());
    }

    #[test]
    fn test_clones_observe_the_same_state() {
        let signal = ShutdownSignal::new();
        let clone = signal.clone();

        signal.trigger();

        assert!(signal.is_triggered());
        assert!(clone.is_triggered());
    }

    #[tokio::test]
    async fn test_recv_wakes_on_trigger() {
        let signal = ShutdownSignal::new();
        let trigger = signal.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.trigger();
        });

        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .expect("recv should complete once triggered");
    }

    #[tokio::test]
    async fn test_recv_completes_immediately_when_already_triggered() {
        let signal = ShutdownSignal::new();
        signal.trigger();

        tokio::time::timeout(Duration::from_millis(10), signal.recv())
            .await
            .expect("recv should complete immediately");
    }
}
