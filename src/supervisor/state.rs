//! Supervisor lifecycle state and cooperative shutdown.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Where the supervisor is in its connect / stream / backoff cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorState {
    /// Not started yet
    Idle,
    /// Issuing the streaming request (attempt counts every connection)
    Connecting { attempt: u64 },
    /// Receiving chunks
    Streaming,
    /// The connection failed with a transport error
    Failed,
    /// Waiting before the next connection
    Backoff { failures: u32, delay: Duration },
    /// Shut down cooperatively
    Stopped,
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupervisorState::Idle => write!(f, "idle"),
            SupervisorState::Connecting { attempt } => write!(f, "connecting (attempt {})", attempt),
            SupervisorState::Streaming => write!(f, "streaming"),
            SupervisorState::Failed => write!(f, "failed"),
            SupervisorState::Backoff { failures, delay } => write!(
                f,
                "backing off {}s after {} failures",
                delay.as_secs(),
                failures
            ),
            SupervisorState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Requests a cooperative stop of a running supervisor.
///
/// The supervisor notices the request while connecting, between chunks and
/// during backoff. A handler call already in progress is allowed to finish.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Ask the supervisor to stop.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// True once [`trigger`](Self::trigger) has been called.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Resolve once shutdown has been requested.
pub(crate) async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(
            SupervisorState::Connecting { attempt: 3 }.to_string(),
            "connecting (attempt 3)"
        );
        assert_eq!(
            SupervisorState::Backoff {
                failures: 2,
                delay: Duration::from_secs(15)
            }
            .to_string(),
            "backing off 15s after 2 failures"
        );
        assert_eq!(SupervisorState::Stopped.to_string(), "stopped");
    }

    #[test]
    fn test_shutdown_handle_clones_share_flag() {
        let handle = ShutdownHandle::new();
        let cloned = handle.clone();
        assert!(!handle.is_triggered());
        cloned.trigger();
        assert!(handle.is_triggered());
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_wakes_on_trigger() {
        let handle = ShutdownHandle::new();
        let mut rx = handle.subscribe();
        let trigger = handle.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            trigger.trigger();
        });
        tokio::time::timeout(Duration::from_secs(5), wait_for_shutdown(&mut rx))
            .await
            .expect("shutdown was not observed");
    }
}
