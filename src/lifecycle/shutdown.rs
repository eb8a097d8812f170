//! Stop signal shared by `main`, the servers and the tests.

use std::future::Future;

use tokio::sync::broadcast;

/// One-shot stop signal for the relay's servers.
///
/// Dropping it counts as a trigger, so a server never outlives the task
/// that owns its `Shutdown`.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver to hand to `HttpServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Tell every subscribed server to drain. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::info!(servers = notified, "Shutdown triggered");
        notified
    }

    /// Trigger from a background task once `cause` completes.
    pub fn trigger_on<F>(self, cause: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            cause.await;
            self.trigger();
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once the coordinator fires or is dropped.
pub async fn wait(mut rx: broadcast::Receiver<()>) {
    // Closed and Lagged both mean the signal has been sent or can no longer come.
    let _ = rx.recv().await;
}
