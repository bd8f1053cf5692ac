//! Shutdown coordination for the edge host.

use tokio::sync::broadcast;

/// Owner side of the shutdown signal. Dropping it also releases listeners.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

/// Handed to the server; resolves once shutdown is requested.
pub struct ShutdownListener {
    rx: broadcast::Receiver<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every listener to stop. Returns how many were notified.
    pub fn trigger(&self) -> usize {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::debug!(listeners = notified, "Shutdown triggered");
        notified
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownListener {
    /// Wait for `trigger`, or for the owning `Shutdown` to be dropped.
    pub async fn wait(mut self) {
        let _ = self.rx.recv().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_releases_every_listener() {
        let shutdown = Shutdown::new();
        let a = shutdown.listener();
        let b = shutdown.listener();

        assert_eq!(shutdown.trigger(), 2);
        a.wait().await;
        b.wait().await;
    }

    #[tokio::test]
    async fn test_dropping_owner_releases_listener() {
        let shutdown = Shutdown::new();
        let listener = shutdown.listener();
        drop(shutdown);

        tokio::time::timeout(Duration::from_secs(1), listener.wait())
            .await
            .expect("listener should resolve when the owner is gone");
    }

    #[test]
    fn test_trigger_without_listeners() {
        assert_eq!(Shutdown::default().trigger(), 0);
    }
}
