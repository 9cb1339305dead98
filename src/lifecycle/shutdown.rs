//! Stop signal for the polling loop.

use tokio::sync::broadcast;

/// Handle that tells `Collector::run` to stop after its current cycle.
///
/// The signal handler holds one clone and the loop holds a receiver. A
/// cycle already in flight is never interrupted; the loop checks the
/// receiver between ticks.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to `Collector::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed loop to stop. A no-op when nothing is listening.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Loops still waiting on the signal.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_subscribers() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 1);

        shutdown.clone().trigger();
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_trigger_without_listeners() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.receiver_count(), 0);
        shutdown.trigger();
    }
}
