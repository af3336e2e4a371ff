use tokio::sync::broadcast;

use threads_persist::Revalidator;

const DEFAULT_CAPACITY: usize = 256;

/// Fans revalidation signals out to whoever renders the affected routes.
///
/// Signals sent while nobody is subscribed are dropped; a lagging subscriber
/// loses the oldest paths first.
#[derive(Debug, Clone)]
pub struct RevalidationBus {
    sender: broadcast::Sender<String>,
}

impl RevalidationBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }
}

impl Default for RevalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Revalidator for RevalidationBus {
    fn revalidate(&self, path: &str) {
        let receivers = self.sender.send(path.to_string()).unwrap_or(0);
        tracing::debug!(path, receivers, "Revalidation signalled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_paths_in_order() {
        let bus = RevalidationBus::new();
        let mut rx = bus.subscribe();

        bus.revalidate("/");
        bus.revalidate("/thread/abc");

        assert_eq!(rx.recv().await.unwrap(), "/");
        assert_eq!(rx.recv().await.unwrap(), "/thread/abc");
    }

    #[test]
    fn test_signal_without_subscribers_is_dropped() {
        let bus = RevalidationBus::with_capacity(0);
        bus.revalidate("/profile/edit");
    }
}
