use crate::frame::SseFrame;
use events::{EventBus, Subscription};
use log::*;

/// Fans `SseFrame`s out to every connected browser. Every browser is looking
/// at the same document, so unlike a per-user inbox this is a plain
/// broadcast: there is no user-scoped routing to do.
#[derive(Clone)]
pub struct Manager {
    bus: EventBus<SseFrame>,
}

impl Manager {
    pub fn new() -> Self {
        Self { bus: EventBus::new() }
    }

    /// Subscribe a new browser connection to the frame stream.
    pub fn subscribe(&self) -> Subscription<SseFrame> {
        info!("registered new SSE connection, {} active", self.bus.subscriber_count() + 1);
        self.bus.listen()
    }

    /// Push a frame to every connected browser. Non-blocking: a browser
    /// whose queue is full is dropped rather than allowed to stall the rest.
    pub fn publish(&self, frame: SseFrame) {
        self.bus.send(frame);
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_frame() {
        let manager = Manager::new();
        let mut sub = manager.subscribe();
        manager.publish(SseFrame::new("root", "<div>1</div>"));
        let frame = sub.recv().await.unwrap();
        assert_eq!(frame.event_id, "root");
    }
}
