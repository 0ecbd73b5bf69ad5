use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use trivium_engine::session::SessionSnapshot;

// Bounded so a stalled subscriber cannot grow memory without limit; once its
// buffer is full it is dropped from the bus.
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<QuizEvent>;
pub type EventReceiver = mpsc::Receiver<QuizEvent>;

/// Notifications pushed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    /// The session changed; redraw from this snapshot.
    Transitioned { snapshot: SessionSnapshot },
    /// One second elapsed on the question at `question` (0-based).
    Tick { question: usize, remaining: u32 },
    /// The question at `question` ran out of time and was recorded as such.
    TimedOut { question: usize },
    /// A batch could not be loaded; the session is back to configuring.
    FetchFailed { message: String },
}

pub struct EventSubscription {
    bus: EventBus,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub async fn recv(&mut self) -> Option<QuizEvent> {
        self.receiver.recv().await
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscriber_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<Vec<(usize, EventSender)>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw();
        EventSubscription {
            bus: self.clone(),
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned")
            .push((id, tx));

        tracing::debug!(subscriber_id = id, "subscribed to quiz events");
        (id, rx)
    }

    pub fn broadcast(&self, event: QuizEvent) {
        tracing::trace!(event_type = ?event, "broadcasting quiz event");

        let subscribers = self
            .inner
            .subscribers
            .read()
            .expect("subscriber lock poisoned")
            .clone();

        let mut failed = Vec::new();
        for (id, sender) in subscribers {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    subscriber_id = id,
                    error = %e,
                    "failed to deliver quiz event, dropping subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(&failed);
        }
    }

    pub fn unsubscribe(&self, subscriber_id: usize) {
        self.remove_subscribers(&[subscriber_id]);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .expect("subscriber lock poisoned")
            .len()
    }

    fn remove_subscribers(&self, ids: &[usize]) {
        self.inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned")
            .retain(|(id, _)| !ids.contains(id));
    }
}
