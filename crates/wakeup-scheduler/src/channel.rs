//! Single-slot result delivery.
//!
//! At most one consumer is attached at a time; while nobody is attached, at
//! most the latest undelivered event is buffered and replayed on the next
//! attach. One channel instance is constructed per engine and shared by the
//! scheduling path and the external fire-callback path; it carries its own
//! lock, so callers never need one.

use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, warn};
use wakeup_core::events::WakeupEvent;

#[derive(Default)]
struct Inner {
    consumer: Option<mpsc::UnboundedSender<WakeupEvent>>,
    pending: Option<WakeupEvent>,
}

#[derive(Default)]
pub struct ResultChannel {
    inner: Mutex<Inner>,
}

impl ResultChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `consumer` and immediately replay the buffered event, if any.
    /// The channel stays open for subsequent deliveries.
    pub fn attach(&self, consumer: mpsc::UnboundedSender<WakeupEvent>) {
        let mut inner = self.inner.lock().unwrap();
        inner.consumer = Some(consumer.clone());

        if let Some(event) = inner.pending.take() {
            if let Err(e) = consumer.send(event) {
                warn!("consumer hung up during attach, re-buffering result");
                inner.consumer = None;
                inner.pending = Some(e.0);
            }
        }
    }

    /// Detach the consumer; subsequent deliveries buffer instead.
    pub fn detach(&self) {
        self.inner.lock().unwrap().consumer = None;
    }

    /// Deliver `event` to the attached consumer, or buffer it (displacing
    /// any stale buffered value — older unread results are dropped, not
    /// queued).
    pub fn deliver(&self, event: WakeupEvent) {
        let mut inner = self.inner.lock().unwrap();
        inner.pending = None;

        let Some(consumer) = inner.consumer.clone() else {
            debug!("no consumer attached, buffering result");
            inner.pending = Some(event);
            return;
        };

        if let Err(e) = consumer.send(event) {
            warn!("consumer hung up, buffering result");
            inner.consumer = None;
            inner.pending = Some(e.0);
        }
    }

    /// Discard any buffered event without delivering it.
    pub fn clear_pending(&self) {
        self.inner.lock().unwrap().pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wakeup(n: i64) -> WakeupEvent {
        WakeupEvent::Wakeup {
            extra: Some(serde_json::json!(n)),
        }
    }

    #[test]
    fn attached_consumer_receives_immediately() {
        let channel = ResultChannel::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        channel.attach(tx);

        channel.deliver(wakeup(1));
        channel.deliver(wakeup(2));

        assert_eq!(rx.try_recv().unwrap(), wakeup(1));
        assert_eq!(rx.try_recv().unwrap(), wakeup(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn second_buffered_result_displaces_the_first() {
        let channel = ResultChannel::new();
        channel.deliver(wakeup(1));
        channel.deliver(wakeup(2));

        let (tx, mut rx) = mpsc::unbounded_channel();
        channel.attach(tx);

        assert_eq!(rx.try_recv().unwrap(), wakeup(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn detach_switches_back_to_buffering() {
        let channel = ResultChannel::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        channel.attach(tx);
        channel.detach();

        channel.deliver(wakeup(7));
        assert!(rx.try_recv().is_err());

        let (tx2, mut rx2) = mpsc::unbounded_channel();
        channel.attach(tx2);
        assert_eq!(rx2.try_recv().unwrap(), wakeup(7));
    }

    #[test]
    fn clear_pending_drops_the_buffered_result() {
        let channel = ResultChannel::new();
        channel.deliver(wakeup(1));
        channel.clear_pending();

        let (tx, mut rx) = mpsc::unbounded_channel();
        channel.attach(tx);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_consumer_falls_back_to_buffering() {
        let channel = ResultChannel::new();
        let (tx, rx) = mpsc::unbounded_channel();
        channel.attach(tx);
        drop(rx);

        channel.deliver(wakeup(3));

        let (tx2, mut rx2) = mpsc::unbounded_channel();
        channel.attach(tx2);
        assert_eq!(rx2.try_recv().unwrap(), wakeup(3));
    }
}
