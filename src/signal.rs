// SPDX-License-Identifier: GPL-3.0-only

//! Synchronous one-to-many event broadcast.
//!
//! A [`Signal`] hands out unbounded channel receivers. Emitting pushes a
//! clone of the value to every live receiver immediately, so listeners see
//! events in emission order and can drain them right after the call that
//! produced them. Receivers that were dropped are pruned on the next emit.

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{FutureExt, StreamExt};

/// Broadcast endpoint for events of type `T`.
#[derive(Debug)]
pub struct Signal<T> {
    subscribers: Vec<UnboundedSender<T>>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<T: Clone> Signal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new listener.
    pub fn subscribe(&mut self) -> UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Forwards future values into an existing channel. Several signals
    /// connected to one channel interleave in emission order.
    pub fn connect(&mut self, tx: UnboundedSender<T>) {
        self.subscribers.push(tx);
    }

    /// Delivers `value` to every live listener.
    pub fn emit(&mut self, value: T) {
        self.subscribers
            .retain(|tx| tx.unbounded_send(value.clone()).is_ok());
    }

    /// Number of listeners still connected.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.iter().filter(|tx| !tx.is_closed()).count()
    }
}

/// Takes every value already queued on `rx` without waiting for more.
pub fn drain<T>(rx: &mut UnboundedReceiver<T>) -> Vec<T> {
    let mut values = Vec::new();
    while let Some(Some(value)) = rx.next().now_or_never() {
        values.push(value);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every subscriber receives every value, in order.
    #[test]
    fn test_emit_reaches_all_subscribers_in_order() {
        let mut signal = Signal::new();
        let mut first = signal.subscribe();
        let mut second = signal.subscribe();

        signal.emit(1);
        signal.emit(2);

        assert_eq!(drain(&mut first), vec![1, 2]);
        assert_eq!(drain(&mut second), vec![1, 2]);
        assert!(drain(&mut first).is_empty(), "Drained receiver should be empty");
    }

    /// Dropped receivers are pruned instead of failing the emit.
    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut signal = Signal::new();
        let kept = signal.subscribe();
        let dropped = signal.subscribe();
        assert_eq!(signal.subscriber_count(), 2);

        drop(dropped);
        signal.emit("value");

        assert_eq!(signal.subscriber_count(), 1);
        drop(kept);
        signal.emit("value");
        assert_eq!(signal.subscriber_count(), 0);
    }

    /// Two signals feeding one channel keep their interleaved order.
    #[test]
    fn test_connected_signals_share_one_queue() {
        let (tx, mut rx) = mpsc::unbounded();
        let mut left = Signal::new();
        let mut right = Signal::new();
        left.connect(tx.clone());
        right.connect(tx);

        right.emit("r1");
        left.emit("l1");
        right.emit("r2");

        assert_eq!(drain(&mut rx), vec!["r1", "l1", "r2"]);
    }

    /// Values emitted before the await are observed by an async listener.
    #[tokio::test]
    async fn test_async_listener() {
        let mut signal = Signal::new();
        let mut rx = signal.subscribe();

        signal.emit(String::from("opened"));
        drop(signal);

        assert_eq!(rx.next().await.as_deref(), Some("opened"));
        assert_eq!(rx.next().await, None, "Stream ends once the signal is gone");
    }
}
