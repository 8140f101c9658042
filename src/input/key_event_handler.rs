// SPDX-License-Identifier: GPL-3.0-only

//! Translation of raw key notifications into semantic key events.
//!
//! [`KeyEventHandler`] listens to any number of [`KeyArea`]s. It does not
//! own them: every attached area forwards into one shared queue, so
//! notifications are translated in the order they were raised whichever
//! area raised them. The handler keeps a weak reference per area and
//! forgets areas that were dropped.
//!
//! Besides building [`KeyEvent`]s, the handler tracks whether the shift key
//! is held and can swallow the next click on shift. The latter is used by
//! the keyboard when a shift+key chord already consumed the shift press, so
//! releasing shift must not toggle the shift state as well.

use std::rc::Weak;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{FutureExt, StreamExt};

use crate::input::key_area::KeyArea;
use crate::input::key_event::{
    KeyContext, KeyEvent, KeyEventKind, KeyNotification, NotifiedKey, SourceId,
};
use crate::layout::KeyKind;
use crate::signal::Signal;

/// Events emitted by [`KeyEventHandler`].
#[derive(Debug, Clone, PartialEq)]
pub enum KeyboardEvent {
    /// Key pressed, also when the finger slides onto the key.
    KeyPressed(KeyEvent),
    /// Key released, also when the finger slides off the key.
    KeyReleased(KeyEvent),
    /// Pointer lifted on the key.
    KeyClicked(KeyEvent),
    /// Key held past the long press threshold.
    LongKeyPressed(KeyEvent),
    /// Shift key went down (`true`) or up (`false`).
    ShiftPressed(bool),
}

#[derive(Debug)]
struct Subscription {
    source: SourceId,
    alive: Weak<()>,
}

/// Converts raw key notifications into [`KeyboardEvent`]s.
#[derive(Debug)]
pub struct KeyEventHandler {
    /// Keeps track of shift up/down status.
    shift_held_down: bool,
    /// When set, the next shift click is swallowed.
    ignore_shift_click: bool,
    sources: Vec<Subscription>,
    /// Handed to every attached source
    sink: UnboundedSender<KeyNotification>,
    queue: UnboundedReceiver<KeyNotification>,
    events: Signal<KeyboardEvent>,
}

impl Default for KeyEventHandler {
    fn default() -> Self {
        let (sink, queue) = mpsc::unbounded();
        Self {
            shift_held_down: false,
            ignore_shift_click: false,
            sources: Vec::new(),
            sink,
            queue,
            events: Signal::new(),
        }
    }
}

impl KeyEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts listening to `source`. Attaching the same source twice is a
    /// no-op.
    pub fn add_event_source(&mut self, source: &mut KeyArea) {
        if self.is_attached(source.id()) {
            return;
        }
        tracing::debug!(source = source.id().get(), "attaching key event source");
        self.sources.push(Subscription {
            source: source.id(),
            alive: source.connect(self.sink.clone()),
        });
    }

    pub fn is_attached(&self, source: SourceId) -> bool {
        self.sources.iter().any(|s| s.source == source)
    }

    /// Number of subscriptions, including ones whose source was dropped
    /// since the last [`process_pending`](Self::process_pending).
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Registers a listener for translated events.
    pub fn subscribe(&mut self) -> UnboundedReceiver<KeyboardEvent> {
        self.events.subscribe()
    }

    pub fn is_shift_held_down(&self) -> bool {
        self.shift_held_down
    }

    /// Swallows the next click on the shift key.
    pub fn ignore_next_shift_click(&mut self) {
        self.ignore_shift_click = true;
    }

    pub fn set_ignore_shift_click(&mut self, ignore: bool) {
        self.ignore_shift_click = ignore;
    }

    pub fn is_ignoring_shift_click(&self) -> bool {
        self.ignore_shift_click
    }

    /// Translates every notification queued by the attached sources, in the
    /// order they were raised, and forgets sources that are gone.
    /// Returns the number of notifications handled.
    pub fn process_pending(&mut self) -> usize {
        let mut count = 0;
        // The handler keeps its own sender, so the queue never ends here.
        while let Some(Some(notification)) = self.queue.next().now_or_never() {
            self.handle_notification(notification);
            count += 1;
        }

        self.sources.retain(|subscription| {
            let alive = subscription.alive.strong_count() > 0;
            if !alive {
                tracing::debug!(
                    source = subscription.source.get(),
                    "key event source gone, detaching"
                );
            }
            alive
        });
        count
    }

    /// Translates a single raw notification.
    ///
    /// Notifications without a key or a context are dropped.
    pub fn handle_notification(&mut self, notification: KeyNotification) {
        let kind = notification.kind;
        let (Some(key), Some(context)) = (notification.key, notification.context) else {
            tracing::debug!(?kind, "dropping malformed key notification");
            return;
        };

        match kind {
            KeyEventKind::Press => self.handle_key_press(&key, &context),
            KeyEventKind::Release => self.handle_key_release(&key, &context),
            KeyEventKind::Click => self.handle_key_click(&key, &context),
            KeyEventKind::LongPress => self.handle_long_key_press(&key, &context),
        }
    }

    fn handle_key_press(&mut self, key: &NotifiedKey, context: &KeyContext) {
        if key.model.kind == KeyKind::Shift {
            self.shift_held_down = true;
            self.emit(KeyboardEvent::ShiftPressed(true));
        }
        let event = KeyEvent::from_key(key, KeyEventKind::Press, context);
        self.emit(KeyboardEvent::KeyPressed(event));
    }

    fn handle_key_release(&mut self, key: &NotifiedKey, context: &KeyContext) {
        if key.model.kind == KeyKind::Shift {
            self.shift_held_down = false;
            self.emit(KeyboardEvent::ShiftPressed(false));
        }
        let event = KeyEvent::from_key(key, KeyEventKind::Release, context);
        self.emit(KeyboardEvent::KeyReleased(event));
    }

    fn handle_key_click(&mut self, key: &NotifiedKey, context: &KeyContext) {
        if key.model.kind == KeyKind::Shift && self.ignore_shift_click {
            self.ignore_shift_click = false;
            tracing::debug!("ignoring shift click consumed by a chord");
            return;
        }
        let event = KeyEvent::from_key(key, KeyEventKind::Click, context);
        self.emit(KeyboardEvent::KeyClicked(event));
    }

    fn handle_long_key_press(&mut self, key: &NotifiedKey, context: &KeyContext) {
        let event = KeyEvent::from_key(key, KeyEventKind::LongPress, context);
        self.emit(KeyboardEvent::LongKeyPressed(event));
    }

    fn emit(&mut self, event: KeyboardEvent) {
        tracing::trace!(?event, "key event");
        self.events.emit(event);
    }
}
