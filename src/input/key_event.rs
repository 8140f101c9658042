// SPDX-License-Identifier: GPL-3.0-only

//! Raw key notifications and the semantic key events built from them.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::layout::{KeyKind, KeyModel};

/// Identity of an input source (one page of keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u32);

impl SourceId {
    /// Allocates an id that is unique for the lifetime of the process.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        SourceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Identity of a key: its source and position in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId {
    pub source: SourceId,
    pub row: usize,
    pub column: usize,
}

/// The four kinds of key interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEventKind {
    #[default]
    Press,
    Release,
    Click,
    LongPress,
}

/// Circumstances of a raw notification.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyContext {
    /// Modifier level of the source when the notification was raised
    pub level: u8,
    /// Touch point in source coordinates
    pub point: Point,
    /// The finger slid onto this key instead of pressing it directly
    pub drag_continuation: bool,
}

impl KeyContext {
    pub fn new(level: u8, point: Point) -> Self {
        Self {
            level,
            point,
            drag_continuation: false,
        }
    }

    pub fn dragged(mut self, drag_continuation: bool) -> Self {
        self.drag_continuation = drag_continuation;
        self
    }
}

/// The key a notification is about.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifiedKey {
    pub id: KeyId,
    pub model: KeyModel,
}

/// Raw notification raised by an input source.
///
/// Both `key` and `context` are always present for notifications raised by
/// [`KeyArea`](crate::input::KeyArea); notifications missing either are
/// dropped by the translator.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyNotification {
    pub kind: KeyEventKind,
    pub key: Option<NotifiedKey>,
    pub context: Option<KeyContext>,
}

impl KeyNotification {
    pub fn new(kind: KeyEventKind, key: NotifiedKey, context: KeyContext) -> Self {
        Self {
            kind,
            key: Some(key),
            context: Some(context),
        }
    }
}

/// Application-facing key event.
///
/// A `key` of `None` is the "no key" sentinel used by
/// [`KeyEvent::default`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyEvent {
    pub key: Option<KeyId>,
    /// Stable identifier of the key from the layout
    pub identifier: String,
    /// Text the key produces at `level`
    pub text: String,
    pub key_kind: KeyKind,
    pub kind: KeyEventKind,
    pub level: u8,
    pub point: Point,
    pub drag_continuation: bool,
}

impl KeyEvent {
    /// Builds the event for `key` of the given kind in `context`.
    pub fn from_key(key: &NotifiedKey, kind: KeyEventKind, context: &KeyContext) -> Self {
        Self {
            key: Some(key.id),
            identifier: key.model.identifier().to_string(),
            text: key.model.label_for_level(context.level).to_string(),
            key_kind: key.model.kind,
            kind,
            level: context.level,
            point: context.point,
            drag_continuation: context.drag_continuation,
        }
    }

    pub fn is_shift(&self) -> bool {
        self.key_kind == KeyKind::Shift
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notified(model: KeyModel) -> NotifiedKey {
        NotifiedKey {
            id: KeyId {
                source: SourceId::next(),
                row: 0,
                column: 2,
            },
            model,
        }
    }

    #[test]
    fn test_default_event_has_no_key() {
        let event = KeyEvent::default();
        assert!(!event.has_key());
        assert!(event.text.is_empty());
    }

    #[test]
    fn test_event_text_follows_context_level() {
        let key = notified(KeyModel::new("a").with_shifted("A"));

        let lower = KeyEvent::from_key(&key, KeyEventKind::Click, &KeyContext::new(0, Point::default()));
        assert_eq!(lower.text, "a");

        let context = KeyContext::new(1, Point::new(3.0, 4.0)).dragged(true);
        let upper = KeyEvent::from_key(&key, KeyEventKind::Press, &context);
        assert_eq!(upper.text, "A");
        assert_eq!(upper.level, 1);
        assert_eq!(upper.point, Point::new(3.0, 4.0));
        assert!(upper.drag_continuation);
        assert_eq!(upper.key, Some(key.id));
    }

    #[test]
    fn test_source_ids_are_unique() {
        assert_ne!(SourceId::next(), SourceId::next());
    }
}
