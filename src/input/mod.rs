// SPDX-License-Identifier: GPL-3.0-only

//! Input handling: from pointer positions to semantic key events.
//!
//! Input flows through two stages:
//!
//! 1. **[`KeyArea`]**: a page of keys. Hit-tests pointer press, move and
//!    release and raises raw notifications (press, release, click, long
//!    press). Long presses are detected with a timer driven by
//!    [`KeyArea::advance`].
//! 2. **[`KeyEventHandler`]**: subscribes to any number of key areas and
//!    turns their notifications into [`KeyboardEvent`]s, tracking whether
//!    shift is held and swallowing a shift click already consumed by a
//!    chord.
//!
//! ```rust,ignore
//! use symboard::input::{KeyArea, KeyEventHandler, KeyboardEvent};
//! use symboard::signal::drain;
//!
//! let mut area = KeyArea::new(section, &settings);
//! area.resize(800.0);
//!
//! let mut handler = KeyEventHandler::new();
//! handler.add_event_source(&mut area);
//! let mut events = handler.subscribe();
//!
//! area.pointer_press(point);
//! area.pointer_release(point);
//! handler.process_pending();
//!
//! for event in drain(&mut events) {
//!     if let KeyboardEvent::KeyClicked(key) = event {
//!         println!("typed {}", key.text);
//!     }
//! }
//! ```

pub mod key_area;
pub mod key_event;
pub mod key_event_handler;
pub mod modifier;

pub use key_area::KeyArea;
pub use key_event::{KeyContext, KeyEvent, KeyEventKind, KeyId, KeyNotification, NotifiedKey, SourceId};
pub use key_event_handler::{KeyEventHandler, KeyboardEvent};
pub use modifier::ModifierState;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::geometry::Point;
    use crate::layout::{KeyKind, KeyModel, LayoutSection, SectionRow};
    use crate::signal::drain;
    use std::rc::Rc;

    /// End to end: a tap on a shifted area yields the upper-level text and
    /// events arrive in raw notification order.
    #[test]
    fn test_tap_translates_with_level() {
        let section = Rc::new(LayoutSection {
            name: "letters".to_string(),
            title: None,
            rows: vec![SectionRow {
                keys: vec![
                    KeyModel::new("a").with_shifted("A"),
                    KeyModel::new("shift").with_kind(KeyKind::Shift),
                ],
            }],
        });
        let mut area = KeyArea::new(section, &Settings::default());
        area.resize(100.0);
        area.switch_level(ModifierState::Locked.level());

        let mut handler = KeyEventHandler::new();
        handler.add_event_source(&mut area);
        let mut rx = handler.subscribe();

        let point = Point::new(10.0, Settings::default().page_padding + 1.0);
        area.pointer_press(point);
        area.pointer_release(point);
        handler.process_pending();

        let kinds: Vec<(KeyEventKind, String)> = drain(&mut rx)
            .into_iter()
            .filter_map(|event| match event {
                KeyboardEvent::KeyPressed(e)
                | KeyboardEvent::KeyReleased(e)
                | KeyboardEvent::KeyClicked(e)
                | KeyboardEvent::LongKeyPressed(e) => Some((e.kind, e.text)),
                KeyboardEvent::ShiftPressed(_) => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                (KeyEventKind::Press, "A".to_string()),
                (KeyEventKind::Release, "A".to_string()),
                (KeyEventKind::Click, "A".to_string()),
            ]
        );
    }
}
