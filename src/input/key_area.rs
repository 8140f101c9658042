// SPDX-License-Identifier: GPL-3.0-only

//! A page of keys that turns pointer input into raw key notifications.
//!
//! The area hit-tests pointer positions against its keys and raises
//! press, release, click and long-press notifications:
//!
//! - pointer down on a key: press, and the long press timer starts
//! - pointer moved onto another key: release of the old key, press of the
//!   new one (marked as a drag continuation), the pending long press is
//!   cancelled and restarted for the new key
//! - pointer up: release and click of the key under the pointer
//! - pointer down again while a key is held: release of the held key
//! - timer reaching the threshold with the key still held: long press,
//!   raised once per hold
//!
//! Time only moves through [`KeyArea::advance`].

use std::rc::{Rc, Weak};
use std::time::Duration;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::config::Settings;
use crate::geometry::{Point, Rect};
use crate::input::key_event::{KeyContext, KeyEventKind, KeyId, KeyNotification, NotifiedKey, SourceId};
use crate::layout::{KeyModel, SharedLayoutSection};
use crate::signal::Signal;

/// Pointer currently held down on the area.
#[derive(Debug, Clone, Copy)]
struct Touch {
    /// Key under the pointer as (row, column)
    key: Option<(usize, usize)>,
    point: Point,
    /// The pointer has left the key it was first pressed on
    dragged: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingLongPress {
    key: (usize, usize),
    elapsed: Duration,
}

/// An input source built from one layout section.
#[derive(Debug)]
pub struct KeyArea {
    id: SourceId,
    section: SharedLayoutSection,
    level: u8,
    width: f32,
    row_height: f32,
    padding: f32,
    long_press_threshold: Duration,
    /// Key rectangles per row, in area coordinates
    key_rects: Vec<Vec<Rect>>,
    touch: Option<Touch>,
    long_press: Option<PendingLongPress>,
    notifications: Signal<KeyNotification>,
    /// Dropped with the area; listeners hold weak references to it
    alive: Rc<()>,
}

impl KeyArea {
    pub fn new(section: SharedLayoutSection, settings: &Settings) -> Self {
        Self {
            id: SourceId::next(),
            section,
            level: 0,
            width: 0.0,
            row_height: settings.row_height,
            padding: settings.page_padding,
            long_press_threshold: settings.long_press_threshold(),
            key_rects: Vec::new(),
            touch: None,
            long_press: None,
            notifications: Signal::new(),
            alive: Rc::new(()),
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn section(&self) -> &SharedLayoutSection {
        &self.section
    }

    /// Registers a listener for this area's raw notifications.
    pub fn subscribe(&mut self) -> UnboundedReceiver<KeyNotification> {
        self.notifications.subscribe()
    }

    /// Forwards raw notifications into `sink`, which may be shared with
    /// other areas. The returned handle stops upgrading once the area is
    /// dropped.
    pub fn connect(&mut self, sink: UnboundedSender<KeyNotification>) -> Weak<()> {
        self.notifications.connect(sink);
        Rc::downgrade(&self.alive)
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Switches the level used for labels and notification contexts.
    pub fn switch_level(&mut self, level: u8) {
        self.level = level;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height needed to show every row.
    pub fn preferred_height(&self) -> f32 {
        self.section.row_count() as f32 * self.row_height + 2.0 * self.padding
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.preferred_height())
    }

    /// Lays the keys out for the given width. Keys in a row share the width
    /// proportionally to their relative widths.
    pub fn resize(&mut self, width: f32) {
        self.width = width;
        self.key_rects = self
            .section
            .rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                let total = row.total_width();
                let unit = if total > 0.0 { width / total } else { 0.0 };
                let y = self.padding + row_index as f32 * self.row_height;
                let mut x = 0.0;
                row.keys
                    .iter()
                    .map(|key| {
                        let rect = Rect::new(x, y, key.width * unit, self.row_height);
                        x += rect.width;
                        rect
                    })
                    .collect()
            })
            .collect();
    }

    /// Every key rectangle in area coordinates.
    pub fn key_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.key_rects.iter().flatten().copied()
    }

    pub fn key_rect(&self, row: usize, column: usize) -> Option<Rect> {
        self.key_rects.get(row)?.get(column).copied()
    }

    /// Position of the key under `point`, if any.
    pub fn key_at(&self, point: Point) -> Option<(usize, usize)> {
        self.key_rects.iter().enumerate().find_map(|(row, rects)| {
            rects
                .iter()
                .position(|rect| rect.contains(point))
                .map(|column| (row, column))
        })
    }

    pub fn key_model(&self, row: usize, column: usize) -> Option<&KeyModel> {
        self.section.rows.get(row)?.keys.get(column)
    }

    /// Key currently held by the pointer.
    pub fn active_key(&self) -> Option<KeyId> {
        let (row, column) = self.touch?.key?;
        Some(self.key_id(row, column))
    }

    pub fn is_pointer_down(&self) -> bool {
        self.touch.is_some()
    }

    pub fn has_pending_long_press(&self) -> bool {
        self.long_press.is_some()
    }

    // ========================================================================
    // Pointer Input
    // ========================================================================

    pub fn pointer_press(&mut self, point: Point) {
        self.cancel_long_press();
        // Only one pointer is tracked. A press while another is held lets
        // go of the held key first, without a click.
        if let Some(held) = self.touch.take() {
            if let Some(old) = held.key {
                self.notify(KeyEventKind::Release, old, held.point, held.dragged);
            }
        }
        let key = self.key_at(point);
        self.touch = Some(Touch {
            key,
            point,
            dragged: false,
        });

        if let Some(key) = key {
            self.notify(KeyEventKind::Press, key, point, false);
            self.start_long_press(key);
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        let Some(mut touch) = self.touch else {
            return;
        };
        let key = self.key_at(point);
        touch.point = point;

        if key != touch.key {
            // Any pending long press belongs to the key being left.
            self.cancel_long_press();
            if let Some(old) = touch.key {
                self.notify(KeyEventKind::Release, old, point, touch.dragged);
            }
            touch.dragged = true;
            if let Some(new) = key {
                self.notify(KeyEventKind::Press, new, point, true);
                self.start_long_press(new);
            }
            touch.key = key;
        }
        self.touch = Some(touch);
    }

    pub fn pointer_release(&mut self, point: Point) {
        if self.touch.is_none() {
            return;
        }
        // The release may land on another key without an intervening move.
        self.pointer_move(point);

        let Some(touch) = self.touch.take() else {
            return;
        };
        self.cancel_long_press();
        if let Some(key) = touch.key {
            self.notify(KeyEventKind::Release, key, point, touch.dragged);
            self.notify(KeyEventKind::Click, key, point, touch.dragged);
        }
    }

    /// Advances the long press timer, raising the long press once the
    /// threshold is reached.
    pub fn advance(&mut self, dt: Duration) {
        let Some(mut pending) = self.long_press else {
            return;
        };
        pending.elapsed += dt;
        if pending.elapsed < self.long_press_threshold {
            self.long_press = Some(pending);
            return;
        }

        self.long_press = None;
        let (point, dragged) = self
            .touch
            .map(|touch| (touch.point, touch.dragged))
            .unwrap_or_default();
        self.notify(KeyEventKind::LongPress, pending.key, point, dragged);
    }

    /// Drops the pending long press, returning whether one was pending.
    pub fn cancel_long_press(&mut self) -> bool {
        self.long_press.take().is_some()
    }

    /// Forgets the held pointer without raising notifications.
    pub fn reset_active_keys(&mut self) {
        self.touch = None;
        self.long_press = None;
    }

    fn start_long_press(&mut self, key: (usize, usize)) {
        self.long_press = Some(PendingLongPress {
            key,
            elapsed: Duration::ZERO,
        });
    }

    fn key_id(&self, row: usize, column: usize) -> KeyId {
        KeyId {
            source: self.id,
            row,
            column,
        }
    }

    fn notify(&mut self, kind: KeyEventKind, (row, column): (usize, usize), point: Point, dragged: bool) {
        let Some(model) = self.key_model(row, column).cloned() else {
            return;
        };
        let key = NotifiedKey {
            id: self.key_id(row, column),
            model,
        };
        let context = KeyContext::new(self.level, point).dragged(dragged);
        tracing::trace!(source = self.id.get(), ?kind, key = %key.model.identifier(), "raw key notification");
        self.notifications
            .emit(KeyNotification::new(kind, key, context));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutSection, SectionRow};
    use crate::signal::drain;
    use std::rc::Rc;

    /// Two rows: "1 2 3 4" and "shift(2.0) 5 6", 400 px wide, 50 px rows,
    /// no padding, 300 ms long press.
    fn area() -> (KeyArea, UnboundedReceiver<KeyNotification>) {
        let section = Rc::new(LayoutSection {
            name: "sym".to_string(),
            title: None,
            rows: vec![
                SectionRow {
                    keys: ["1", "2", "3", "4"].into_iter().map(KeyModel::new).collect(),
                },
                SectionRow {
                    keys: vec![
                        KeyModel {
                            width: 2.0,
                            ..KeyModel::new("shift").with_kind(crate::layout::KeyKind::Shift)
                        },
                        KeyModel::new("5"),
                        KeyModel::new("6"),
                    ],
                },
            ],
        });
        let settings = Settings {
            row_height: 50.0,
            page_padding: 0.0,
            long_press_threshold_ms: 300,
            ..Settings::default()
        };
        let mut area = KeyArea::new(section, &settings);
        area.resize(400.0);
        let rx = area.subscribe();
        (area, rx)
    }

    fn kinds(notifications: &[KeyNotification]) -> Vec<(KeyEventKind, String)> {
        notifications
            .iter()
            .map(|n| (n.kind, n.key.as_ref().unwrap().model.label.clone()))
            .collect()
    }

    /// Test 1: Key geometry follows relative widths.
    #[test]
    fn test_layout_geometry() {
        let (area, _rx) = area();

        assert_eq!(area.key_rect(0, 1), Some(Rect::new(100.0, 0.0, 100.0, 50.0)));
        assert_eq!(area.key_rect(1, 0), Some(Rect::new(0.0, 50.0, 200.0, 50.0)));
        assert_eq!(area.key_at(Point::new(250.0, 75.0)), Some((1, 1)));
        assert_eq!(area.key_at(Point::new(10.0, 150.0)), None);
        assert_eq!(area.preferred_height(), 100.0);
        assert_eq!(area.key_rects().count(), 7);
    }

    /// Test 2: Tap produces press, release and click in order.
    #[test]
    fn test_tap_sequence() {
        let (mut area, mut rx) = area();

        area.pointer_press(Point::new(10.0, 10.0));
        area.pointer_release(Point::new(12.0, 11.0));

        assert_eq!(
            kinds(&drain(&mut rx)),
            vec![
                (KeyEventKind::Press, "1".to_string()),
                (KeyEventKind::Release, "1".to_string()),
                (KeyEventKind::Click, "1".to_string()),
            ]
        );
        assert!(!area.is_pointer_down());
        assert!(!area.has_pending_long_press());
    }

    /// Test 3: Sliding to another key releases the old and presses the new.
    #[test]
    fn test_drag_over_keys() {
        let (mut area, mut rx) = area();

        area.pointer_press(Point::new(10.0, 10.0));
        area.pointer_move(Point::new(150.0, 10.0));
        area.pointer_release(Point::new(150.0, 10.0));

        let notifications = drain(&mut rx);
        assert_eq!(
            kinds(&notifications),
            vec![
                (KeyEventKind::Press, "1".to_string()),
                (KeyEventKind::Release, "1".to_string()),
                (KeyEventKind::Press, "2".to_string()),
                (KeyEventKind::Release, "2".to_string()),
                (KeyEventKind::Click, "2".to_string()),
            ]
        );
        assert!(
            notifications[2].context.unwrap().drag_continuation,
            "Press after sliding should be a drag continuation"
        );
        assert!(!notifications[0].context.unwrap().drag_continuation);
    }

    /// Test 4: Long press fires once after the threshold.
    #[test]
    fn test_long_press_fires_once() {
        let (mut area, mut rx) = area();

        area.pointer_press(Point::new(310.0, 10.0));
        area.advance(Duration::from_millis(200));
        assert_eq!(drain(&mut rx).len(), 1, "Only the press before the threshold");

        area.advance(Duration::from_millis(100));
        let notifications = drain(&mut rx);
        assert_eq!(kinds(&notifications), vec![(KeyEventKind::LongPress, "4".to_string())]);

        area.advance(Duration::from_millis(1000));
        assert!(drain(&mut rx).is_empty(), "Long press should fire only once per hold");
    }

    /// Test 5: Releasing before the threshold cancels the long press.
    #[test]
    fn test_release_cancels_long_press() {
        let (mut area, mut rx) = area();

        area.pointer_press(Point::new(10.0, 10.0));
        area.advance(Duration::from_millis(299));
        area.pointer_release(Point::new(10.0, 10.0));
        area.advance(Duration::from_millis(500));

        let notifications = drain(&mut rx);
        assert!(
            notifications.iter().all(|n| n.kind != KeyEventKind::LongPress),
            "No long press after an early release"
        );
    }

    /// Test 6: Pending long press is cancelled when the active key changes
    /// without a release; the new key starts its own full threshold.
    #[test]
    fn test_long_press_cancelled_when_key_identity_changes() {
        let (mut area, mut rx) = area();

        area.pointer_press(Point::new(10.0, 10.0));
        area.advance(Duration::from_millis(250));
        area.pointer_move(Point::new(150.0, 10.0));
        area.advance(Duration::from_millis(100));
        assert!(
            drain(&mut rx).iter().all(|n| n.kind != KeyEventKind::LongPress),
            "Time spent on the first key must not count for the second"
        );

        area.advance(Duration::from_millis(200));
        assert_eq!(
            kinds(&drain(&mut rx)),
            vec![(KeyEventKind::LongPress, "2".to_string())]
        );
    }

    /// Test 7: Level is carried in the notification context.
    #[test]
    fn test_level_in_context() {
        let (mut area, mut rx) = area();
        area.switch_level(1);

        area.pointer_press(Point::new(10.0, 60.0));
        let notifications = drain(&mut rx);
        assert_eq!(notifications[0].context.unwrap().level, 1);
        assert_eq!(area.active_key().map(|id| (id.row, id.column)), Some((1, 0)));
    }

    /// Test 8: Reset forgets the pointer silently.
    #[test]
    fn test_reset_active_keys() {
        let (mut area, mut rx) = area();

        area.pointer_press(Point::new(10.0, 10.0));
        drain(&mut rx);
        area.reset_active_keys();
        area.pointer_release(Point::new(10.0, 10.0));
        area.advance(Duration::from_secs(1));

        assert!(drain(&mut rx).is_empty());
    }

    /// Test 9: Pressing outside any key holds the pointer but raises nothing
    /// until a key is reached.
    #[test]
    fn test_press_outside_keys() {
        let (mut area, mut rx) = area();

        area.pointer_press(Point::new(10.0, 500.0));
        assert!(drain(&mut rx).is_empty());
        assert!(area.is_pointer_down());

        area.pointer_move(Point::new(10.0, 10.0));
        let notifications = drain(&mut rx);
        assert_eq!(kinds(&notifications), vec![(KeyEventKind::Press, "1".to_string())]);
        assert!(notifications[0].context.unwrap().drag_continuation);
    }

    /// Test 10: A second press while a key is held releases that key first,
    /// without clicking it.
    #[test]
    fn test_press_while_held_releases_previous_key() {
        let (mut area, mut rx) = area();

        area.pointer_press(Point::new(10.0, 60.0));
        area.pointer_press(Point::new(10.0, 10.0));
        area.pointer_release(Point::new(10.0, 10.0));

        assert_eq!(
            kinds(&drain(&mut rx)),
            vec![
                (KeyEventKind::Press, "shift".to_string()),
                (KeyEventKind::Release, "shift".to_string()),
                (KeyEventKind::Press, "1".to_string()),
                (KeyEventKind::Release, "1".to_string()),
                (KeyEventKind::Click, "1".to_string()),
            ]
        );
        assert!(!area.is_pointer_down());
    }
}
