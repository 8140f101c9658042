// SPDX-License-Identifier: GPL-3.0-only

//! Scene geometry and orientation as seen by the symbol view.

use std::cell::Cell;

use crate::geometry::Rect;
use crate::layout::Orientation;

/// Supplies the current orientation and scene size.
///
/// The host notifies orientation changes by calling
/// `SymbolView::prepare_to_orientation_change` before and
/// `SymbolView::finalize_orientation_change` after the source starts
/// reporting the new values.
pub trait SceneSource {
    fn orientation(&self) -> Orientation;

    /// Scene rectangle in the current orientation, origin at (0, 0).
    fn scene_rect(&self) -> Rect;
}

/// A screen of fixed physical size that can be rotated.
#[derive(Debug)]
pub struct Screen {
    landscape_width: f32,
    landscape_height: f32,
    orientation: Cell<Orientation>,
}

impl Screen {
    /// Creates a screen in landscape with the given landscape size.
    pub fn new(landscape_width: f32, landscape_height: f32) -> Self {
        Self {
            landscape_width,
            landscape_height,
            orientation: Cell::new(Orientation::Landscape),
        }
    }

    pub fn set_orientation(&self, orientation: Orientation) {
        self.orientation.set(orientation);
    }
}

impl SceneSource for Screen {
    fn orientation(&self) -> Orientation {
        self.orientation.get()
    }

    fn scene_rect(&self) -> Rect {
        match self.orientation.get() {
            Orientation::Landscape => Rect::new(0.0, 0.0, self.landscape_width, self.landscape_height),
            Orientation::Portrait => Rect::new(0.0, 0.0, self.landscape_height, self.landscape_width),
        }
    }
}
