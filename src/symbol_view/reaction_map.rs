// SPDX-License-Identifier: GPL-3.0-only

//! Reaction map painting contract.
//!
//! A reaction map tells the haptics/feedback layer which screen areas react
//! to touch. The symbol view paints its visible region into whatever map the
//! host hands it.

use crate::geometry::Rect;

/// Value drawn into the map by subsequent fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactionValue {
    /// Touches produce no feedback.
    #[default]
    Inactive,
    /// Touches produce press feedback.
    Press,
}

pub trait ReactionMap {
    fn set_drawing_value(&mut self, value: ReactionValue);

    /// Fills `rect`, in scene coordinates, with the current drawing value.
    fn fill_rect(&mut self, rect: Rect);
}

/// A reaction map that records what was painted into it.
#[derive(Debug, Clone, Default)]
pub struct RecordingReactionMap {
    value: ReactionValue,
    pub fills: Vec<(ReactionValue, Rect)>,
}

impl RecordingReactionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangles painted with `value`.
    pub fn rects_with(&self, value: ReactionValue) -> Vec<Rect> {
        self.fills
            .iter()
            .filter(|(v, _)| *v == value)
            .map(|(_, rect)| *rect)
            .collect()
    }
}

impl ReactionMap for RecordingReactionMap {
    fn set_drawing_value(&mut self, value: ReactionValue) {
        self.value = value;
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.fills.push((self.value, rect));
    }
}
