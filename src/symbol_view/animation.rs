// SPDX-License-Identifier: GPL-3.0-only

//! Slide animation of the symbol view.
//!
//! The view slides vertically between a `bottom` extent (hidden, just below
//! the scene) and a `top` extent (fully shown). Openness is kept as explicit
//! state: 0.0 is hidden, 1.0 is fully shown. Each direction has its own
//! timeline; starting one direction while the other is running takes over
//! the current openness, so the view never jumps.

use std::time::Duration;

/// What a finished animation left the view as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    Shown,
    Hidden,
}

/// Linear progress from 0.0 to 1.0 over a fixed duration.
#[derive(Debug, Clone)]
struct TimeLine {
    duration: Duration,
    progress: f32,
    running: bool,
}

impl TimeLine {
    fn new(duration: Duration) -> Self {
        Self {
            duration,
            progress: 0.0,
            running: false,
        }
    }

    fn start_from(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    /// Returns `true` when the timeline reached its end during this step.
    fn advance(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }
        self.progress = if self.duration.is_zero() {
            1.0
        } else {
            (self.progress + dt.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        if self.progress >= 1.0 {
            self.running = false;
            return true;
        }
        false
    }
}

/// Show and hide timelines plus the interpolated vertical position.
#[derive(Debug, Clone)]
pub struct AnimationGroup {
    show: TimeLine,
    hide: TimeLine,
    top: f32,
    bottom: f32,
    openness: f32,
}

impl AnimationGroup {
    pub fn new(show_duration: Duration, hide_duration: Duration) -> Self {
        Self {
            show: TimeLine::new(show_duration),
            hide: TimeLine::new(hide_duration),
            top: 0.0,
            bottom: 0.0,
            openness: 0.0,
        }
    }

    /// Updates the extents. Openness is kept, so an in-flight animation
    /// continues from the same relative position.
    pub fn update_pos(&mut self, top: f32, bottom: f32) {
        self.top = top;
        self.bottom = bottom;
    }

    pub fn play_show_animation(&mut self) {
        self.hide.stop();
        self.show.start_from(self.openness);
    }

    pub fn play_hide_animation(&mut self) {
        self.show.stop();
        self.hide.start_from(1.0 - self.openness);
    }

    pub fn has_ongoing_animations(&self) -> bool {
        self.show.running || self.hide.running
    }

    pub fn is_showing(&self) -> bool {
        self.show.running
    }

    pub fn is_hiding(&self) -> bool {
        self.hide.running
    }

    /// Steps the running timeline.
    pub fn advance(&mut self, dt: Duration) -> Option<AnimationOutcome> {
        if self.show.running {
            let finished = self.show.advance(dt);
            self.openness = self.show.progress;
            return finished.then_some(AnimationOutcome::Shown);
        }
        if self.hide.running {
            let finished = self.hide.advance(dt);
            self.openness = 1.0 - self.hide.progress;
            return finished.then_some(AnimationOutcome::Hidden);
        }
        None
    }

    /// 0.0 when hidden, 1.0 when fully shown.
    pub fn openness(&self) -> f32 {
        self.openness
    }

    /// Current top edge of the view.
    pub fn position(&self) -> f32 {
        self.bottom + (self.top - self.bottom) * self.openness
    }

    /// Stops both timelines and jumps to hidden.
    pub fn reset(&mut self) {
        self.show.stop();
        self.hide.stop();
        self.openness = 0.0;
    }
}
