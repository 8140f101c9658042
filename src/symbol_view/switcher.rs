// SPDX-License-Identifier: GPL-3.0-only

//! Horizontal page switcher.
//!
//! Holds the ordered pages of the symbol view and animates between
//! adjacent ones. The current index only changes once a transition has
//! finished; while one is running further switch requests are refused.

use std::time::Duration;

use crate::input::KeyArea;

/// A running page transition.
#[derive(Debug, Clone)]
pub struct PageTransition {
    pub from: usize,
    pub to: usize,
    /// Linear progress from 0.0 (start) to 1.0 (complete)
    pub progress: f32,
}

impl PageTransition {
    fn new(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            progress: 0.0,
        }
    }

    /// Ease-out-cubic of the progress.
    pub fn eased_progress(&self) -> f32 {
        // 1 - (1 - x)^3
        let x = self.progress;
        1.0 - (1.0 - x).powi(3)
    }

    /// -1.0 when moving towards lower indices, 1.0 otherwise.
    fn direction(&self) -> f32 {
        if self.to < self.from { -1.0 } else { 1.0 }
    }
}

/// Ordered pages plus the transition between them.
#[derive(Debug)]
pub struct HorizontalSwitcher {
    pages: Vec<KeyArea>,
    current: Option<usize>,
    transition: Option<PageTransition>,
    duration: Duration,
}

impl HorizontalSwitcher {
    pub fn new(duration: Duration) -> Self {
        Self {
            pages: Vec::new(),
            current: None,
            transition: None,
            duration,
        }
    }

    pub fn count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Index of the current page, `None` without pages.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_page(&self) -> Option<&KeyArea> {
        self.pages.get(self.current?)
    }

    pub fn current_page_mut(&mut self) -> Option<&mut KeyArea> {
        self.pages.get_mut(self.current?)
    }

    pub fn page(&self, index: usize) -> Option<&KeyArea> {
        self.pages.get(index)
    }

    pub fn pages(&self) -> &[KeyArea] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [KeyArea] {
        &mut self.pages
    }

    /// Appends a page. The first page added becomes current.
    pub fn add(&mut self, page: KeyArea) {
        self.pages.push(page);
        if self.current.is_none() {
            self.current = Some(0);
        }
    }

    /// Drops every page and any running transition.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.current = None;
        self.transition = None;
    }

    /// Makes `index` current without animating. Out of range indices are
    /// ignored.
    pub fn set_current(&mut self, index: usize) {
        if index < self.pages.len() {
            self.transition = None;
            self.current = Some(index);
        }
    }

    pub fn is_running(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition(&self) -> Option<&PageTransition> {
        self.transition.as_ref()
    }

    /// Starts animating towards `index`. Returns `false` if a transition is
    /// already running, `index` is out of range or already current.
    pub fn switch_to(&mut self, index: usize) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        if self.is_running() || index >= self.pages.len() || index == current {
            return false;
        }
        tracing::debug!(from = current, to = index, "page switch starting");
        self.transition = Some(PageTransition::new(current, index));
        true
    }

    /// Steps the transition. Returns the new current index when the switch
    /// completes during this step.
    pub fn advance(&mut self, dt: Duration) -> Option<usize> {
        let transition = self.transition.as_mut()?;
        transition.progress = if self.duration.is_zero() {
            1.0
        } else {
            (transition.progress + dt.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        if transition.progress < 1.0 {
            return None;
        }

        let to = transition.to;
        self.transition = None;
        self.current = Some(to);
        tracing::debug!(page = to, "page switch done");
        Some(to)
    }

    /// Horizontal offset of page `index` relative to the view, or `None` if
    /// the page is not on screen.
    ///
    /// During a transition the outgoing page slides out by the eased
    /// progress while the incoming page slides in from the opposite side.
    pub fn page_offset(&self, index: usize) -> Option<f32> {
        let width = self.pages.get(index)?.width();
        match &self.transition {
            Some(t) if index == t.from => Some(-t.direction() * width * t.eased_progress()),
            Some(t) if index == t.to => Some(t.direction() * width * (1.0 - t.eased_progress())),
            Some(_) => None,
            None => (self.current == Some(index)).then_some(0.0),
        }
    }
}
