// SPDX-License-Identifier: GPL-3.0-only

//! The symbol view: an overlay panel of symbol pages.
//!
//! The view slides up from the bottom of the scene and shows one page of a
//! symbol layout at a time. It owns:
//!
//! - a [`HorizontalSwitcher`] holding the pages ([`KeyArea`]s) built from
//!   the sections a [`LayoutsProvider`] returns,
//! - a [`KeyEventHandler`] translating the pages' raw notifications,
//! - an [`AnimationGroup`] for the slide in and out.
//!
//! # Activity
//!
//! Visibility is tracked as an [`Activity`]:
//!
//! | Call                          | From                    | To                    |
//! |-------------------------------|-------------------------|-----------------------|
//! | `show(Normal)`                | hidden states           | `Active`              |
//! | `show(Normal)`                | `TemporarilyActive`     | `Active`              |
//! | `show(FollowMouse)`           | hidden states           | `TemporarilyActive`   |
//! | `hide(Normal)`                | any but `Inactive`      | `Inactive`            |
//! | `hide(Temporary)`             | `Active`                | `TemporarilyInactive` |
//! | `hide(Temporary)`             | `TemporarilyActive`     | `Inactive`            |
//!
//! Every other combination is a no-op. A temporary hide remembers that the
//! view should come back, which is what an orientation change relies on.
//!
//! # Time
//!
//! Nothing here reads a clock. The host calls [`SymbolView::advance`] once
//! per frame to step the slide animation, page switches and long press
//! timers.

pub mod animation;
pub mod reaction_map;
pub mod switcher;

pub use animation::{AnimationGroup, AnimationOutcome};
pub use reaction_map::{ReactionMap, ReactionValue, RecordingReactionMap};
pub use switcher::{HorizontalSwitcher, PageTransition};

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::mpsc::UnboundedReceiver;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::geometry::{Point, Rect, Region};
use crate::input::{KeyArea, KeyEvent, KeyEventHandler, KeyboardEvent, ModifierState};
use crate::layout::{HandlerState, LayoutsProvider, Orientation, SharedLayoutSection};
use crate::scene::SceneSource;
use crate::signal::{Signal, drain};

/// How the view is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowMode {
    /// Shown until hidden.
    #[default]
    Normal,
    /// Shown while the pointer is held; captures the pointer and hides on
    /// release.
    FollowMouse,
}

/// How the view is hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HideMode {
    #[default]
    Normal,
    /// Hidden for a structural reason such as rotation; a later
    /// `show(Normal)` or orientation finalize brings it back.
    Temporary,
}

/// Visibility state of the view with respect to show/hide calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// After `show(Normal)`
    Active,
    /// After `show(FollowMouse)`
    TemporarilyActive,
    /// After `hide(Normal)`
    #[default]
    Inactive,
    /// After `hide(Temporary)`
    TemporarilyInactive,
}

impl Activity {
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Active | Self::TemporarilyActive)
    }
}

/// Events emitted by [`SymbolView`].
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolViewEvent {
    KeyPressed(KeyEvent),
    KeyReleased(KeyEvent),
    KeyClicked(KeyEvent),
    LongKeyPressed(KeyEvent),
    /// Shift went down (`true`) or up (`false`) on one of the pages.
    ShiftPressed(bool),
    /// Level now used by every page: 0 for lower case, 1 for upper case.
    LevelSwitched(u8),
    /// The interactive region changed.
    RegionUpdated(Region),
    /// The view starts to show up.
    AboutToOpen,
    /// The view is fully visible.
    Opened,
    /// The view starts its hide transition.
    AboutToHide,
    /// The hide transition finished.
    Hidden,
    /// The host should repaint its reaction map.
    UpdateReactionMap,
}

/// Overlay panel controller for symbol pages.
pub struct SymbolView {
    layouts: Rc<dyn LayoutsProvider>,
    scene: Rc<dyn SceneSource>,
    settings: Settings,

    activity: Activity,
    current_layout: String,
    /// Orientation the current pages were built for
    current_orientation: Orientation,
    keyboard_state: HandlerState,
    shift_state: ModifierState,

    page_switcher: HorizontalSwitcher,
    anim: AnimationGroup,
    /// A reload was requested while the slide animation was running
    reload_pending: bool,
    /// A page has received a pointer press that was not released yet
    pointer_down: bool,
    last_region: Region,

    event_handler: KeyEventHandler,
    translated: UnboundedReceiver<KeyboardEvent>,
    events: Signal<SymbolViewEvent>,
}

impl fmt::Debug for SymbolView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolView")
            .field("activity", &self.activity)
            .field("current_layout", &self.current_layout)
            .field("current_orientation", &self.current_orientation)
            .field("keyboard_state", &self.keyboard_state)
            .field("shift_state", &self.shift_state)
            .field("page_switcher", &self.page_switcher)
            .field("anim", &self.anim)
            .finish_non_exhaustive()
    }
}

impl SymbolView {
    /// Creates a hidden view showing `layout`.
    pub fn new(
        layouts: Rc<dyn LayoutsProvider>,
        scene: Rc<dyn SceneSource>,
        settings: Settings,
        layout: impl Into<String>,
    ) -> Self {
        let mut event_handler = KeyEventHandler::new();
        let translated = event_handler.subscribe();

        let mut view = Self {
            current_orientation: scene.orientation(),
            anim: AnimationGroup::new(settings.show_duration(), settings.hide_duration()),
            page_switcher: HorizontalSwitcher::new(settings.page_switch_duration()),
            layouts,
            scene,
            settings,
            activity: Activity::Inactive,
            current_layout: layout.into(),
            keyboard_state: HandlerState::OnScreen,
            shift_state: ModifierState::Off,
            reload_pending: false,
            pointer_down: false,
            last_region: Region::new(),
            event_handler,
            translated,
            events: Signal::new(),
        };
        view.reload_content();
        view
    }

    /// Registers a listener for view events.
    pub fn subscribe(&mut self) -> UnboundedReceiver<SymbolViewEvent> {
        self.events.subscribe()
    }

    pub fn key_event_handler(&self) -> &KeyEventHandler {
        &self.event_handler
    }

    /// Access for the chord detector, e.g. to swallow the next shift click.
    pub fn key_event_handler_mut(&mut self) -> &mut KeyEventHandler {
        &mut self.event_handler
    }

    pub fn switcher(&self) -> &HorizontalSwitcher {
        &self.page_switcher
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    pub fn show(&mut self, mode: ShowMode) {
        match (self.activity, mode) {
            (Activity::Active, _) | (Activity::TemporarilyActive, ShowMode::FollowMouse) => return,
            (Activity::TemporarilyActive, ShowMode::Normal) => {
                tracing::debug!("follow mode promoted to normal show");
                self.activity = Activity::Active;
                return;
            }
            (Activity::Inactive | Activity::TemporarilyInactive, _) => {}
        }

        self.organize_content();
        if self.page_switcher.is_empty() {
            tracing::debug!(layout = %self.current_layout, "no symbol pages to show");
            return;
        }

        self.activity = match mode {
            ShowMode::Normal => Activity::Active,
            ShowMode::FollowMouse => Activity::TemporarilyActive,
        };
        tracing::debug!(activity = ?self.activity, "showing symbol view");
        self.emit(SymbolViewEvent::AboutToOpen);
        self.anim.play_show_animation();
        self.update_region();
    }

    pub fn hide(&mut self, mode: HideMode) {
        let target = match (self.activity, mode) {
            (Activity::Inactive, _) | (Activity::TemporarilyInactive, HideMode::Temporary) => return,
            (Activity::TemporarilyInactive, HideMode::Normal) => {
                tracing::debug!("temporary hide made permanent");
                self.activity = Activity::Inactive;
                return;
            }
            (Activity::Active, HideMode::Temporary) => Activity::TemporarilyInactive,
            // Follow mode has no reopen intent to keep.
            (Activity::Active | Activity::TemporarilyActive, _) => Activity::Inactive,
        };

        self.cancel_touches();
        self.activity = target;
        tracing::debug!(activity = ?self.activity, "hiding symbol view");
        self.emit(SymbolViewEvent::AboutToHide);
        self.anim.play_hide_animation();
        self.update_region();
    }

    /// Hides an active view temporarily, or brings back a temporarily
    /// hidden one.
    pub fn set_temporarily_hidden(&mut self, hidden: bool) {
        match (hidden, self.activity) {
            (true, Activity::Active) => self.hide(HideMode::Temporary),
            (false, Activity::TemporarilyInactive) => self.show(ShowMode::Normal),
            _ => {}
        }
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// `true` while shown, in either mode.
    pub fn is_active(&self) -> bool {
        self.activity.is_visible()
    }

    /// `true` once the show animation has finished.
    pub fn is_fully_visible(&self) -> bool {
        self.activity.is_visible() && !self.anim.has_ongoing_animations() && self.anim.openness() >= 1.0
    }

    // ========================================================================
    // Pages
    // ========================================================================

    pub fn page_count(&self) -> usize {
        self.page_switcher.count()
    }

    pub fn current_page(&self) -> Option<usize> {
        self.page_switcher.current()
    }

    /// Title of page `index`; pages without one are titled "n/total".
    pub fn page_title(&self, index: usize) -> Option<String> {
        let page = self.page_switcher.page(index)?;
        Some(match page.section().title() {
            Some(title) => title.to_string(),
            None => format!("{}/{}", index + 1, self.page_count()),
        })
    }

    /// Selects the next page unless the current one is the last.
    pub fn switch_to_next_page(&mut self) {
        let Some(current) = self.page_switcher.current() else {
            return;
        };
        if current + 1 < self.page_switcher.count() {
            self.switch_to_page(current + 1);
        }
    }

    /// Selects the previous page unless the current one is the first.
    pub fn switch_to_prev_page(&mut self) {
        match self.page_switcher.current() {
            Some(current) if current > 0 => self.switch_to_page(current - 1),
            _ => {}
        }
    }

    fn switch_to_page(&mut self, index: usize) {
        if self.page_switcher.is_running() {
            return;
        }
        if let Some(page) = self.page_switcher.current_page_mut() {
            page.cancel_long_press();
            page.reset_active_keys();
        }
        self.pointer_down = false;

        if self.activity.is_visible() {
            self.page_switcher.switch_to(index);
        } else {
            tracing::debug!(page = index, "switching hidden view without transition");
            self.page_switcher.set_current(index);
        }
    }

    fn on_switch_done(&mut self, index: usize) {
        tracing::debug!(page = index, title = ?self.page_title(index), "symbol page selected");
        self.update_region();
        self.emit(SymbolViewEvent::UpdateReactionMap);
    }

    // ========================================================================
    // Content
    // ========================================================================

    pub fn current_layout(&self) -> &str {
        &self.current_layout
    }

    /// Loads the pages of `layout`. Ignored if it is already current.
    pub fn set_layout(&mut self, layout: &str) {
        if layout != self.current_layout {
            self.current_layout = layout.to_string();
            self.reload_content();
        }
    }

    pub fn keyboard_state(&self) -> HandlerState {
        self.keyboard_state
    }

    /// Switches between on-screen and hardware keyboard content.
    pub fn set_keyboard_state(&mut self, state: HandlerState) {
        if state != self.keyboard_state {
            self.keyboard_state = state;
            self.reload_content();
        }
    }

    /// The hardware keyboard layout changed; reloads only in hardware state.
    pub fn handle_hw_layout_change(&mut self) {
        if self.keyboard_state == HandlerState::Hardware {
            self.reload_content();
        }
    }

    /// Hides the view while the scene rotates, keeping the reopen intent.
    pub fn prepare_to_orientation_change(&mut self) {
        match self.activity {
            Activity::Active => self.hide(HideMode::Temporary),
            Activity::TemporarilyActive => self.hide(HideMode::Normal),
            Activity::Inactive | Activity::TemporarilyInactive => {}
        }
    }

    /// Rebuilds content for the new geometry and reopens the view if it was
    /// hidden by [`prepare_to_orientation_change`](Self::prepare_to_orientation_change).
    pub fn finalize_orientation_change(&mut self) {
        self.organize_content();
        if self.activity == Activity::TemporarilyInactive {
            self.show(ShowMode::Normal);
        }
    }

    /// Makes pages, position and size match the current scene.
    fn organize_content(&mut self) {
        if self.scene.orientation() != self.current_orientation || self.reload_pending {
            self.reload_content();
        }
        let width = self.scene.scene_rect().width;
        for page in self.page_switcher.pages_mut() {
            page.resize(width);
        }
        self.reposition();
        self.update_region();
    }

    /// Rebuilds every page, keeping the selected page when still in range.
    fn reload_content(&mut self) {
        if self.anim.has_ongoing_animations() {
            tracing::debug!("slide animation running, deferring content reload");
            self.reload_pending = true;
            return;
        }
        self.reload_pending = false;
        self.current_orientation = self.scene.orientation();

        let sections = self.layouts.symbol_sections(
            &self.current_layout,
            self.current_orientation,
            self.keyboard_state,
        );
        let selected = self.page_switcher.current().unwrap_or(0);
        self.load_switcher_pages(sections, selected);
        tracing::info!(
            layout = %self.current_layout,
            orientation = ?self.current_orientation,
            state = ?self.keyboard_state,
            pages = self.page_count(),
            current = ?self.current_page(),
            "symbol view content reloaded"
        );

        if self.page_switcher.is_empty() && self.activity != Activity::Inactive {
            let was_visible = self.activity.is_visible();
            self.activity = Activity::Inactive;
            self.anim.reset();
            if was_visible {
                self.emit(SymbolViewEvent::AboutToHide);
                self.emit(SymbolViewEvent::Hidden);
            }
        }

        self.reposition();
        self.update_region();
        self.emit(SymbolViewEvent::UpdateReactionMap);
    }

    fn load_switcher_pages(&mut self, sections: Vec<SharedLayoutSection>, select: usize) {
        self.page_switcher.clear();
        self.pointer_down = false;

        let width = self.scene.scene_rect().width;
        let level = self.current_level();
        for section in sections {
            self.add_page(section, width, level);
        }
        if let Some(last) = self.page_switcher.count().checked_sub(1) {
            self.page_switcher.set_current(select.min(last));
        }
    }

    fn add_page(&mut self, section: SharedLayoutSection, width: f32, level: u8) {
        let mut page = KeyArea::new(section, &self.settings);
        page.resize(width);
        page.switch_level(level);
        self.event_handler.add_event_source(&mut page);
        self.page_switcher.add(page);
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    fn panel_height(&self) -> f32 {
        self.page_switcher
            .pages()
            .iter()
            .map(KeyArea::preferred_height)
            .fold(0.0, f32::max)
    }

    fn reposition(&mut self) {
        let scene = self.scene.scene_rect();
        let height = self.panel_height();
        self.anim.update_pos(scene.bottom() - height, scene.bottom());
    }

    /// Where the panel is drawn right now, including animation.
    pub fn rendered_rect(&self) -> Rect {
        let scene = self.scene.scene_rect();
        Rect::new(scene.x, self.anim.position(), scene.width, self.panel_height())
    }

    /// Area of the scene currently occupied by the view. Empty while hidden.
    pub fn interactive_region(&self) -> Region {
        if !self.activity.is_visible() || self.page_switcher.is_empty() {
            return Region::new();
        }
        self.rendered_rect()
            .intersection(&self.scene.scene_rect())
            .map(Region::from_rect)
            .unwrap_or_default()
    }

    fn update_region(&mut self) {
        let region = self.interactive_region();
        if region != self.last_region {
            self.last_region = region.clone();
            self.emit(SymbolViewEvent::RegionUpdated(region));
        }
    }

    /// Paints the view's area as inactive and its keys as press areas.
    pub fn paint_reaction_map(&self, map: &mut dyn ReactionMap) {
        let region = self.interactive_region();
        if region.is_empty() {
            return;
        }
        map.set_drawing_value(ReactionValue::Inactive);
        for rect in region.rects() {
            map.fill_rect(*rect);
        }

        let Some(page) = self.page_switcher.current_page() else {
            return;
        };
        let origin = self.rendered_rect().origin();
        let scene = self.scene.scene_rect();
        map.set_drawing_value(ReactionValue::Press);
        for rect in page.key_rects() {
            if let Some(visible) = rect.translated(origin.x, origin.y).intersection(&scene) {
                map.fill_rect(visible);
            }
        }
    }

    // ========================================================================
    // Shift
    // ========================================================================

    /// 1 while shift is held on a page or the external shift state is
    /// latched or locked, 0 otherwise.
    pub fn current_level(&self) -> u8 {
        if self.event_handler.is_shift_held_down() || self.shift_state.is_active() {
            1
        } else {
            0
        }
    }

    pub fn shift_state(&self) -> ModifierState {
        self.shift_state
    }

    pub fn set_shift_state(&mut self, state: ModifierState) {
        self.shift_state = state;
        self.broadcast_level();
    }

    fn broadcast_level(&mut self) {
        let level = self.current_level();
        for page in self.page_switcher.pages_mut() {
            page.switch_level(level);
        }
        tracing::debug!(level, "level switched");
        self.emit(SymbolViewEvent::LevelSwitched(level));
    }

    // ========================================================================
    // Pointer Input
    // ========================================================================

    /// Routes a press in scene coordinates to the current page. Returns
    /// `false` when the press is not for the view.
    pub fn pointer_press(&mut self, point: Point) -> bool {
        let captured = self.activity == Activity::TemporarilyActive;
        if !captured && !self.interactive_region().contains(point) {
            return false;
        }
        let local = point.relative_to(self.rendered_rect().origin());
        let Some(page) = self.page_switcher.current_page_mut() else {
            return false;
        };
        page.pointer_press(local);
        self.pointer_down = true;
        self.pump();
        true
    }

    pub fn pointer_move(&mut self, point: Point) -> bool {
        if !self.pointer_down {
            // In follow mode the pointer went down before the view opened.
            return self.activity == Activity::TemporarilyActive && self.pointer_press(point);
        }
        let local = point.relative_to(self.rendered_rect().origin());
        if let Some(page) = self.page_switcher.current_page_mut() {
            page.pointer_move(local);
        }
        self.pump();
        true
    }

    /// Releases the pointer. Ends follow mode, hiding the view.
    pub fn pointer_release(&mut self, point: Point) -> bool {
        let follow = self.activity == Activity::TemporarilyActive;
        if !self.pointer_down && !follow {
            return false;
        }
        if self.pointer_down {
            let local = point.relative_to(self.rendered_rect().origin());
            if let Some(page) = self.page_switcher.current_page_mut() {
                page.pointer_release(local);
            }
            self.pointer_down = false;
            self.pump();
        }
        if follow {
            self.hide(HideMode::Normal);
        }
        true
    }

    fn cancel_touches(&mut self) {
        for page in self.page_switcher.pages_mut() {
            page.cancel_long_press();
            page.reset_active_keys();
        }
        self.pointer_down = false;
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Steps the slide animation, the page switch and long press timers.
    pub fn advance(&mut self, dt: Duration) {
        if let Some(outcome) = self.anim.advance(dt) {
            self.on_animation_finished(outcome);
        }
        if let Some(index) = self.page_switcher.advance(dt) {
            self.on_switch_done(index);
        }
        for page in self.page_switcher.pages_mut() {
            page.advance(dt);
        }
        self.pump();
    }

    fn on_animation_finished(&mut self, outcome: AnimationOutcome) {
        match outcome {
            AnimationOutcome::Shown => {
                tracing::debug!("symbol view opened");
                self.emit(SymbolViewEvent::Opened);
            }
            AnimationOutcome::Hidden => {
                tracing::debug!("symbol view hidden");
                self.emit(SymbolViewEvent::Hidden);
            }
        }
        if self.reload_pending {
            self.reload_content();
        }
        self.update_region();
        self.emit(SymbolViewEvent::UpdateReactionMap);
    }

    /// Forwards everything the translator produced since the last call.
    fn pump(&mut self) {
        self.event_handler.process_pending();
        for event in drain(&mut self.translated) {
            match event {
                KeyboardEvent::KeyPressed(e) => self.emit(SymbolViewEvent::KeyPressed(e)),
                KeyboardEvent::KeyReleased(e) => self.emit(SymbolViewEvent::KeyReleased(e)),
                KeyboardEvent::KeyClicked(e) => self.emit(SymbolViewEvent::KeyClicked(e)),
                KeyboardEvent::LongKeyPressed(e) => self.emit(SymbolViewEvent::LongKeyPressed(e)),
                KeyboardEvent::ShiftPressed(held) => {
                    self.emit(SymbolViewEvent::ShiftPressed(held));
                    self.broadcast_level();
                }
            }
        }
    }

    fn emit(&mut self, event: SymbolViewEvent) {
        tracing::trace!(?event, "symbol view event");
        self.events.emit(event);
    }
}
