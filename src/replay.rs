// SPDX-License-Identifier: GPL-3.0-only

//! Scripted replay of host interactions against a [`SymbolView`].
//!
//! A script is a JSON document describing the screen and a list of steps:
//!
//! ```json
//! {
//!     "layout": "en_us",
//!     "screen": { "width": 854, "height": 480 },
//!     "steps": [
//!         { "action": "show" },
//!         { "action": "advance", "ms": 300 },
//!         { "action": "press", "x": 40, "y": 400 },
//!         { "action": "release", "x": 40, "y": 400 },
//!         { "action": "rotate", "orientation": "portrait" }
//!     ]
//! }
//! ```
//!
//! Advancing time is split into frames of
//! [`FRAME_INTERVAL_MS`](crate::app_settings::FRAME_INTERVAL_MS), the way a
//! host's frame clock would drive the view.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use futures::channel::mpsc::UnboundedReceiver;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_settings::FRAME_INTERVAL_MS;
use crate::config::Settings;
use crate::geometry::Point;
use crate::input::{KeyEvent, ModifierState};
use crate::layout::{HandlerState, LayoutsProvider, Orientation};
use crate::scene::Screen;
use crate::signal::drain;
use crate::symbol_view::{HideMode, ShowMode, SymbolView, SymbolViewEvent};

/// Error returned when a script cannot be read or parsed.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read script '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid script '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Landscape screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 854.0,
            height: 480.0,
        }
    }
}

/// One host interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Show {
        #[serde(default)]
        mode: ShowMode,
    },
    Hide {
        #[serde(default)]
        mode: HideMode,
    },
    SetTemporarilyHidden {
        hidden: bool,
    },
    Press {
        x: f32,
        y: f32,
    },
    Move {
        x: f32,
        y: f32,
    },
    Release {
        x: f32,
        y: f32,
    },
    Advance {
        ms: u64,
    },
    NextPage,
    PrevPage,
    /// Prepares, rotates the screen and finalizes in one step.
    Rotate {
        orientation: Orientation,
    },
    Layout {
        name: String,
    },
    KeyboardState {
        state: HandlerState,
    },
    HwLayoutChanged,
    Shift {
        state: ModifierState,
    },
    IgnoreNextShiftClick,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Layout shown first; the binary falls back to the first loaded one
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub screen: ScreenSize,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json).map_err(|source| ReplayError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// An event together with the index of the step that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub step: usize,
    pub event: SymbolViewEvent,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>3}] ", self.step)?;
        match &self.event {
            SymbolViewEvent::KeyPressed(key) => write_key(f, "key_pressed", key),
            SymbolViewEvent::KeyReleased(key) => write_key(f, "key_released", key),
            SymbolViewEvent::KeyClicked(key) => write_key(f, "key_clicked", key),
            SymbolViewEvent::LongKeyPressed(key) => write_key(f, "long_key_pressed", key),
            SymbolViewEvent::ShiftPressed(held) => write!(f, "shift_pressed {held}"),
            SymbolViewEvent::LevelSwitched(level) => write!(f, "level_switched {level}"),
            SymbolViewEvent::RegionUpdated(region) => match region.bounding_rect() {
                Some(r) => write!(f, "region_updated {}x{}+{}+{}", r.width, r.height, r.x, r.y),
                None => write!(f, "region_updated empty"),
            },
            SymbolViewEvent::AboutToOpen => write!(f, "about_to_open"),
            SymbolViewEvent::Opened => write!(f, "opened"),
            SymbolViewEvent::AboutToHide => write!(f, "about_to_hide"),
            SymbolViewEvent::Hidden => write!(f, "hidden"),
            SymbolViewEvent::UpdateReactionMap => write!(f, "update_reaction_map"),
        }
    }
}

fn write_key(f: &mut fmt::Formatter<'_>, name: &str, key: &KeyEvent) -> fmt::Result {
    write!(f, "{name} {:?} level={}", key.text, key.level)?;
    if key.drag_continuation {
        write!(f, " drag")?;
    }
    Ok(())
}

/// A symbol view on a rotatable screen, driven step by step.
#[derive(Debug)]
pub struct Replay {
    view: SymbolView,
    screen: Rc<Screen>,
    events: UnboundedReceiver<SymbolViewEvent>,
}

impl Replay {
    pub fn new(
        layouts: Rc<dyn LayoutsProvider>,
        settings: Settings,
        layout: &str,
        screen: ScreenSize,
    ) -> Self {
        let screen = Rc::new(Screen::new(screen.width, screen.height));
        let mut view = SymbolView::new(layouts, screen.clone(), settings, layout);
        let events = view.subscribe();
        Self {
            view,
            screen,
            events,
        }
    }

    pub fn view(&self) -> &SymbolView {
        &self.view
    }

    /// Runs every step, returning the emitted events in order.
    pub fn run(&mut self, steps: &[Step]) -> Vec<Record> {
        steps
            .iter()
            .enumerate()
            .flat_map(|(index, step)| {
                self.step(step)
                    .into_iter()
                    .map(move |event| Record { step: index, event })
            })
            .collect()
    }

    /// Applies one step and returns the events it produced.
    pub fn step(&mut self, step: &Step) -> Vec<SymbolViewEvent> {
        tracing::debug!(?step, "replaying step");
        match step {
            Step::Show { mode } => self.view.show(*mode),
            Step::Hide { mode } => self.view.hide(*mode),
            Step::SetTemporarilyHidden { hidden } => self.view.set_temporarily_hidden(*hidden),
            Step::Press { x, y } => {
                if !self.view.pointer_press(Point::new(*x, *y)) {
                    tracing::debug!(x, y, "press outside the symbol view");
                }
            }
            Step::Move { x, y } => {
                self.view.pointer_move(Point::new(*x, *y));
            }
            Step::Release { x, y } => {
                self.view.pointer_release(Point::new(*x, *y));
            }
            Step::Advance { ms } => self.advance(*ms),
            Step::NextPage => self.view.switch_to_next_page(),
            Step::PrevPage => self.view.switch_to_prev_page(),
            Step::Rotate { orientation } => {
                self.view.prepare_to_orientation_change();
                self.screen.set_orientation(*orientation);
                self.view.finalize_orientation_change();
            }
            Step::Layout { name } => self.view.set_layout(name),
            Step::KeyboardState { state } => self.view.set_keyboard_state(*state),
            Step::HwLayoutChanged => self.view.handle_hw_layout_change(),
            Step::Shift { state } => self.view.set_shift_state(*state),
            Step::IgnoreNextShiftClick => self.view.key_event_handler_mut().ignore_next_shift_click(),
        }
        drain(&mut self.events)
    }

    fn advance(&mut self, ms: u64) {
        let mut remaining = ms;
        while remaining > 0 {
            let frame = remaining.min(FRAME_INTERVAL_MS);
            self.view.advance(Duration::from_millis(frame));
            remaining -= frame;
        }
    }
}
