// SPDX-License-Identifier: GPL-3.0-only

//! Centralized constants and defaults.

/// Default duration of the symbol view slide-in animation in milliseconds.
pub const SHOW_ANIMATION_DURATION_MS: u64 = 250;

/// Default duration of the symbol view slide-out animation in milliseconds.
pub const HIDE_ANIMATION_DURATION_MS: u64 = 250;

/// Default duration of a horizontal page switch in milliseconds.
pub const PAGE_SWITCH_DURATION_MS: u64 = 250;

/// Long press detection threshold in milliseconds.
///
/// A key held longer than this without being released or left triggers a
/// long press notification.
pub const LONG_PRESS_THRESHOLD_MS: u64 = 300;

/// Frame interval the replay tool advances the clock by, in milliseconds.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Default height of one key row in pixels.
pub const DEFAULT_ROW_HEIGHT: f32 = 60.0;

/// Default vertical padding around a page of keys in pixels.
pub const DEFAULT_PAGE_PADDING: f32 = 8.0;

/// Log filter applied when `RUST_LOG` is not set.
pub const DEFAULT_LOG_DIRECTIVE: &str = "symboard=info";
