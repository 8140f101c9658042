// SPDX-License-Identifier: GPL-3.0-only

//! Symboard - the symbol view of an on-screen keyboard
//!
//! This crate provides the overlay panel that slides up over the main
//! keyboard to offer pages of symbols, together with the input translation
//! that turns touches on its keys into semantic key events.
//!
//! # Architecture
//!
//! Input flows from pages to listeners:
//!
//! 1. **Pages** ([`input::KeyArea`]): hit-test pointer input and raise raw
//!    press, release, click and long-press notifications.
//! 2. **Translator** ([`input::KeyEventHandler`]): fans in the notifications
//!    of every page and emits [`input::KeyEvent`]s, tracking shift.
//! 3. **Symbol view** ([`symbol_view::SymbolView`]): owns the pages, the
//!    translator and the slide animation, and re-emits key events together
//!    with its own lifecycle events.
//!
//! Page content comes from a [`layout::LayoutsProvider`], orientation and
//! scene size from a [`scene::SceneSource`]. Time only advances through
//! `advance(dt)` calls made by the host.
//!
//! # Modules
//!
//! - `app_settings`: Centralized constants (durations, geometry, logging)
//! - `config`: Runtime settings loaded from JSON
//! - `geometry`: Points, rectangles and regions
//! - `input`: Key areas, key events and their translation
//! - `layout`: Symbol layout model, loading and the layouts provider
//! - `replay`: Scripted host interactions for the replay binary
//! - `scene`: Orientation and scene size source
//! - `signal`: Channel-based event broadcast
//! - `symbol_view`: The overlay panel controller

pub mod app_settings;
pub mod config;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod replay;
pub mod scene;
pub mod signal;
pub mod symbol_view;

pub use symbol_view::{SymbolView, SymbolViewEvent};

// ============================================================================
// Integration Tests
// ============================================================================
