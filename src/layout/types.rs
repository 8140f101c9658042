// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for symbol layouts.
//!
//! A symbol layout is a set of pages ("sections"), each made of rows of
//! keys. Layouts come in orientation variants and may carry a separate
//! variant used while a hardware keyboard is connected.

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Handling Types
// ============================================================================

/// A non-fatal issue found while loading a layout.
///
/// The loader is permissive: the offending entry is skipped or defaulted and
/// the issue is reported alongside the loaded layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutWarning {
    /// Path to the field that caused the issue (e.g. "landscape[1].rows[0]")
    pub field_path: String,
    /// Human-readable description
    pub message: String,
}

impl LayoutWarning {
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_path: field_path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[WARNING] {}: {}", self.field_path, self.message)
    }
}

/// Fatal error while loading a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error{} at line {line}: {source}", path_suffix(.path))]
    Json {
        path: Option<PathBuf>,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("layout '{name}' has no usable symbol pages")]
    NoPages { name: String },
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in file '{}'", p.display()))
        .unwrap_or_default()
}

impl LayoutError {
    pub(crate) fn json(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        Self::Json {
            line: source.line(),
            path,
            source,
        }
    }
}

/// Result of successfully loading a layout with optional warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    /// The successfully parsed layout
    pub layout: T,
    /// Non-fatal issues
    pub warnings: Vec<LayoutWarning>,
}

impl<T> ParseResult<T> {
    pub fn new(layout: T) -> Self {
        Self {
            layout,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(layout: T, warnings: Vec<LayoutWarning>) -> Self {
        Self { layout, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Consumes the result and returns the layout, discarding warnings.
    pub fn into_layout(self) -> T {
        self.layout
    }
}

// ============================================================================
// Environment Enums
// ============================================================================

/// Screen orientation as reported by the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

/// Which keyboard the user is typing with.
///
/// The symbol view shows different content for the on-screen keyboard and
/// for a connected hardware keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerState {
    #[default]
    OnScreen,
    Hardware,
}

// ============================================================================
// Layout Data Structures
// ============================================================================

/// Role of a key. Only `Shift` is interpreted by the input translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    #[default]
    Normal,
    Shift,
    Backspace,
    Space,
    Return,
    Tab,
}

fn default_key_width() -> f32 {
    1.0
}

/// A key as described by the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyModel {
    /// Label and text at level 0
    pub label: String,

    /// Label and text at level 1; falls back to `label`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shifted: Option<String>,

    #[serde(default)]
    pub kind: KeyKind,

    /// Width relative to a standard key
    #[serde(default = "default_key_width")]
    pub width: f32,

    /// Stable identifier; defaults to the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl KeyModel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            shifted: None,
            kind: KeyKind::Normal,
            width: default_key_width(),
            id: None,
        }
    }

    pub fn with_kind(mut self, kind: KeyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_shifted(mut self, shifted: impl Into<String>) -> Self {
        self.shifted = Some(shifted.into());
        self
    }

    pub fn identifier(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.label)
    }

    /// Text of the key at the given modifier level.
    pub fn label_for_level(&self, level: u8) -> &str {
        match (level, &self.shifted) {
            (0, _) | (_, None) => &self.label,
            (_, Some(shifted)) => shifted,
        }
    }
}

/// A row of keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionRow {
    pub keys: Vec<KeyModel>,
}

impl SectionRow {
    /// Sum of relative key widths.
    pub fn total_width(&self) -> f32 {
        self.keys.iter().map(|key| key.width).sum()
    }
}

/// One page of the symbol view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSection {
    /// Section name, used in warnings and logs
    pub name: String,

    /// Title shown for the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub rows: Vec<SectionRow>,
}

impl LayoutSection {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn key_count(&self) -> usize {
        self.rows.iter().map(|row| row.keys.len()).sum()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// Sections are shared between the layout store and the pages built from them.
pub type SharedLayoutSection = Rc<LayoutSection>;

/// Pages for both orientations. Portrait falls back to landscape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionSet {
    pub landscape: Vec<SharedLayoutSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<Vec<SharedLayoutSection>>,
}

impl SectionSet {
    pub fn for_orientation(&self, orientation: Orientation) -> &[SharedLayoutSection] {
        match (orientation, &self.portrait) {
            (Orientation::Portrait, Some(portrait)) => portrait,
            _ => &self.landscape,
        }
    }
}

/// A complete symbol layout document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolLayout {
    /// Layout name used by `set_layout`
    pub name: String,

    /// Pages used with the on-screen keyboard
    #[serde(flatten)]
    pub onscreen: SectionSet,

    /// Pages used while a hardware keyboard is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<SectionSet>,
}

impl SymbolLayout {
    /// Pages for the given orientation and keyboard state. The hardware
    /// variant falls back to the on-screen pages when absent.
    pub fn sections(&self, orientation: Orientation, state: HandlerState) -> &[SharedLayoutSection] {
        match (state, &self.hardware) {
            (HandlerState::Hardware, Some(hardware)) => hardware.for_orientation(orientation),
            _ => self.onscreen.for_orientation(orientation),
        }
    }
}
