// SPDX-License-Identifier: GPL-3.0-only

//! Symbol layout model and loading.
//!
//! Symbol layouts describe the pages of the symbol view: each page is a
//! section of rows of keys. Layouts are JSON documents with a landscape
//! page list, an optional portrait list and an optional hardware-keyboard
//! variant:
//!
//! ```json
//! {
//!     "name": "en_us",
//!     "landscape": [
//!         { "name": "sym1", "title": "1/2", "rows": [
//!             { "keys": [ { "label": "1" }, { "label": "2" } ] },
//!             { "keys": [ { "label": "shift", "kind": "shift", "width": 1.5 } ] }
//!         ] }
//!     ],
//!     "portrait": [ ... ],
//!     "hardware": { "landscape": [ ... ] }
//! }
//! ```
//!
//! Loading is permissive: empty rows and sections are skipped and invalid
//! key widths are repaired, each reported as a [`LayoutWarning`]. Unreadable
//! files, malformed JSON and layouts with no landscape pages are errors.
//!
//! ```rust,ignore
//! use symboard::layout::{LayoutsManager, LayoutsProvider, Orientation, HandlerState};
//!
//! let layouts = LayoutsManager::new();
//! let (name, warnings) = layouts.load_file("symbols/en_us.json")?;
//! let pages = layouts.symbol_sections(&name, Orientation::Landscape, HandlerState::OnScreen);
//! ```

pub mod manager;
pub mod parser;
pub mod types;
pub mod validation;

pub use manager::{LayoutsManager, LayoutsProvider};
pub use parser::{parse_layout_file, parse_layout_from_string};
pub use types::{
    HandlerState, KeyKind, KeyModel, LayoutError, LayoutSection, LayoutWarning, Orientation,
    ParseResult, SectionRow, SectionSet, SharedLayoutSection, SymbolLayout,
};
