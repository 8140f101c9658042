// SPDX-License-Identifier: GPL-3.0-only

//! Loading symbol layouts from JSON.

use std::fs;
use std::path::Path;

use crate::layout::types::{LayoutError, ParseResult, SymbolLayout};
use crate::layout::validation::validate_layout;

/// Parses a symbol layout from a JSON file.
///
/// I/O errors and JSON errors are fatal; repairable problems are returned
/// as warnings next to the layout.
pub fn parse_layout_file(path: impl AsRef<Path>) -> Result<ParseResult<SymbolLayout>, LayoutError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LayoutError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let layout: SymbolLayout =
        serde_json::from_str(&json).map_err(|e| LayoutError::json(e, Some(path.to_path_buf())))?;

    validate_layout(layout)
}

/// Parses a symbol layout from a JSON string.
pub fn parse_layout_from_string(json: &str) -> Result<ParseResult<SymbolLayout>, LayoutError> {
    let layout: SymbolLayout = serde_json::from_str(json).map_err(|e| LayoutError::json(e, None))?;

    validate_layout(layout)
}
