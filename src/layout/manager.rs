// SPDX-License-Identifier: GPL-3.0-only

//! Page content provider for the symbol view.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use crate::layout::parser::{parse_layout_file, parse_layout_from_string};
use crate::layout::types::{
    HandlerState, LayoutError, LayoutWarning, Orientation, SharedLayoutSection, SymbolLayout,
};

/// Supplies the symbol pages the symbol view is built from.
pub trait LayoutsProvider {
    /// Pages for `layout` in the given orientation and keyboard state.
    ///
    /// Unknown layouts yield no pages.
    fn symbol_sections(
        &self,
        layout: &str,
        orientation: Orientation,
        state: HandlerState,
    ) -> Vec<SharedLayoutSection>;
}

/// In-memory store of symbol layouts loaded from JSON.
///
/// While a hardware keyboard is active, the layout selected with
/// [`LayoutsManager::set_hardware_layout`] replaces the requested one.
#[derive(Debug, Default)]
pub struct LayoutsManager {
    layouts: RefCell<HashMap<String, Rc<SymbolLayout>>>,
    hardware_layout: RefCell<Option<String>>,
}

impl LayoutsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a layout under its own name.
    pub fn insert(&self, layout: SymbolLayout) {
        tracing::debug!(layout = %layout.name, "registering symbol layout");
        self.layouts
            .borrow_mut()
            .insert(layout.name.clone(), Rc::new(layout));
    }

    /// Parses and registers a layout, returning its name and warnings.
    pub fn load_str(&self, json: &str) -> Result<(String, Vec<LayoutWarning>), LayoutError> {
        let result = parse_layout_from_string(json)?;
        Ok(self.register(result.layout, result.warnings))
    }

    /// Reads, parses and registers a layout file.
    pub fn load_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(String, Vec<LayoutWarning>), LayoutError> {
        let result = parse_layout_file(path)?;
        Ok(self.register(result.layout, result.warnings))
    }

    fn register(&self, layout: SymbolLayout, warnings: Vec<LayoutWarning>) -> (String, Vec<LayoutWarning>) {
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        let name = layout.name.clone();
        self.insert(layout);
        (name, warnings)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layouts.borrow().contains_key(name)
    }

    pub fn layout_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.layouts.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Selects the layout used in hardware keyboard state; `None` keeps the
    /// requested layout.
    pub fn set_hardware_layout(&self, name: Option<String>) {
        *self.hardware_layout.borrow_mut() = name;
    }

    pub fn hardware_layout(&self) -> Option<String> {
        self.hardware_layout.borrow().clone()
    }
}

impl LayoutsProvider for LayoutsManager {
    fn symbol_sections(
        &self,
        layout: &str,
        orientation: Orientation,
        state: HandlerState,
    ) -> Vec<SharedLayoutSection> {
        let hardware = self.hardware_layout.borrow();
        let name = match (state, hardware.as_deref()) {
            (HandlerState::Hardware, Some(hw)) => hw,
            _ => layout,
        };

        match self.layouts.borrow().get(name) {
            Some(found) => found.sections(orientation, state).to_vec(),
            None => {
                tracing::debug!(layout = %name, "no symbol layout registered");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EN: &str = r#"{ "name": "en", "landscape": [
        { "name": "a", "rows": [ { "keys": [ { "label": "1" } ] } ] },
        { "name": "b", "rows": [ { "keys": [ { "label": "2" } ] } ] }
    ] }"#;

    const HW: &str = r#"{ "name": "hw-fi", "landscape": [
        { "name": "plain", "rows": [ { "keys": [ { "label": "x" } ] } ] }
    ], "hardware": { "landscape": [
        { "name": "hw", "rows": [ { "keys": [ { "label": "§" } ] } ] }
    ] } }"#;

    /// Test 1: Registered layouts are served by name.
    #[test]
    fn test_symbol_sections_by_name() {
        let manager = LayoutsManager::new();
        let (name, warnings) = manager.load_str(EN).unwrap();
        assert_eq!(name, "en");
        assert!(warnings.is_empty());

        let pages = manager.symbol_sections("en", Orientation::Landscape, HandlerState::OnScreen);
        assert_eq!(pages.len(), 2);
        assert!(
            manager
                .symbol_sections("missing", Orientation::Landscape, HandlerState::OnScreen)
                .is_empty(),
            "Unknown layouts should produce no pages"
        );
    }

    /// Test 2: Hardware state switches to the hardware layout and variant.
    #[test]
    fn test_hardware_layout_replaces_requested_layout() {
        let manager = LayoutsManager::new();
        manager.load_str(EN).unwrap();
        manager.load_str(HW).unwrap();

        let pages = manager.symbol_sections("en", Orientation::Landscape, HandlerState::Hardware);
        assert_eq!(pages.len(), 2, "Without a hardware layout the requested one is used");

        manager.set_hardware_layout(Some("hw-fi".to_string()));
        let pages = manager.symbol_sections("en", Orientation::Landscape, HandlerState::Hardware);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "hw");

        let pages = manager.symbol_sections("en", Orientation::Landscape, HandlerState::OnScreen);
        assert_eq!(pages.len(), 2, "On-screen state ignores the hardware layout");
    }

    /// Test 3: Layout names are listed in order.
    #[test]
    fn test_layout_names() {
        let manager = LayoutsManager::new();
        manager.load_str(HW).unwrap();
        manager.load_str(EN).unwrap();
        assert_eq!(manager.layout_names(), vec!["en", "hw-fi"]);
        assert!(manager.contains("en"));
    }
}
