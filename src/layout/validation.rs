// SPDX-License-Identifier: GPL-3.0-only

//! Permissive validation for symbol layouts.
//!
//! Problems that can be repaired are repaired and reported as warnings:
//! keys with a non-positive width get the standard width, empty rows and
//! sections are dropped. A layout left without any page for its on-screen
//! landscape variant is rejected.

use std::rc::Rc;

use crate::layout::types::{
    LayoutError, LayoutWarning, ParseResult, SectionSet, SharedLayoutSection, SymbolLayout,
};

/// Validates a layout, returning it with the warnings collected on the way.
pub fn validate_layout(mut layout: SymbolLayout) -> Result<ParseResult<SymbolLayout>, LayoutError> {
    let mut warnings = Vec::new();

    if layout.name.is_empty() {
        warnings.push(LayoutWarning::new("name", "Layout name is empty"));
    }

    validate_section_set(&mut layout.onscreen, "", &mut warnings);
    if let Some(hardware) = layout.hardware.as_mut() {
        validate_section_set(hardware, "hardware.", &mut warnings);
    }

    if layout.onscreen.landscape.is_empty() {
        return Err(LayoutError::NoPages { name: layout.name });
    }

    Ok(ParseResult::with_warnings(layout, warnings))
}

fn validate_section_set(set: &mut SectionSet, prefix: &str, warnings: &mut Vec<LayoutWarning>) {
    validate_sections(&mut set.landscape, &format!("{prefix}landscape"), warnings);

    if let Some(portrait) = set.portrait.as_mut() {
        validate_sections(portrait, &format!("{prefix}portrait"), warnings);
        if portrait.is_empty() {
            warnings.push(LayoutWarning::new(
                format!("{prefix}portrait"),
                "No usable portrait pages, landscape pages will be used",
            ));
            set.portrait = None;
        }
    }
}

fn validate_sections(
    sections: &mut Vec<SharedLayoutSection>,
    path: &str,
    warnings: &mut Vec<LayoutWarning>,
) {
    let mut index = 0;
    sections.retain_mut(|section| {
        let section_path = format!("{path}[{index}]");
        index += 1;

        let section = Rc::make_mut(section);
        let mut row_index = 0;
        section.rows.retain_mut(|row| {
            let row_path = format!("{section_path}.rows[{row_index}]");
            row_index += 1;

            for (key_index, key) in row.keys.iter_mut().enumerate() {
                if !(key.width > 0.0) {
                    warnings.push(LayoutWarning::new(
                        format!("{row_path}.keys[{key_index}].width"),
                        format!("Invalid key width {}, using 1.0", key.width),
                    ));
                    key.width = 1.0;
                }
            }

            if row.keys.is_empty() {
                warnings.push(LayoutWarning::new(row_path, "Empty row skipped"));
                return false;
            }
            true
        });

        if section.rows.is_empty() {
            tracing::warn!(section = %section.name, "skipping symbol section without keys");
            warnings.push(LayoutWarning::new(
                section_path,
                format!("Section '{}' has no keys and was skipped", section.name),
            ));
            return false;
        }
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{KeyModel, LayoutSection, SectionRow};

    fn section(name: &str, rows: Vec<Vec<KeyModel>>) -> SharedLayoutSection {
        Rc::new(LayoutSection {
            name: name.to_string(),
            title: None,
            rows: rows.into_iter().map(|keys| SectionRow { keys }).collect(),
        })
    }

    fn layout(landscape: Vec<SharedLayoutSection>) -> SymbolLayout {
        SymbolLayout {
            name: "test".to_string(),
            onscreen: SectionSet {
                landscape,
                portrait: None,
            },
            hardware: None,
        }
    }

    /// Test 1: A clean layout passes without warnings.
    #[test]
    fn test_valid_layout_has_no_warnings() {
        let result =
            validate_layout(layout(vec![section("sym1", vec![vec![KeyModel::new("!")]])])).unwrap();
        assert!(!result.has_warnings());
        assert_eq!(result.layout.onscreen.landscape.len(), 1);
    }

    /// Test 2: Empty rows and sections are dropped with warnings.
    #[test]
    fn test_empty_sections_are_skipped() {
        let result = validate_layout(layout(vec![
            section("empty", vec![vec![]]),
            section("sym", vec![vec![], vec![KeyModel::new("@")]]),
        ]))
        .unwrap();

        let pages = &result.layout.onscreen.landscape;
        assert_eq!(pages.len(), 1, "Empty section should be skipped");
        assert_eq!(pages[0].name, "sym");
        assert_eq!(pages[0].row_count(), 1, "Empty row should be skipped");
        assert_eq!(result.warnings.len(), 3);
        assert!(result.warnings[0].field_path.starts_with("landscape[0]"));
    }

    /// Test 3: Non-positive widths are repaired.
    #[test]
    fn test_invalid_width_is_repaired() {
        let mut key = KeyModel::new("#");
        key.width = -2.0;
        let result = validate_layout(layout(vec![section("sym", vec![vec![key]])])).unwrap();

        assert_eq!(result.layout.onscreen.landscape[0].rows[0].keys[0].width, 1.0);
        assert_eq!(
            result.warnings[0].field_path,
            "landscape[0].rows[0].keys[0].width"
        );
    }

    /// Test 4: A layout with no pages at all is an error.
    #[test]
    fn test_layout_without_pages_is_rejected() {
        let err = validate_layout(layout(vec![section("empty", vec![])])).unwrap_err();
        assert!(matches!(err, LayoutError::NoPages { .. }));
    }
}
