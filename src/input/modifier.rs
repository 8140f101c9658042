// SPDX-License-Identifier: GPL-3.0-only

//! Shift state of the keyboard.
//!
//! The on-screen keyboard owns the shift state machine; the symbol view only
//! receives the result through `set_shift_state` and maps it to a level.

use serde::{Deserialize, Serialize};

/// State of the shift modifier.
///
/// - **Off**: lower level
/// - **Latched**: upper level until the next character is typed
/// - **Locked**: upper level until shift is tapped again
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierState {
    #[default]
    Off,
    Latched,
    Locked,
}

impl ModifierState {
    /// Key level selected by this state: 0 for `Off`, 1 otherwise.
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            ModifierState::Off => 0,
            ModifierState::Latched | ModifierState::Locked => 1,
        }
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        self != ModifierState::Off
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(ModifierState::Off.level(), 0);
        assert_eq!(ModifierState::Latched.level(), 1);
        assert_eq!(ModifierState::Locked.level(), 1);
        assert!(!ModifierState::default().is_active());
    }

    #[test]
    fn test_deserialize_names() {
        let state: ModifierState = serde_json::from_str("\"locked\"").unwrap();
        assert_eq!(state, ModifierState::Locked);
    }
}
