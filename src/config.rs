// SPDX-License-Identifier: GPL-3.0-only

//! Runtime settings for the symbol view and its key areas.
//!
//! Settings are plain JSON. Every field is optional; missing fields take
//! the defaults from [`crate::app_settings`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_settings;

/// Error returned when a settings file cannot be read or parsed.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Tunables for animations, long press detection and page geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Slide-in duration of the symbol view.
    pub show_duration_ms: u64,
    /// Slide-out duration of the symbol view.
    pub hide_duration_ms: u64,
    /// Duration of a page switch transition.
    pub page_switch_duration_ms: u64,
    /// Hold time before a long press notification fires.
    pub long_press_threshold_ms: u64,
    /// Height of one key row in pixels.
    pub row_height: f32,
    /// Padding above and below the rows of a page.
    pub page_padding: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_duration_ms: app_settings::SHOW_ANIMATION_DURATION_MS,
            hide_duration_ms: app_settings::HIDE_ANIMATION_DURATION_MS,
            page_switch_duration_ms: app_settings::PAGE_SWITCH_DURATION_MS,
            long_press_threshold_ms: app_settings::LONG_PRESS_THRESHOLD_MS,
            row_height: app_settings::DEFAULT_ROW_HEIGHT,
            page_padding: app_settings::DEFAULT_PAGE_PADDING,
        }
    }
}

impl Settings {
    /// Parses settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads settings from a JSON file, falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    pub fn show_duration(&self) -> Duration {
        Duration::from_millis(self.show_duration_ms)
    }

    pub fn hide_duration(&self) -> Duration {
        Duration::from_millis(self.hide_duration_ms)
    }

    pub fn page_switch_duration(&self) -> Duration {
        Duration::from_millis(self.page_switch_duration_ms)
    }

    pub fn long_press_threshold(&self) -> Duration {
        Duration::from_millis(self.long_press_threshold_ms)
    }
}
