// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline settings.
//!
//! Settings are stored as RON. Every field has a default, so a partial file
//! (or an empty `()`) is a valid settings file.

use crate::timeline::PoseMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Tunables for a camera timeline session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Per-axis bound used by offset editing widgets
    pub offset_range: f32,
    /// How the playback pose is composed
    pub pose_mode: PoseMode,
    /// Multiplier applied to each tick's delta time. Negative reads as 0,
    /// non-finite as 1.
    pub time_scale: f32,
    /// Allow seeking while playing
    pub scrub_during_playback: bool,
    /// Maximum undo entries kept
    pub history_depth: usize,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            offset_range: 5.0,
            pose_mode: PoseMode::OffsetSum,
            time_scale: 1.0,
            scrub_during_playback: false,
            history_depth: 100,
        }
    }
}

impl TimelineSettings {
    /// Parse settings from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(text)?)
    }

    /// Serialize settings to pretty RON
    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_ron_str(&text)?;
        tracing::info!("Loaded timeline settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron_string()?)?;
        tracing::info!("Saved timeline settings to {:?}", path);
        Ok(())
    }

    /// Inclusive slider range for offset components.
    ///
    /// A non-finite `offset_range` falls back to the default.
    pub fn offset_bounds(&self) -> std::ops::RangeInclusive<f32> {
        let range = if self.offset_range.is_finite() {
            self.offset_range.abs()
        } else {
            Self::default().offset_range
        };
        -range..=range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TimelineSettings::default();
        assert_eq!(settings.offset_range, 5.0);
        assert_eq!(settings.pose_mode, PoseMode::OffsetSum);
        assert_eq!(settings.time_scale, 1.0);
        assert!(!settings.scrub_during_playback);
        assert_eq!(settings.offset_bounds(), -5.0..=5.0);
    }

    #[test]
    fn test_offset_bounds_sanitized() {
        let negative = TimelineSettings { offset_range: -2.0, ..TimelineSettings::default() };
        assert_eq!(negative.offset_bounds(), -2.0..=2.0);
        let nan = TimelineSettings { offset_range: f32::NAN, ..TimelineSettings::default() };
        assert_eq!(nan.offset_bounds(), -5.0..=5.0);
    }

    #[test]
    fn test_serialization() {
        let settings = TimelineSettings {
            pose_mode: PoseMode::EasedOffset,
            time_scale: 0.5,
            ..TimelineSettings::default()
        };
        let text = settings.to_ron_string().unwrap();
        let loaded = TimelineSettings::from_ron_str(&text).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings = TimelineSettings::from_ron_str("(offset_range: 2.0)").unwrap();
        assert_eq!(settings.offset_range, 2.0);
        assert_eq!(settings.history_depth, 100);
    }

    #[test]
    fn test_parse_error() {
        let err = TimelineSettings::from_ron_str("(offset_range: \"wide\")").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = TimelineSettings::load(Path::new("/nonexistent/camtrack.ron")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
