//! Editor tuning knobs.

use crate::element::MIN_ELEMENT_SIZE;
use crate::history::HistoryMode;
use crate::snap::SNAP_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Editor behavior settings. Every field has a default, so partial JSON files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub history_mode: HistoryMode,
    /// Oldest entries are dropped beyond this many. `None` keeps everything.
    pub history_limit: Option<usize>,
    pub snap_threshold: f64,
    pub min_element_size: f64,
    /// Offset applied to each paste, in canvas units.
    pub paste_offset: f64,
    /// Arrow-key nudge distance, in canvas units.
    pub nudge_step: f64,
    /// Zoom bounds and step, in percent.
    pub zoom_min: u32,
    pub zoom_max: u32,
    pub zoom_step: u32,
    /// Imported images are scaled down to fit this box.
    pub image_max_width: f64,
    pub image_max_height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_mode: HistoryMode::Granular,
            history_limit: None,
            snap_threshold: SNAP_THRESHOLD,
            min_element_size: MIN_ELEMENT_SIZE,
            paste_offset: 20.0,
            nudge_step: 1.0,
            zoom_min: 50,
            zoom_max: 200,
            zoom_step: 10,
            image_max_width: 400.0,
            image_max_height: 300.0,
        }
    }
}

impl EditorConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        log::info!("Loaded editor config from {}", path.as_ref().display());
        Ok(config.validated())
    }

    /// Fix up values that would break editor invariants.
    pub fn validated(mut self) -> Self {
        self.min_element_size = self.min_element_size.max(MIN_ELEMENT_SIZE);
        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            self.snap_threshold = SNAP_THRESHOLD;
        }
        self.zoom_min = self.zoom_min.max(1);
        self.zoom_max = self.zoom_max.max(self.zoom_min);
        self.zoom_step = self.zoom_step.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"historyMode":"coalesced","pasteOffset":10}"#).unwrap();
        assert_eq!(config.history_mode, HistoryMode::Coalesced);
        assert_eq!(config.paste_offset, 10.0);
        assert_eq!(config.zoom_max, 200);
    }

    #[test]
    fn test_validated_keeps_floor() {
        let config = EditorConfig {
            min_element_size: 2.0,
            zoom_min: 300,
            zoom_max: 100,
            ..EditorConfig::default()
        }
        .validated();
        assert_eq!(config.min_element_size, MIN_ELEMENT_SIZE);
        assert_eq!(config.zoom_max, 300);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"snapThreshold": 8}}"#).unwrap();
        let config = EditorConfig::load(file.path()).unwrap();
        assert_eq!(config.snap_threshold, 8.0);

        assert!(matches!(EditorConfig::load("/nonexistent/composer.json"), Err(ConfigError::Io(_))));
    }
}
