use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classification::domain::feature_scorer::HeuristicThresholds;
use crate::pipeline::sampling_options::SamplingOptions;
use crate::shared::constants::{APP_DIR_NAME, DEFAULT_MAX_SAMPLES, DEFAULT_STRIDE_FRAMES};
use crate::shared::error::PersonaError;

pub const DEFAULT_LOCATOR_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thresholds: HeuristicThresholds,
    pub stride_frames: usize,
    pub max_samples: usize,
    pub locator_confidence: f64,
    pub fast_path: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thresholds: HeuristicThresholds::default(),
            stride_frames: DEFAULT_STRIDE_FRAMES,
            max_samples: DEFAULT_MAX_SAMPLES,
            locator_confidence: DEFAULT_LOCATOR_CONFIDENCE,
            fast_path: true,
        }
    }
}

impl Settings {
    /// `<config_dir>/PersonaDetect/settings.json`, if the platform has a config dir.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
    }

    /// Loads the per-user settings file, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            log::warn!("{e}; using default settings");
            Self::default()
        })
    }

    /// Loads an explicit settings file. Missing keys take their defaults.
    pub fn load_from(path: &Path) -> Result<Self, PersonaError> {
        let json = fs::read_to_string(path).map_err(|source| PersonaError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| PersonaError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn sampling(&self) -> Result<SamplingOptions, PersonaError> {
        SamplingOptions::new(self.stride_frames, self.max_samples)
    }
}
