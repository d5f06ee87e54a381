use std::path::PathBuf;

use thiserror::Error;

use crate::shared::bounding_box::BoundingBox;

#[derive(Error, Debug)]
pub enum PersonaError {
    #[error(
        "face region {region:?} is empty or outside the {frame_width}x{frame_height} frame"
    )]
    InvalidRegion {
        region: BoundingBox,
        frame_width: u32,
        frame_height: u32,
    },
    #[error("face locator unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("could not open video source {path}: {reason}")]
    SourceOpen { path: PathBuf, reason: String },
    #[error("invalid sampling options: {0}")]
    InvalidSampling(&'static str),
    #[error("failed to read settings from {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings in {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
