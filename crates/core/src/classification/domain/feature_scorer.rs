use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::classification::domain::persona::FeatureSignal;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::error::PersonaError;
use crate::shared::frame::Frame;

/// Mean intensity above which the hair band reads as grey/white.
pub const DEFAULT_HAIR_BRIGHTNESS: f64 = 150.0;

/// Intensity variance above which the skin band reads as wrinkled.
pub const DEFAULT_SKIN_VARIANCE: f64 = 1000.0;

/// Width/height ratio above which a face box reads as male.
pub const DEFAULT_MALE_ASPECT_RATIO: f64 = 0.75;

/// Confidence attached to every heuristic signal, independent of the image.
pub const DEFAULT_HEURISTIC_CONFIDENCE: f64 = 0.6;

/// Hair band: top 30% of the face box.
const UPPER_BAND_END: f64 = 0.3;

/// Skin band: 30%–70% of height, 20%–80% of width.
const MID_BAND_TOP: f64 = 0.3;
const MID_BAND_BOTTOM: f64 = 0.7;
const MID_BAND_LEFT: f64 = 0.2;
const MID_BAND_RIGHT: f64 = 0.8;

/// BT.601 luma weights in 14-bit fixed point; they sum to 1 << 14.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Tunable cut-offs for the face heuristics.
///
/// All comparisons are strict (`>`), so a value exactly at a threshold does
/// not trigger it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicThresholds {
    pub hair_brightness: f64,
    pub skin_variance: f64,
    pub male_aspect_ratio: f64,
    pub confidence: f64,
}

impl Default for HeuristicThresholds {
    fn default() -> Self {
        Self {
            hair_brightness: DEFAULT_HAIR_BRIGHTNESS,
            skin_variance: DEFAULT_SKIN_VARIANCE,
            male_aspect_ratio: DEFAULT_MALE_ASPECT_RATIO,
            confidence: DEFAULT_HEURISTIC_CONFIDENCE,
        }
    }
}

/// Derives elderliness and gender signals from one face region.
///
/// Elderliness: bright hair band or a high-variance skin band.
/// Gender: a face box wider than the aspect-ratio threshold is male.
/// This is a crude heuristic and is kept deliberately simple.
#[derive(Debug, Clone, Default)]
pub struct FeatureScorer {
    thresholds: HeuristicThresholds,
}

impl FeatureScorer {
    pub fn new(thresholds: HeuristicThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &HeuristicThresholds {
        &self.thresholds
    }

    /// Scores the face inside `face`.
    ///
    /// Fails with [`PersonaError::InvalidRegion`] when the box is empty or
    /// not fully inside the frame.
    pub fn score(&self, frame: &Frame, face: &BoundingBox) -> Result<FeatureSignal, PersonaError> {
        if frame.is_empty() || !face.fits_within(frame.width(), frame.height()) {
            return Err(PersonaError::InvalidRegion {
                region: *face,
                frame_width: frame.width(),
                frame_height: frame.height(),
            });
        }

        let gray = intensity_region(frame, face);
        let upper_mean = upper_band_mean(gray.view());
        let mid_variance = mid_band_variance(gray.view());

        let bright_hair = upper_mean.is_some_and(|m| m > self.thresholds.hair_brightness);
        let textured_skin = mid_variance.is_some_and(|v| v > self.thresholds.skin_variance);
        let aspect_ratio = face.width as f64 / face.height as f64;

        log::debug!(
            "face {face:?}: hair mean {upper_mean:?}, skin variance {mid_variance:?}, aspect {aspect_ratio:.3}"
        );

        Ok(FeatureSignal {
            is_elderly: bright_hair || textured_skin,
            is_male: aspect_ratio > self.thresholds.male_aspect_ratio,
            confidence: self.thresholds.confidence,
        })
    }
}

/// Converts the boxed region to single-channel intensity, shape `[h, w]`.
fn intensity_region(frame: &Frame, face: &BoundingBox) -> Array2<f64> {
    let (x, y) = (face.x as usize, face.y as usize);
    let (w, h) = (face.width as usize, face.height as usize);
    let pixels = frame.as_ndarray();
    let roi = pixels.slice(s![y..y + h, x..x + w, ..]);
    let channels = frame.channels() as usize;

    Array2::from_shape_fn((h, w), |(row, col)| {
        if channels >= 3 {
            luma(roi[[row, col, 0]], roi[[row, col, 1]], roi[[row, col, 2]]) as f64
        } else {
            roi[[row, col, 0]] as f64
        }
    })
}

/// Integer luma, rounded the same way as the usual 8-bit RGB→gray converters.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = LUMA_R * r as u32 + LUMA_G * g as u32 + LUMA_B * b as u32;
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

/// Truncating band edge: `floor(len * fraction)`.
fn band_edge(len: usize, fraction: f64) -> usize {
    ((len as f64 * fraction) as usize).min(len)
}

/// `None` when the band has no rows.
fn upper_band_mean(gray: ArrayView2<'_, f64>) -> Option<f64> {
    let (h, _) = gray.dim();
    gray.slice(s![..band_edge(h, UPPER_BAND_END), ..]).mean()
}

/// Population variance of the skin band; `None` when the band is empty.
fn mid_band_variance(gray: ArrayView2<'_, f64>) -> Option<f64> {
    let (h, w) = gray.dim();
    let band = gray.slice(s![
        band_edge(h, MID_BAND_TOP)..band_edge(h, MID_BAND_BOTTOM),
        band_edge(w, MID_BAND_LEFT)..band_edge(w, MID_BAND_RIGHT)
    ]);
    if band.is_empty() {
        return None;
    }
    Some(band.var(0.0))
}
