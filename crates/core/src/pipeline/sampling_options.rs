use crate::shared::constants::{DEFAULT_MAX_SAMPLES, DEFAULT_STRIDE_FRAMES};
use crate::shared::error::PersonaError;

/// How densely a video is sampled and when sampling stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingOptions {
    stride_frames: usize,
    max_samples: usize,
}

impl SamplingOptions {
    /// `stride_frames`: classify every Nth frame starting at index 0.
    /// `max_samples`: stop once this many non-unknown results are retained.
    pub fn new(stride_frames: usize, max_samples: usize) -> Result<Self, PersonaError> {
        if stride_frames < 1 {
            return Err(PersonaError::InvalidSampling("stride_frames must be >= 1"));
        }
        if max_samples < 1 {
            return Err(PersonaError::InvalidSampling("max_samples must be >= 1"));
        }
        Ok(Self {
            stride_frames,
            max_samples,
        })
    }

    pub fn stride_frames(&self) -> usize {
        self.stride_frames
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Whether the frame at `index` falls on the sampling grid.
    pub fn is_sampled(&self, index: usize) -> bool {
        index % self.stride_frames == 0
    }
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            stride_frames: DEFAULT_STRIDE_FRAMES,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}
