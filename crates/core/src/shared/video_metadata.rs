use std::path::PathBuf;

/// Properties reported by a video source when it is opened.
///
/// `total_frames` is the container's estimate and may be 0 when unknown;
/// the sampler never relies on it beyond progress reporting.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}
