//! Persona classification for short scene videos.
//!
//! Locates faces, scores the largest one with brightness and texture
//! heuristics, and majority-votes the per-frame labels over a sampled walk
//! through the video.

pub mod classification;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod video;
