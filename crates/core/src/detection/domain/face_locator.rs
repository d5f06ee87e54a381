use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Finds face boxes in a frame.
///
/// An empty result means "no face found". Implementations may keep
/// inference sessions or scratch buffers between calls, hence `&mut self`.
pub trait FaceLocator: Send {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>>;
}
