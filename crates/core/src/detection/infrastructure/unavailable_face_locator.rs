use crate::detection::domain::face_locator::FaceLocator;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::error::PersonaError;
use crate::shared::frame::Frame;

/// Stand-in used when no real locator could be initialised.
///
/// Every frame yields zero faces, so every video classifies as unknown.
/// The reason is logged once, at construction.
pub struct UnavailableFaceLocator {
    reason: String,
}

impl UnavailableFaceLocator {
    pub fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        log::warn!("{}", PersonaError::CapabilityUnavailable(reason.clone()));
        Self { reason }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl FaceLocator for UnavailableFaceLocator {
    fn locate(&mut self, _frame: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        Ok(Vec::new())
    }
}

/// Unwraps a locator initialisation result, degrading to [`UnavailableFaceLocator`].
pub fn locator_or_unavailable<L, E>(result: Result<L, E>) -> Box<dyn FaceLocator>
where
    L: FaceLocator + 'static,
    E: std::fmt::Display,
{
    match result {
        Ok(locator) => Box::new(locator),
        Err(e) => Box::new(UnavailableFaceLocator::new(e.to_string())),
    }
}
