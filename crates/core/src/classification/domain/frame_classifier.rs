use crate::classification::domain::feature_scorer::FeatureScorer;
use crate::classification::domain::persona::{FrameResult, Persona};
use crate::detection::domain::face_locator::FaceLocator;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Labels a single frame from its largest face.
///
/// The locator is injected so callers can substitute a degraded or stub
/// implementation; the classifier itself keeps no state between frames.
pub struct FrameClassifier {
    locator: Box<dyn FaceLocator>,
    scorer: FeatureScorer,
}

impl FrameClassifier {
    pub fn new(locator: Box<dyn FaceLocator>, scorer: FeatureScorer) -> Self {
        Self { locator, scorer }
    }

    pub fn scorer(&self) -> &FeatureScorer {
        &self.scorer
    }

    /// Classifies `frame`.
    ///
    /// Never fails: an empty frame, a locator error, no faces, or an
    /// unusable subject box all come back as an `unknown` result.
    pub fn classify(&mut self, frame: &Frame) -> FrameResult {
        if frame.is_empty() {
            return FrameResult::unknown(0);
        }

        let faces = match self.locator.locate(frame) {
            Ok(faces) => faces,
            Err(e) => {
                log::debug!("frame {}: face locator failed: {e}", frame.index());
                Vec::new()
            }
        };

        let Some(subject) = BoundingBox::largest(&faces) else {
            return FrameResult::unknown(0);
        };

        match self.scorer.score(frame, subject) {
            Ok(signal) => FrameResult {
                persona: Persona::from_signal(&signal),
                confidence: signal.confidence,
                faces_detected: faces.len(),
            },
            Err(e) => {
                log::debug!("frame {}: {e}", frame.index());
                FrameResult::unknown(faces.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::domain::feature_scorer::HeuristicThresholds;
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // --- Stubs ---

    struct StubLocator {
        faces: Vec<BoundingBox>,
        calls: Arc<AtomicUsize>,
    }

    impl StubLocator {
        fn new(faces: Vec<BoundingBox>) -> Self {
            Self {
                faces,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl FaceLocator for StubLocator {
        fn locate(&mut self, _frame: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.faces.clone())
        }
    }

    struct FailingLocator;

    impl FaceLocator for FailingLocator {
        fn locate(&mut self, _frame: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
            Err("inference failed".into())
        }
    }

    // --- Helpers ---

    fn solid_frame(w: u32, h: u32, value: u8) -> Frame {
        Frame::new(vec![value; (w * h * 3) as usize], w, h, 3, 0)
    }

    fn classifier(faces: Vec<BoundingBox>) -> FrameClassifier {
        FrameClassifier::new(Box::new(StubLocator::new(faces)), FeatureScorer::default())
    }

    // --- Tests ---

    #[test]
    fn test_no_faces_is_unknown_with_zero_confidence() {
        let result = classifier(vec![]).classify(&solid_frame(100, 100, 200));
        assert_eq!(result, FrameResult::unknown(0));
    }

    #[test]
    fn test_empty_frame_skips_locator() {
        let locator = StubLocator::new(vec![BoundingBox::new(0, 0, 10, 10)]);
        let calls = locator.calls.clone();
        let mut classifier = FrameClassifier::new(Box::new(locator), FeatureScorer::default());

        let result = classifier.classify(&Frame::new(Vec::new(), 0, 0, 3, 0));

        assert_eq!(result, FrameResult::unknown(0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bright_wide_face_is_grandpa() {
        let result = classifier(vec![BoundingBox::new(10, 10, 40, 40)])
            .classify(&solid_frame(100, 100, 220));
        assert_eq!(result.persona, Persona::Grandpa);
        assert_relative_eq!(result.confidence, 0.6);
        assert_eq!(result.faces_detected, 1);
    }

    #[test]
    fn test_bright_narrow_face_is_grandma() {
        let result = classifier(vec![BoundingBox::new(10, 10, 30, 60)])
            .classify(&solid_frame(100, 100, 220));
        assert_eq!(result.persona, Persona::Grandma);
        assert_relative_eq!(result.confidence, 0.6);
    }

    #[test]
    fn test_young_face_is_unknown_but_keeps_signal_confidence() {
        let result = classifier(vec![BoundingBox::new(10, 10, 40, 40)])
            .classify(&solid_frame(100, 100, 80));
        assert_eq!(result.persona, Persona::Unknown);
        assert_relative_eq!(result.confidence, 0.6);
        assert_eq!(result.faces_detected, 1);
    }

    #[test]
    fn test_largest_face_is_the_subject() {
        // Left half bright (hair reads grey), right half dark.
        let mut data = vec![40u8; 100 * 100 * 3];
        for row in 0..100 {
            for col in 0..50 {
                let i = (row * 100 + col) * 3;
                data[i..i + 3].copy_from_slice(&[230, 230, 230]);
            }
        }
        let frame = Frame::new(data, 100, 100, 3, 0);

        let small_bright = BoundingBox::new(5, 5, 20, 20);
        let large_dark = BoundingBox::new(55, 5, 40, 40);
        let result = classifier(vec![small_bright, large_dark]).classify(&frame);

        assert_eq!(result.persona, Persona::Unknown);
        assert_eq!(result.faces_detected, 2);
    }

    #[test]
    fn test_invalid_subject_box_counts_faces_but_is_unknown() {
        let result = classifier(vec![
            BoundingBox::new(0, 0, 10, 10),
            BoundingBox::new(80, 80, 60, 60), // largest, but overhangs the frame
        ])
        .classify(&solid_frame(100, 100, 220));

        assert_eq!(result.persona, Persona::Unknown);
        assert_relative_eq!(result.confidence, 0.0);
        assert_eq!(result.faces_detected, 2);
    }

    #[test]
    fn test_locator_error_is_treated_as_no_faces() {
        let mut classifier = FrameClassifier::new(Box::new(FailingLocator), FeatureScorer::default());
        assert_eq!(
            classifier.classify(&solid_frame(100, 100, 220)),
            FrameResult::unknown(0)
        );
    }

    #[test]
    fn test_thresholds_flow_through_to_result() {
        let scorer = FeatureScorer::new(HeuristicThresholds {
            hair_brightness: 250.0,
            ..HeuristicThresholds::default()
        });
        let mut classifier = FrameClassifier::new(
            Box::new(StubLocator::new(vec![BoundingBox::new(10, 10, 40, 40)])),
            scorer,
        );
        assert_eq!(
            classifier.classify(&solid_frame(100, 100, 220)).persona,
            Persona::Unknown
        );
    }

    #[test]
    fn test_classify_is_idempotent() {
        let frame = solid_frame(64, 48, 170);
        let mut classifier = classifier(vec![
            BoundingBox::new(4, 4, 20, 30),
            BoundingBox::new(30, 10, 30, 30),
        ]);
        let first = classifier.classify(&frame);
        let second = classifier.classify(&frame);
        assert_eq!(first, second);
        assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
    }
}
