use std::path::Path;
use std::time::Instant;

use crate::classification::domain::frame_classifier::FrameClassifier;
use crate::classification::domain::majority_vote::majority_vote;
use crate::classification::domain::persona::{AggregateResult, Persona};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::sampling_options::SamplingOptions;
use crate::shared::error::PersonaError;
use crate::shared::frame::Frame;
use crate::video::domain::video_reader::VideoReader;

type FrameIter<'a> = Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + 'a>;

/// Samples a video at a fixed stride and majority-votes the frame labels.
///
/// Frames are decoded, classified and dropped one at a time. Only frames
/// that classify as grandma or grandpa are retained; `unknown` frames are
/// discarded before the vote so they cannot dilute a clear majority.
pub struct ClassifyVideoUseCase {
    reader: Box<dyn VideoReader>,
    classifier: FrameClassifier,
    logger: Box<dyn PipelineLogger>,
}

impl ClassifyVideoUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        classifier: FrameClassifier,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            classifier,
            logger,
        }
    }

    /// Classifies the video at `path`.
    ///
    /// Never fails: an unopenable source yields `{unknown, 0.0, 0}` with a
    /// diagnostic in `error`, and a decode fault mid-walk ends the walk and
    /// votes on what was retained so far. The reader is closed exactly once
    /// after a successful open, whichever way the walk ends.
    pub fn execute(&mut self, path: &Path, options: &SamplingOptions) -> AggregateResult {
        let metadata = match self.reader.open(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                let err = PersonaError::SourceOpen {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                };
                log::warn!("{err}");
                return AggregateResult::open_failure(err.to_string());
            }
        };
        self.logger.reset();
        self.logger.info(&format!(
            "Sampling {} ({}x{}, every {} frames, up to {} samples)",
            path.display(),
            metadata.width,
            metadata.height,
            options.stride_frames(),
            options.max_samples()
        ));

        let retained = {
            let mut source = OpenSource {
                reader: self.reader.as_mut(),
            };
            let frames = source.reader.frames();
            walk(
                frames,
                &mut self.classifier,
                self.logger.as_mut(),
                options,
                metadata.total_frames,
            )
        };

        self.logger.summary();
        majority_vote(&retained)
    }
}

/// Closes the reader on drop, covering early stops, faults and panics.
struct OpenSource<'a> {
    reader: &'a mut dyn VideoReader,
}

impl Drop for OpenSource<'_> {
    fn drop(&mut self) {
        self.reader.close();
    }
}

/// Reads forward through `frames`, returning the retained (non-unknown) labels.
fn walk(
    frames: FrameIter<'_>,
    classifier: &mut FrameClassifier,
    logger: &mut dyn PipelineLogger,
    options: &SamplingOptions,
    total_frames: usize,
) -> Vec<Persona> {
    let mut retained = Vec::with_capacity(options.max_samples());

    for (index, item) in frames.enumerate() {
        let frame = match item {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!(
                    "Decode fault at frame {index}: {e}; voting on {} retained samples",
                    retained.len()
                );
                break;
            }
        };
        logger.progress(index + 1, total_frames);

        if !options.is_sampled(index) {
            continue;
        }

        let start = Instant::now();
        let result = classifier.classify(&frame);
        logger.sample(index, &result, start.elapsed().as_secs_f64() * 1000.0);

        if result.persona.is_known() {
            retained.push(result.persona);
            if retained.len() >= options.max_samples() {
                break;
            }
        }
    }

    retained
}
