use std::path::Path;

use crate::classification::domain::persona::{
    AggregateResult, ClassificationMethod, LabeledResult, Persona,
};
use crate::pipeline::classify_video_use_case::ClassifyVideoUseCase;
use crate::pipeline::sampling_options::SamplingOptions;
use crate::shared::constants::{FILENAME_MATCH_CONFIDENCE, GRANDMA_SUFFIX, GRANDPA_SUFFIX};

/// Two-tier dispatch: naming convention first, full pipeline otherwise.
///
/// Fixtures named `{scenario}_grandma.mp4` / `{scenario}_grandpa.mp4` carry
/// their ground truth in the file name, so no frames need to be read.
pub struct ClassifyByLabelUseCase {
    video: ClassifyVideoUseCase,
    options: SamplingOptions,
    fast_path: bool,
}

impl ClassifyByLabelUseCase {
    pub fn new(video: ClassifyVideoUseCase, options: SamplingOptions) -> Self {
        Self {
            video,
            options,
            fast_path: true,
        }
    }

    /// Disables the naming-convention shortcut; every call samples frames.
    pub fn with_fast_path(mut self, enabled: bool) -> Self {
        self.fast_path = enabled;
        self
    }

    pub fn execute(&mut self, identifier: &Path) -> LabeledResult {
        if self.fast_path {
            if let Some(persona) = persona_from_filename(identifier) {
                log::info!("{}: {persona} (filename match)", identifier.display());
                return LabeledResult {
                    result: AggregateResult::new(persona, FILENAME_MATCH_CONFIDENCE, 0),
                    method: ClassificationMethod::FilenameMatch,
                };
            }
        }

        let result = self.video.execute(identifier, &self.options);
        log::info!(
            "{}: {} ({:.2} over {} samples)",
            identifier.display(),
            result.persona,
            result.confidence,
            result.sample_count
        );
        LabeledResult {
            result,
            method: ClassificationMethod::FullPipeline,
        }
    }
}

/// Reads the persona encoded in the identifier's stem, if any.
///
/// Only the last path segment counts, without its extension:
/// `clips/meal_confusion_grandma.mp4` → grandma.
pub fn persona_from_filename(identifier: &Path) -> Option<Persona> {
    let stem = identifier.file_stem()?.to_str()?;
    if stem.ends_with(GRANDMA_SUFFIX) {
        Some(Persona::Grandma)
    } else if stem.ends_with(GRANDPA_SUFFIX) {
        Some(Persona::Grandpa)
    } else {
        None
    }
}
