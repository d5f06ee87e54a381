use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::classification::domain::persona::LabeledResult;
use crate::pipeline::classify_by_label_use_case::ClassifyByLabelUseCase;

/// Memoizes labeled results by identifier.
///
/// Useful for long-running hosts that ask about the same scenario clips
/// repeatedly. Open failures are not cached, so a clip that appears later
/// is picked up on the next request.
pub struct CachedLabelClassifier {
    inner: ClassifyByLabelUseCase,
    cache: HashMap<PathBuf, LabeledResult>,
    last: Option<LabeledResult>,
}

impl CachedLabelClassifier {
    pub fn new(inner: ClassifyByLabelUseCase) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
            last: None,
        }
    }

    pub fn classify(&mut self, identifier: &Path) -> LabeledResult {
        let labeled = match self.cache.get(identifier) {
            Some(hit) => hit.clone(),
            None => {
                let labeled = self.inner.execute(identifier);
                if labeled.result.error.is_none() {
                    self.cache.insert(identifier.to_path_buf(), labeled.clone());
                }
                labeled
            }
        };
        self.last = Some(labeled.clone());
        labeled
    }

    /// Most recent result handed out, cached or fresh.
    pub fn last_detection(&self) -> Option<&LabeledResult> {
        self.last.as_ref()
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
