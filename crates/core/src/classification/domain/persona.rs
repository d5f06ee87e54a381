use serde::{Deserialize, Serialize};

/// Label assigned to the principal subject of a frame or video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Grandma,
    Grandpa,
    Unknown,
}

impl Persona {
    /// Maps the two heuristic signals onto a persona.
    ///
    /// A face that does not read as elderly is never labelled, whatever its
    /// gender signal says.
    pub fn from_signal(signal: &FeatureSignal) -> Self {
        match (signal.is_elderly, signal.is_male) {
            (true, true) => Persona::Grandpa,
            (true, false) => Persona::Grandma,
            (false, _) => Persona::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != Persona::Unknown
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Persona::Grandma => write!(f, "grandma"),
            Persona::Grandpa => write!(f, "grandpa"),
            Persona::Unknown => write!(f, "unknown"),
        }
    }
}

/// Heuristic read-out for one face region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSignal {
    pub is_elderly: bool,
    pub is_male: bool,
    pub confidence: f64,
}

/// Classification of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResult {
    pub persona: Persona,
    pub confidence: f64,
    pub faces_detected: usize,
}

impl FrameResult {
    /// No usable face; `faces_detected` still reports the raw locator count.
    pub fn unknown(faces_detected: usize) -> Self {
        Self {
            persona: Persona::Unknown,
            confidence: 0.0,
            faces_detected,
        }
    }
}

/// Final judgment for one video source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub persona: Persona,
    pub confidence: f64,
    pub sample_count: usize,
    /// Diagnostic reason when the source could not be opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AggregateResult {
    pub fn new(persona: Persona, confidence: f64, sample_count: usize) -> Self {
        Self {
            persona,
            confidence,
            sample_count,
            error: None,
        }
    }

    /// Nothing was retained: `{unknown, 0.0, 0}`.
    pub fn empty() -> Self {
        Self::new(Persona::Unknown, 0.0, 0)
    }

    pub fn open_failure(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::empty()
        }
    }
}

/// How a labeled result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassificationMethod {
    /// Ground truth taken from the identifier's naming convention.
    FilenameMatch,
    /// Frames were sampled, scored and voted on.
    FullPipeline,
}

/// An aggregate result tagged with the path that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledResult {
    #[serde(flatten)]
    pub result: AggregateResult,
    pub method: ClassificationMethod,
}
