pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Application directory name under the platform cache/config roots.
pub const APP_DIR_NAME: &str = "PersonaDetect";

/// Sample every Nth frame (~0.5 s at 30 fps).
pub const DEFAULT_STRIDE_FRAMES: usize = 15;

/// Stop after this many non-unknown samples.
pub const DEFAULT_MAX_SAMPLES: usize = 50;

/// Confidence reported when the vote between grandma and grandpa is tied.
pub const TIE_CONFIDENCE: f64 = 0.5;

/// Confidence reported for a naming-convention match.
pub const FILENAME_MATCH_CONFIDENCE: f64 = 1.0;

pub const GRANDMA_SUFFIX: &str = "_grandma";
pub const GRANDPA_SUFFIX: &str = "_grandpa";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "webm", "m4v"];
