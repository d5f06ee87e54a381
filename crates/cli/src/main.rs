use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use persona_core::classification::domain::feature_scorer::FeatureScorer;
use persona_core::classification::domain::frame_classifier::FrameClassifier;
use persona_core::detection::domain::face_locator::FaceLocator;
use persona_core::detection::infrastructure::model_resolver;
use persona_core::detection::infrastructure::onnx_yolo_locator::OnnxYoloLocator;
use persona_core::detection::infrastructure::unavailable_face_locator::locator_or_unavailable;
use persona_core::pipeline::classify_by_label_use_case::ClassifyByLabelUseCase;
use persona_core::pipeline::classify_video_use_case::ClassifyVideoUseCase;
use persona_core::pipeline::pipeline_logger::LogPipelineLogger;
use persona_core::shared::constants::{YOLO_MODEL_NAME, YOLO_MODEL_URL};
use persona_core::shared::settings::Settings;
use persona_core::video::infrastructure::reader_factory::{is_video, AnySourceReader};

/// Classify the persona (grandma / grandpa) shown in videos and images.
///
/// Prints one JSON result per input on stdout.
#[derive(Parser, Debug)]
#[command(name = "persona-detect")]
struct Cli {
    /// Video or image files, or directories to scan for videos.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Classify every Nth frame (default 15).
    #[arg(long)]
    stride: Option<usize>,

    /// Stop after this many grandma/grandpa samples (default 50).
    #[arg(long)]
    max_samples: Option<usize>,

    /// Face locator confidence threshold (0.0-1.0, default 0.5).
    #[arg(long)]
    locator_confidence: Option<f64>,

    /// Always sample frames, even for `*_grandma` / `*_grandpa` file names.
    #[arg(long)]
    no_fast_path: bool,

    /// Settings file (defaults to the per-user PersonaDetect/settings.json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mean hair-band brightness above which a face counts as elderly.
    #[arg(long)]
    hair_brightness: Option<f64>,

    /// Skin-band intensity variance above which a face counts as elderly.
    #[arg(long)]
    skin_variance: Option<f64>,

    /// Face width/height ratio above which a face counts as male.
    #[arg(long)]
    male_aspect_ratio: Option<f64>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    validate(&settings)?;
    let options = settings.sampling()?;

    let inputs = collect_inputs(&cli.inputs)?;
    if inputs.is_empty() {
        return Err("No video files found in the given inputs".into());
    }

    let video = ClassifyVideoUseCase::new(
        Box::new(AnySourceReader::new()),
        FrameClassifier::new(
            build_locator(settings.locator_confidence),
            FeatureScorer::new(settings.thresholds),
        ),
        Box::new(LogPipelineLogger::default()),
    );
    let mut classify = ClassifyByLabelUseCase::new(video, options).with_fast_path(settings.fast_path);

    for input in &inputs {
        let labeled = classify.execute(input);
        let mut value = serde_json::to_value(&labeled)?;
        if let Some(fields) = value.as_object_mut() {
            fields.insert("input".into(), input.display().to_string().into());
        }
        println!("{value}");
    }

    Ok(())
}

/// Settings file (explicit or per-user) with command-line overrides applied.
fn resolve_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };

    if let Some(stride) = cli.stride {
        settings.stride_frames = stride;
    }
    if let Some(max_samples) = cli.max_samples {
        settings.max_samples = max_samples;
    }
    if let Some(confidence) = cli.locator_confidence {
        settings.locator_confidence = confidence;
    }
    if cli.no_fast_path {
        settings.fast_path = false;
    }
    if let Some(v) = cli.hair_brightness {
        settings.thresholds.hair_brightness = v;
    }
    if let Some(v) = cli.skin_variance {
        settings.thresholds.skin_variance = v;
    }
    if let Some(v) = cli.male_aspect_ratio {
        settings.thresholds.male_aspect_ratio = v;
    }
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if settings.stride_frames < 1 {
        return Err(format!("Stride must be at least 1, got {}", settings.stride_frames).into());
    }
    if settings.max_samples < 1 {
        return Err(format!(
            "Max samples must be at least 1, got {}",
            settings.max_samples
        )
        .into());
    }
    if !(0.0..=1.0).contains(&settings.locator_confidence) {
        return Err(format!(
            "Locator confidence must be between 0.0 and 1.0, got {}",
            settings.locator_confidence
        )
        .into());
    }
    let t = &settings.thresholds;
    if !(t.male_aspect_ratio > 0.0) {
        return Err(format!(
            "Male aspect ratio must be positive, got {}",
            t.male_aspect_ratio
        )
        .into());
    }
    if !(t.hair_brightness >= 0.0 && t.skin_variance >= 0.0) {
        return Err("Brightness and variance thresholds must be non-negative".into());
    }
    Ok(())
}

/// Expands directories into their video files (sorted, non-recursive).
///
/// Plain paths are passed through untouched, even when they don't exist:
/// naming-convention identifiers need no file, and anything else reports
/// its open failure in the JSON result.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            inputs.extend(scan_videos(path)?);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

fn scan_videos(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut videos = Vec::new();
    for entry in std::fs::read_dir(dir)
        .map_err(|e| format!("Cannot read directory {}: {e}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && is_video(&path) {
            videos.push(path);
        }
    }
    videos.sort();
    log::info!("Found {} videos in {}", videos.len(), dir.display());
    Ok(videos)
}

/// YOLO locator, or the degraded no-faces locator if the model can't be loaded.
fn build_locator(confidence: f64) -> Box<dyn FaceLocator> {
    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let locator = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        None,
        Some(Box::new(download_progress)),
    )
    .map_err(|e| e.to_string())
    .and_then(|model_path| {
        OnnxYoloLocator::new(&model_path, confidence).map_err(|e| e.to_string())
    });
    locator_or_unavailable(locator)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face locator model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading face locator model... {downloaded} bytes");
    }
}
