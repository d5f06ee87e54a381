use std::time::Instant;

use crate::classification::domain::persona::FrameResult;

/// Observer for sampling-walk events.
///
/// Keeps the sampler free of output concerns: the CLI logs a summary,
/// tests and library callers plug in [`NullPipelineLogger`].
pub trait PipelineLogger: Send {
    /// A new source was opened; per-source counters start over. Default: no-op.
    fn reset(&mut self) {}

    /// Frames read so far; `total_frames` is the container estimate (0 if unknown).
    fn progress(&mut self, frames_read: usize, total_frames: usize);

    /// One sampled frame was classified in `duration_ms`.
    fn sample(&mut self, frame_index: usize, result: &FrameResult, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-walk summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _frames_read: usize, _total_frames: usize) {}
    fn sample(&mut self, _frame_index: usize, _result: &FrameResult, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger backed by the `log` facade.
///
/// Progress lines are throttled to every `throttle_frames` frames read;
/// per-sample details go to `debug`.
pub struct LogPipelineLogger {
    throttle_frames: usize,
    start_time: Instant,
    frames_read: usize,
    total_frames: usize,
    sampled: usize,
    retained: usize,
    faces: usize,
    classify_ms: Vec<f64>,
    messages: Vec<String>,
}

impl LogPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            start_time: Instant::now(),
            frames_read: 0,
            total_frames: 0,
            sampled: 0,
            retained: 0,
            faces: 0,
            classify_ms: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary, or `None` if no frame was sampled.
    pub fn summary_string(&self) -> Option<String> {
        if self.sampled == 0 {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let avg_ms = self.classify_ms.iter().sum::<f64>() / self.classify_ms.len().max(1) as f64;
        let avg_faces = self.faces as f64 / self.sampled as f64;

        let mut lines = vec![format!(
            "Sampling summary ({} frames read, {elapsed_s:.1}s total):",
            self.frames_read
        )];
        lines.push(format!(
            "  sampled {}  retained {}  discarded {}",
            self.sampled,
            self.retained,
            self.sampled - self.retained
        ));
        lines.push(format!("  classify: avg {avg_ms:.1}ms"));
        lines.push(format!("  faces per sample: avg {avg_faces:.1}"));
        Some(lines.join("\n"))
    }

    pub fn sampled(&self) -> usize {
        self.sampled
    }

    pub fn retained(&self) -> usize {
        self.retained
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn reset(&mut self) {
        *self = Self::new(self.throttle_frames);
    }

    fn progress(&mut self, frames_read: usize, total_frames: usize) {
        self.frames_read = frames_read;
        self.total_frames = total_frames;
        if frames_read % self.throttle_frames == 0 {
            if total_frames > 0 {
                log::info!("Read {frames_read}/{total_frames} frames");
            } else {
                log::info!("Read {frames_read} frames");
            }
        }
    }

    fn sample(&mut self, frame_index: usize, result: &FrameResult, duration_ms: f64) {
        self.sampled += 1;
        self.faces += result.faces_detected;
        if result.persona.is_known() {
            self.retained += 1;
        }
        self.classify_ms.push(duration_ms);
        log::debug!(
            "frame {frame_index}: {} ({:.2}, {} faces) in {duration_ms:.1}ms",
            result.persona,
            result.confidence,
            result.faces_detected
        );
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::domain::persona::Persona;

    fn result(persona: Persona, faces: usize) -> FrameResult {
        FrameResult {
            persona,
            confidence: 0.6,
            faces_detected: faces,
        }
    }

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.sample(0, &result(Persona::Grandma, 1), 2.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_sample_counts_retained_and_discarded() {
        let mut logger = LogPipelineLogger::new(10);
        logger.sample(0, &result(Persona::Grandma, 1), 4.0);
        logger.sample(15, &result(Persona::Unknown, 0), 2.0);
        logger.sample(30, &result(Persona::Grandpa, 2), 3.0);

        assert_eq!(logger.sampled(), 3);
        assert_eq!(logger.retained(), 2);
    }

    #[test]
    fn test_summary_reports_counts_and_latency() {
        let mut logger = LogPipelineLogger::new(10);
        logger.progress(45, 90);
        logger.sample(0, &result(Persona::Grandma, 1), 4.0);
        logger.sample(15, &result(Persona::Unknown, 1), 2.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Sampling summary (45 frames read"));
        assert!(summary.contains("sampled 2  retained 1  discarded 1"));
        assert!(summary.contains("avg 3.0ms"));
        assert!(summary.contains("faces per sample: avg 1.0"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = LogPipelineLogger::new(10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_latest_position() {
        let mut logger = LogPipelineLogger::new(10);
        for i in 1..=25 {
            logger.progress(i, 0);
        }
        assert_eq!(logger.frames_read, 25);
        assert_eq!(logger.total_frames, 0);
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = LogPipelineLogger::new(10);
        logger.info("opened clip001.mp4");
        assert_eq!(logger.messages, vec!["opened clip001.mp4".to_string()]);
    }

    #[test]
    fn test_reset_starts_counts_over_and_keeps_throttle() {
        let mut logger = LogPipelineLogger::new(7);
        logger.progress(30, 60);
        logger.sample(0, &result(Persona::Grandpa, 1), 1.0);

        logger.reset();

        assert_eq!(logger.sampled(), 0);
        assert_eq!(logger.frames_read, 0);
        assert_eq!(logger.throttle_frames, 7);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_throttle_is_at_least_one() {
        assert_eq!(LogPipelineLogger::new(0).throttle_frames, 1);
        assert_eq!(LogPipelineLogger::default().throttle_frames, 100);
    }
}
