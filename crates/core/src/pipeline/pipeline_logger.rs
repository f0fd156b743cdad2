use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for analysis progress and per-stage timings.
///
/// The use case reports through this trait instead of printing, so the CLI
/// and tests can each decide what to do with the events.
pub trait PipelineLogger: Send {
    /// `current` frames read out of `total` reported by the container.
    fn progress(&mut self, current: usize, total: usize);

    /// How long a named stage took for one sampled frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    fn info(&mut self, message: &str);

    /// Total frames read once decoding has stopped. Default: no-op.
    fn finish(&mut self, _frames_read: usize) {}

    /// End-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Forwards events to the `log` facade and keeps stage timings for a
/// summary at the end of the run.
pub struct LoggingPipelineLogger {
    timings: BTreeMap<String, Vec<f64>>,
    start_time: Instant,
    frames_read: usize,
}

impl LoggingPipelineLogger {
    pub fn new() -> Self {
        Self {
            timings: BTreeMap::new(),
            start_time: Instant::now(),
            frames_read: 0,
        }
    }

    /// Formatted timing summary, or `None` if no stage was timed.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Analysis summary ({} frames read, {:.1}s total):",
            self.frames_read,
            elapsed_ms / 1000.0
        )];

        for (stage, durations) in &self.timings {
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len() as f64;
            lines.push(format!(
                "  {stage:12}: {:5} samples  avg {avg_ms:6.1}ms  total {total_ms:7.0}ms",
                durations.len()
            ));
        }

        if self.frames_read > 0 && elapsed_ms > 0.0 {
            let fps = self.frames_read as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }
}

impl Default for LoggingPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for LoggingPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_read = current;
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Progress: {pct:.1}% ({current}/{total} frames)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn finish(&mut self, frames_read: usize) {
        self.frames_read = frames_read;
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
