use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::analysis::domain::metrics_aggregator::MetricsAggregator;
use crate::detection::domain::face_detector::FaceDetector;
use crate::feedback::domain::feedback_generator;
use crate::feedback::domain::feedback_report::{AnalysisOutcome, FeedbackReport};
use crate::shared::constants::{FRAME_SKIP, PROGRESS_INTERVAL};
use crate::video::domain::video_handle::{VideoError, VideoHandle};
use crate::video::domain::video_reader::VideoReader;

use super::pipeline_logger::{LoggingPipelineLogger, PipelineLogger};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Video file not found")]
    FileNotFound(PathBuf),
    #[error("Cannot open video")]
    VideoUnreadable(#[source] VideoError),
    #[error("Video decoding failed: {0}")]
    FrameRead(#[source] VideoError),
    #[error("Face detection failed on frame {index}: {reason}")]
    Detection { index: usize, reason: String },
    #[error("Analysis already executed")]
    AlreadyExecuted,
}

impl From<AnalysisError> for AnalysisOutcome {
    fn from(e: AnalysisError) -> Self {
        AnalysisOutcome::error(e.to_string())
    }
}

/// Analyzes one video for face visibility, eye contact and stability.
///
/// Single-use: the reader is consumed by the first `execute`, and a second
/// call reports [`AnalysisError::AlreadyExecuted`].
pub struct AnalyzeVideoUseCase {
    reader: Option<Box<dyn VideoReader>>,
    detector: Box<dyn FaceDetector>,
    logger: Box<dyn PipelineLogger>,
}

impl AnalyzeVideoUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        detector: Box<dyn FaceDetector>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader: Some(reader),
            detector,
            logger,
        }
    }

    /// Runs the analysis and folds any failure into an error outcome.
    pub fn execute(&mut self, path: &Path) -> AnalysisOutcome {
        match self.run(path) {
            Ok(report) => report.into(),
            Err(e) => {
                log::warn!("Analysis of {} failed: {e}", path.display());
                e.into()
            }
        }
    }

    pub fn run(&mut self, path: &Path) -> Result<FeedbackReport, AnalysisError> {
        if !path.exists() {
            return Err(AnalysisError::FileNotFound(path.to_path_buf()));
        }
        let reader = self.reader.take().ok_or(AnalysisError::AlreadyExecuted)?;
        let mut video = VideoHandle::open(reader, path).map_err(AnalysisError::VideoUnreadable)?;

        let fps = video.frame_rate();
        let reported_frames = video.frame_count();
        self.logger.info(&format!(
            "Analyzing {} ({reported_frames} frames @ {fps:.2} fps)",
            path.display()
        ));

        let logger = self.logger.as_mut();
        let mut aggregator = MetricsAggregator::new(self.detector.as_mut());
        let mut sampler = video
            .sample_every(FRAME_SKIP)
            .map_err(AnalysisError::FrameRead)?;
        let mut next_progress = PROGRESS_INTERVAL;

        while let Some(sample) = sampler.next() {
            let sample = sample.map_err(AnalysisError::FrameRead)?;
            report_progress(logger, sampler.frames_read(), reported_frames, &mut next_progress);

            let t0 = Instant::now();
            aggregator
                .observe(&sample.image)
                .map_err(|e| AnalysisError::Detection {
                    index: sample.index,
                    reason: e.to_string(),
                })?;
            logger.timing("detect", t0.elapsed().as_secs_f64() * 1000.0);
        }

        let frames_read = sampler.frames_read();
        report_progress(logger, frames_read, reported_frames, &mut next_progress);
        logger.finish(frames_read);
        drop(sampler);
        video.release();

        let total_frames = if reported_frames == 0 {
            log::debug!("Container reported no frame count; using {frames_read} frames read");
            frames_read
        } else {
            reported_frames
        };

        let t0 = Instant::now();
        let summary = aggregator.finish(total_frames, fps);
        let feedback = feedback_generator::generate(
            summary.face_visibility_pct,
            summary.eye_contact_rate_pct,
            summary.facial_stability_score(),
        );
        let report = FeedbackReport::new(&summary, feedback, chrono::Local::now());
        logger.timing("feedback", t0.elapsed().as_secs_f64() * 1000.0);

        if !summary.facial_stability.is_measured() {
            logger.info("Too few face positions to measure stability; using neutral score");
        }
        logger.info("Analysis complete");
        logger.summary();
        Ok(report)
    }
}

/// Reports each progress bucket crossed since the last call. Nothing is
/// reported when the container gave no frame count.
fn report_progress(
    logger: &mut dyn PipelineLogger,
    frames_read: usize,
    total: usize,
    next_progress: &mut usize,
) {
    if total == 0 {
        return;
    }
    while frames_read >= *next_progress {
        logger.progress(*next_progress, total);
        *next_progress += PROGRESS_INTERVAL;
    }
}

/// Builds a use case around `reader` and `detector` and analyzes `path`
/// in one call, logging through the `log` facade.
pub fn analyze_video(
    path: &Path,
    reader: Box<dyn VideoReader>,
    detector: Box<dyn FaceDetector>,
) -> AnalysisOutcome {
    AnalyzeVideoUseCase::new(reader, detector, Box::new(LoggingPipelineLogger::new()))
        .execute(path)
}
