use crate::shared::constants::{NEUTRAL_STABILITY, STABILITY_DIVISOR};
use crate::shared::video_metadata;

use super::frame_stats::FrameStats;

/// How still the face stayed, on a 0–100 scale.
///
/// `Neutral` is reported when too few face positions were seen to measure
/// anything; it scores [`NEUTRAL_STABILITY`] but is not a measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StabilityScore {
    Measured(f64),
    Neutral,
}

impl StabilityScore {
    /// Maps average frame-to-frame movement (pixels) to a score.
    pub fn from_movement(average_movement: Option<f64>) -> Self {
        match average_movement {
            Some(movement) => {
                Self::Measured((100.0 - movement / STABILITY_DIVISOR).clamp(0.0, 100.0))
            }
            None => Self::Neutral,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Self::Measured(score) => *score,
            Self::Neutral => NEUTRAL_STABILITY,
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, Self::Measured(_))
    }
}

/// Final metrics of one analysis pass.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisSummary {
    pub duration_seconds: f64,
    pub face_visibility_pct: f64,
    pub eye_contact_rate_pct: f64,
    pub facial_stability: StabilityScore,
    pub total_frames: usize,
}

impl AnalysisSummary {
    pub fn from_stats(stats: &FrameStats, total_frames: usize, fps: f64) -> Self {
        Self {
            duration_seconds: video_metadata::duration_seconds(total_frames, fps),
            face_visibility_pct: stats.face_visibility_pct(),
            eye_contact_rate_pct: stats.eye_contact_rate_pct(),
            facial_stability: StabilityScore::from_movement(stats.average_movement()),
            total_frames,
        }
    }

    pub fn facial_stability_score(&self) -> f64 {
        self.facial_stability.value()
    }
}
