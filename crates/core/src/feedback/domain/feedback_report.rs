use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::analysis::domain::analysis_summary::AnalysisSummary;

use super::feedback_generator::Feedback;

/// Rounds to one decimal place.
///
/// Precision formatting rounds the exact binary value with ties to even, so
/// 12.25 becomes 12.2 and 0.35 (stored just below .35) becomes 0.3.
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacialMetrics {
    pub face_visibility_pct: f64,
    pub eye_contact_rate_pct: f64,
    pub facial_stability_score: f64,
}

/// Successful analysis result. Numeric fields are rounded to one decimal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// ISO-8601 generation time.
    pub timestamp: String,
    pub duration_seconds: f64,
    pub metrics: FacialMetrics,
    pub feedback_text: String,
    pub suggestions: Vec<String>,
}

impl FeedbackReport {
    pub fn new<Tz>(
        summary: &AnalysisSummary,
        feedback: Feedback,
        generated_at: DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            timestamp: generated_at.to_rfc3339(),
            duration_seconds: round1(summary.duration_seconds),
            metrics: FacialMetrics {
                face_visibility_pct: round1(summary.face_visibility_pct),
                eye_contact_rate_pct: round1(summary.eye_contact_rate_pct),
                facial_stability_score: round1(summary.facial_stability_score()),
            },
            feedback_text: feedback.text,
            suggestions: feedback.suggestions,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

/// Either a report or an error; serialized without a tag so the presence
/// of `error` is what tells them apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Error(ErrorResult),
    Report(FeedbackReport),
}

impl AnalysisOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorResult {
            error: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn report(&self) -> Option<&FeedbackReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::Error(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(e) => Some(&e.error),
            Self::Report(_) => None,
        }
    }
}

impl From<FeedbackReport> for AnalysisOutcome {
    fn from(report: FeedbackReport) -> Self {
        Self::Report(report)
    }
}
