use image::GrayImage;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::EYE_COUNT_THRESHOLD;

use super::analysis_summary::AnalysisSummary;
use super::frame_stats::{FacePosition, FrameStats};

/// Folds per-frame detections into [`FrameStats`] for one analysis pass.
///
/// Only the first face returned by the detector is considered. Eye
/// detection runs on that face's crop; at least two eyes count as eye
/// contact for the frame.
pub struct MetricsAggregator<'a> {
    detector: &'a mut dyn FaceDetector,
    stats: FrameStats,
}

impl<'a> MetricsAggregator<'a> {
    pub fn new(detector: &'a mut dyn FaceDetector) -> Self {
        Self {
            detector,
            stats: FrameStats::default(),
        }
    }

    pub fn observe(&mut self, image: &GrayImage) -> Result<(), Box<dyn std::error::Error>> {
        let faces = self.detector.detect_faces(image)?;
        if let Some(primary) = faces.first() {
            self.stats.frames_with_face += 1;
            self.stats.positions.push(FacePosition::of(primary));

            // A box entirely outside the frame leaves nothing to search for eyes.
            if let Some(face) = primary.crop(image) {
                let eyes = self.detector.detect_eyes(&face)?;
                if eyes.len() >= EYE_COUNT_THRESHOLD {
                    self.stats.frames_with_eyes += 1;
                }
            }
        }
        self.stats.frames_processed += 1;
        Ok(())
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn finish(self, total_frames: usize, fps: f64) -> AnalysisSummary {
        AnalysisSummary::from_stats(&self.stats, total_frames, fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::analysis_summary::StabilityScore;
    use crate::shared::detection_box::DetectionBox;
    use approx::assert_relative_eq;

    /// Replays scripted face results per call and returns `eye_count`
    /// eyes for every crop, recording crop sizes.
    struct ScriptedDetector {
        faces: Vec<Vec<DetectionBox>>,
        eye_count: usize,
        face_calls: usize,
        eye_crops: Vec<(u32, u32)>,
    }

    impl ScriptedDetector {
        fn new(faces: Vec<Vec<DetectionBox>>, eye_count: usize) -> Self {
            Self {
                faces,
                eye_count,
                face_calls: 0,
                eye_crops: Vec::new(),
            }
        }
    }

    impl FaceDetector for ScriptedDetector {
        fn detect_faces(
            &mut self,
            _image: &GrayImage,
        ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
            let result = self.faces[self.face_calls % self.faces.len()].clone();
            self.face_calls += 1;
            Ok(result)
        }

        fn detect_eyes(
            &mut self,
            face: &GrayImage,
        ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
            self.eye_crops.push(face.dimensions());
            Ok(vec![DetectionBox::new(1, 1, 2, 2); self.eye_count])
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect_faces(
            &mut self,
            _image: &GrayImage,
        ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
            Err("inference failed".into())
        }

        fn detect_eyes(
            &mut self,
            _face: &GrayImage,
        ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
            Ok(vec![])
        }
    }

    fn blank() -> GrayImage {
        GrayImage::new(200, 200)
    }

    fn face(x: i32, y: i32) -> DetectionBox {
        DetectionBox::new(x, y, 60, 80)
    }

    #[test]
    fn test_no_faces_counts_processed_only() {
        let mut detector = ScriptedDetector::new(vec![vec![]], 2);
        let mut aggregator = MetricsAggregator::new(&mut detector);
        for _ in 0..3 {
            aggregator.observe(&blank()).unwrap();
        }
        let stats = aggregator.stats().clone();
        assert_eq!(stats.frames_processed, 3);
        assert_eq!(stats.frames_with_face, 0);
        assert_eq!(stats.frames_with_eyes, 0);
        assert!(stats.positions.is_empty());
        assert!(detector.eye_crops.is_empty());
    }

    #[test]
    fn test_primary_face_is_cropped_for_eye_detection() {
        let mut detector = ScriptedDetector::new(vec![vec![face(10, 20), face(120, 20)]], 2);
        let mut aggregator = MetricsAggregator::new(&mut detector);
        aggregator.observe(&blank()).unwrap();

        let stats = aggregator.stats().clone();
        assert_eq!(stats.frames_with_face, 1);
        assert_eq!(stats.frames_with_eyes, 1);
        assert_eq!(stats.positions, vec![FacePosition { x: 40, y: 60 }]);
        assert_eq!(detector.eye_crops, vec![(60, 80)]);
    }

    #[test]
    fn test_single_eye_is_not_eye_contact() {
        let mut detector = ScriptedDetector::new(vec![vec![face(10, 20)]], 1);
        let mut aggregator = MetricsAggregator::new(&mut detector);
        aggregator.observe(&blank()).unwrap();
        assert_eq!(aggregator.stats().frames_with_face, 1);
        assert_eq!(aggregator.stats().frames_with_eyes, 0);
    }

    #[test]
    fn test_many_eyes_count_as_eye_contact() {
        let mut detector = ScriptedDetector::new(vec![vec![face(10, 20)]], 5);
        let mut aggregator = MetricsAggregator::new(&mut detector);
        aggregator.observe(&blank()).unwrap();
        assert_eq!(aggregator.stats().frames_with_eyes, 1);
    }

    #[test]
    fn test_face_partly_outside_frame_uses_clamped_crop() {
        let mut detector = ScriptedDetector::new(vec![vec![face(170, -20)]], 2);
        let mut aggregator = MetricsAggregator::new(&mut detector);
        aggregator.observe(&blank()).unwrap();
        assert_eq!(detector.eye_crops, vec![(30, 60)]);
    }

    #[test]
    fn test_face_fully_outside_frame_skips_eyes() {
        let mut detector = ScriptedDetector::new(vec![vec![face(500, 500)]], 2);
        let mut aggregator = MetricsAggregator::new(&mut detector);
        aggregator.observe(&blank()).unwrap();
        assert_eq!(aggregator.stats().frames_with_face, 1);
        assert_eq!(aggregator.stats().frames_with_eyes, 0);
        assert!(detector.eye_crops.is_empty());
    }

    #[test]
    fn test_mixed_sequence_summary() {
        let mut detector = ScriptedDetector::new(
            vec![vec![face(0, 0)], vec![], vec![face(30, 40)], vec![face(30, 40)]],
            2,
        );
        let mut aggregator = MetricsAggregator::new(&mut detector);
        for _ in 0..4 {
            aggregator.observe(&blank()).unwrap();
        }
        let summary = aggregator.finish(40, 10.0);

        assert_relative_eq!(summary.duration_seconds, 4.0);
        assert_relative_eq!(summary.face_visibility_pct, 75.0);
        assert_relative_eq!(summary.eye_contact_rate_pct, 100.0);
        // Movements 50 then 0: average 25 → 100 - 5
        assert_eq!(summary.facial_stability, StabilityScore::Measured(95.0));
    }

    #[test]
    fn test_detector_error_propagates_without_counting() {
        let mut detector = FailingDetector;
        let mut aggregator = MetricsAggregator::new(&mut detector);
        assert!(aggregator.observe(&blank()).is_err());
        assert_eq!(aggregator.stats().frames_processed, 0);
    }
}
