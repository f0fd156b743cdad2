use image::GrayImage;

use crate::shared::detection_box::DetectionBox;

/// Domain interface for the face and eye detection capability.
///
/// Implementations must be deterministic for a given image and report
/// "nothing found" as an empty vector rather than an error. Detection
/// parameters are fixed when the implementation is constructed.
pub trait FaceDetector: Send {
    /// Faces in a full grayscale frame, primary face first.
    fn detect_faces(
        &mut self,
        image: &GrayImage,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>>;

    /// Eyes inside a face crop, in crop coordinates.
    fn detect_eyes(
        &mut self,
        face: &GrayImage,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>>;
}
