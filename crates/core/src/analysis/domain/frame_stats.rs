use crate::shared::detection_box::DetectionBox;

/// Center of the primary face in one sampled frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FacePosition {
    pub x: i32,
    pub y: i32,
}

impl FacePosition {
    pub fn of(face: &DetectionBox) -> Self {
        let (x, y) = face.center();
        Self { x, y }
    }

    pub fn distance_to(&self, other: &FacePosition) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        dx.hypot(dy)
    }
}

/// Running counters for one analysis pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub frames_with_face: usize,
    pub frames_with_eyes: usize,
    pub frames_processed: usize,
    /// Primary face centers in sampling order.
    pub positions: Vec<FacePosition>,
}

impl FrameStats {
    /// Percentage of processed frames that contained a face; 0 when
    /// nothing was processed.
    pub fn face_visibility_pct(&self) -> f64 {
        percentage(self.frames_with_face, self.frames_processed)
    }

    /// Percentage of face frames where both eyes were found; 0 when no
    /// face was ever seen.
    pub fn eye_contact_rate_pct(&self) -> f64 {
        percentage(self.frames_with_eyes, self.frames_with_face)
    }

    /// Mean distance between consecutive face centers, if there are at
    /// least two of them.
    pub fn average_movement(&self) -> Option<f64> {
        if self.positions.len() < 2 {
            return None;
        }
        let total: f64 = self
            .positions
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum();
        Some(total / (self.positions.len() - 1) as f64)
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}
