use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Frame count as reported by the container; 0 when unknown.
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Playback length implied by the reported frame count.
    ///
    /// Sources without a usable frame rate report a duration of zero.
    pub fn duration_seconds(&self) -> f64 {
        duration_seconds(self.total_frames, self.fps)
    }
}

pub fn duration_seconds(total_frames: usize, fps: f64) -> f64 {
    if fps > 0.0 {
        total_frames as f64 / fps
    } else {
        0.0
    }
}
