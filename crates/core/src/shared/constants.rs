pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Directory name used under the platform cache dir for downloaded models.
pub const APP_DIR_NAME: &str = "Engagecam";

/// Only every Nth frame is analyzed; the rest are decoded and discarded.
pub const FRAME_SKIP: usize = 10;

/// Pixels of average face-center movement per stability point lost.
pub const STABILITY_DIVISOR: f64 = 5.0;

/// Stability reported when fewer than two face positions were seen.
pub const NEUTRAL_STABILITY: f64 = 50.0;

/// Eye boxes required inside the face region to count as eye contact.
pub const EYE_COUNT_THRESHOLD: usize = 2;

/// Progress is reported once per this many decoded frames.
pub const PROGRESS_INTERVAL: usize = 500;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv"];
