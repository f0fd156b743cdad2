//! Face and eye detector backed by a YOLO face-pose model on ONNX Runtime.
//!
//! Faces come straight from the model's boxes. Eyes are derived from the
//! model's eye keypoints when it is run again on a face crop, so a single
//! model file serves both halves of the detection contract.

use std::path::{Path, PathBuf};

use image::GrayImage;
use thiserror::Error;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::detection_box::DetectionBox;

use super::execution_provider::preferred_execution_providers;
use super::model_resolver::{self, ModelResolveError, ProgressFn};

/// Fallback model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default confidence threshold for face detection.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// Keypoint values per detection row (5 landmarks × x, y, conf).
const NUM_KEYPOINT_VALUES: usize = 15;

/// Minimum keypoint confidence for an eye to count as visible.
const KEYPOINT_CONF_THRESH: f64 = 0.5;

/// Side of a synthesized eye box, relative to the face width.
const EYE_BOX_RATIO: f64 = 0.25;

#[derive(Error, Debug)]
pub enum DetectorInitError {
    #[error("failed to resolve detection model: {0}")]
    Resolve(#[from] ModelResolveError),
    #[error("detection model not found at {0}")]
    ModelMissing(PathBuf),
    #[error("failed to load detection model {path}: {reason}")]
    Load { path: PathBuf, reason: String },
}

pub struct OnnxYoloDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxYoloDetector {
    /// Loads the model at `model_path`.
    ///
    /// The input resolution is read from the model's NCHW input shape,
    /// falling back to 640 when the shape is dynamic.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, DetectorInitError> {
        if !model_path.is_file() {
            return Err(DetectorInitError::ModelMissing(model_path.to_path_buf()));
        }
        let load_error = |e: &dyn std::fmt::Display| DetectorInitError::Load {
            path: model_path.to_path_buf(),
            reason: e.to_string(),
        };

        let builder = ort::session::Session::builder()
            .map_err(|e| load_error(&e))?
            .with_execution_providers(preferred_execution_providers())
            .map_err(|e| load_error(&e))?;
        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| load_error(&e))?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() >= 4 && shape[2] > 0 {
                        Some(shape[2] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        log::info!(
            "Detection model loaded from {} (input {input_size}px)",
            model_path.display()
        );

        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }

    /// Resolves the model (explicit path, cache, or download) and loads it.
    pub fn resolve(
        explicit: Option<&Path>,
        name: &str,
        url: &str,
        confidence: f64,
        progress: Option<ProgressFn>,
    ) -> Result<Self, DetectorInitError> {
        let model_path = model_resolver::resolve(name, url, explicit, progress)?;
        Self::new(&model_path, confidence)
    }

    /// Runs the model and returns NMS-filtered detections, most confident first.
    fn infer(
        &mut self,
        image: &GrayImage,
    ) -> Result<Vec<RawDetection>, Box<dyn std::error::Error>> {
        let (input_tensor, scale, pad_x, pad_y) = letterbox(image, self.input_size);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        if shape.len() != 3 {
            return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
        }

        // Output is either [1, features, detections] or [1, detections, features].
        let transposed = shape[1] < shape[2];
        let (num_dets, num_feats) = if transposed {
            (shape[2], shape[1])
        } else {
            (shape[1], shape[2])
        };
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;

        let mut raw = Vec::new();
        for i in 0..num_dets {
            let row: Vec<f32> = if transposed {
                (0..num_feats).map(|f| data[f * num_dets + i]).collect()
            } else {
                data[i * num_feats..(i + 1) * num_feats].to_vec()
            };
            if let Some(det) = parse_row(&row, self.confidence, scale, pad_x, pad_y) {
                raw.push(det);
            }
        }

        Ok(nms(&mut raw, NMS_IOU_THRESH))
    }
}

impl FaceDetector for OnnxYoloDetector {
    fn detect_faces(
        &mut self,
        image: &GrayImage,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
        let (w, h) = image.dimensions();
        Ok(self
            .infer(image)?
            .iter()
            .filter_map(|d| d.to_box().clamp_to(w, h))
            .collect())
    }

    fn detect_eyes(
        &mut self,
        face: &GrayImage,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
        let (w, h) = face.dimensions();
        Ok(self
            .infer(face)?
            .first()
            .map(|d| eye_boxes(d, w, h))
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Letterbox-resize a grayscale image to `target_size` × `target_size`,
/// replicating luma into the three input channels.
///
/// Returns `(NCHW float32 tensor, scale, pad_x, pad_y)`.
fn letterbox(image: &GrayImage, target_size: u32) -> (ndarray::Array4<f32>, f64, u32, u32) {
    let (src_w, src_h) = image.dimensions();
    let target = target_size as f64;

    let scale = (target / src_w as f64).min(target / src_h as f64);
    let new_w = ((src_w as f64 * scale).round() as u32).min(target_size);
    let new_h = ((src_h as f64 * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    // Padding is 114/255 gray, the YOLO convention.
    let fill = 114.0f32 / 255.0;
    let side = target_size as usize;
    let mut tensor = ndarray::Array4::<f32>::from_elem((1, 3, side, side), fill);

    for y in 0..new_h {
        let src_y = ((y as f64 / scale) as u32).min(src_h - 1);
        for x in 0..new_w {
            let src_x = ((x as f64 / scale) as u32).min(src_w - 1);
            let value = image.get_pixel(src_x, src_y)[0] as f32 / 255.0;
            let (ty, tx) = ((pad_y + y) as usize, (pad_x + x) as usize);
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = value;
            }
        }
    }

    (tensor, scale, pad_x, pad_y)
}

// ---------------------------------------------------------------------------
// Postprocessing
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct RawDetection {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    confidence: f64,
    /// Left and right eye keypoints, when confidently visible.
    eyes: [Option<(f64, f64)>; 2],
}

impl RawDetection {
    fn to_box(&self) -> DetectionBox {
        DetectionBox::new(
            self.x1.round() as i32,
            self.y1.round() as i32,
            (self.x2 - self.x1).round() as i32,
            (self.y2 - self.y1).round() as i32,
        )
    }
}

/// Decodes one output row `[cx, cy, w, h, conf, kp0_x, kp0_y, kp0_conf, ...]`
/// back into source-image coordinates.
fn parse_row(
    row: &[f32],
    confidence: f64,
    scale: f64,
    pad_x: u32,
    pad_y: u32,
) -> Option<RawDetection> {
    if row.len() < 5 {
        return None;
    }
    let conf = row[4] as f64;
    if conf < confidence {
        return None;
    }

    let unpad_x = |v: f64| (v - pad_x as f64) / scale;
    let unpad_y = |v: f64| (v - pad_y as f64) / scale;

    let (cx, cy, w, h) = (row[0] as f64, row[1] as f64, row[2] as f64, row[3] as f64);

    let mut eyes = [None, None];
    if row.len() >= 5 + NUM_KEYPOINT_VALUES {
        for (k, eye) in eyes.iter_mut().enumerate() {
            let base = 5 + k * 3;
            if row[base + 2] as f64 >= KEYPOINT_CONF_THRESH {
                *eye = Some((unpad_x(row[base] as f64), unpad_y(row[base + 1] as f64)));
            }
        }
    }

    Some(RawDetection {
        x1: unpad_x(cx - w / 2.0),
        y1: unpad_y(cy - h / 2.0),
        x2: unpad_x(cx + w / 2.0),
        y2: unpad_y(cy + h / 2.0),
        confidence: conf,
        eyes,
    })
}

/// Square boxes around each visible eye keypoint, clamped to the crop.
fn eye_boxes(det: &RawDetection, width: u32, height: u32) -> Vec<DetectionBox> {
    let side = ((det.x2 - det.x1) * EYE_BOX_RATIO).max(1.0);
    det.eyes
        .iter()
        .flatten()
        .filter_map(|&(ex, ey)| {
            DetectionBox::new(
                (ex - side / 2.0).round() as i32,
                (ey - side / 2.0).round() as i32,
                side.round() as i32,
                side.round() as i32,
            )
            .clamp_to(width, height)
        })
        .collect()
}

/// Greedy NMS: sort by confidence descending, suppress overlapping boxes.
fn nms(dets: &mut [RawDetection], iou_thresh: f64) -> Vec<RawDetection> {
    dets.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<RawDetection> = Vec::new();
    for det in dets.iter() {
        let corners = [det.x1, det.y1, det.x2, det.y2];
        let suppressed = keep
            .iter()
            .any(|k| bbox_iou(&[k.x1, k.y1, k.x2, k.y2], &corners) > iou_thresh);
        if !suppressed {
            keep.push(det.clone());
        }
    }
    keep
}

/// IoU between two boxes given as `[x1, y1, x2, y2]`.
fn bbox_iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
