use image::GrayImage;

/// Axis-aligned bounding box in image-space pixel coordinates.
///
/// Detectors return these in order of preference; the first box of a
/// call is the primary detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectionBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DetectionBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point with integer halving of the box size.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Intersection of the box with a `width` × `height` image.
    ///
    /// Returns `None` when nothing of the box lies inside the image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<DetectionBox> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.x + self.width).min(width as i32);
        let y2 = (self.y + self.height).min(height as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(DetectionBox::new(x1, y1, x2 - x1, y2 - y1))
    }

    /// Copies the part of `image` covered by this box.
    pub fn crop(&self, image: &GrayImage) -> Option<GrayImage> {
        let visible = self.clamp_to(image.width(), image.height())?;
        let sub = image::imageops::crop_imm(
            image,
            visible.x as u32,
            visible.y as u32,
            visible.width as u32,
            visible.height as u32,
        );
        Some(sub.to_image())
    }
}
