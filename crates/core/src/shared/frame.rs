use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

/// A decoded video frame: interleaved 8-bit samples in row-major order.
///
/// Readers hand frames over in whatever channel layout they decode to;
/// analysis only ever sees the grayscale conversion.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Converts to single-channel luma.
    ///
    /// Accepts gray, RGB and RGBA layouts. Returns `None` for other channel
    /// counts or when the buffer does not match the dimensions.
    pub fn into_grayscale(self) -> Option<GrayImage> {
        let (w, h) = (self.width, self.height);
        match self.channels {
            1 => GrayImage::from_raw(w, h, self.data),
            3 => RgbImage::from_raw(w, h, self.data)
                .map(|rgb| DynamicImage::ImageRgb8(rgb).to_luma8()),
            4 => RgbaImage::from_raw(w, h, self.data)
                .map(|rgba| DynamicImage::ImageRgba8(rgba).to_luma8()),
            _ => None,
        }
    }
}
