use ndarray::Array2;

use crate::error::Error;

/// Single grayscale frame handed to the pipeline. Pixels are stored
/// row-major as `(height, width)`; the timestamp is in seconds and must
/// increase monotonically within one feed.
pub struct Frame {
    pub pixels: Array2<u8>,
    pub timestamp: f32,
}

impl Frame {
    #[inline]
    pub fn new(pixels: Array2<u8>, timestamp: f32) -> Self {
        Self { pixels, timestamp }
    }

    /// Wraps a raw luma buffer, rejecting a length that does not match
    /// the stated dimensions.
    pub fn from_luma(width: u32, height: u32, timestamp: f32, data: Vec<u8>) -> Result<Self, Error> {
        let len = data.len();
        Array2::from_shape_vec((height as usize, width as usize), data)
            .map(|pixels| Self { pixels, timestamp })
            .map_err(|_| Error::FrameGeometry { width, height, len })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        self.pixels.dim()
    }
}
