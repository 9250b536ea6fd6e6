//! Borrowed RGBA8 pixel buffers with an explicit row stride
//!
//! A stride larger than the width lets a view cover a sub-rectangle of a
//! larger backing image without copying.

use crate::color::Color;
use crate::error::PixelmatchError;

/// Fixed diagnostic used for every buffer size violation.
pub const SIZE_MISMATCH: &str = "image data size does not match width/height";

/// Bytes per RGBA8 sample.
pub const BYTES_PER_PIXEL: usize = 4;

/// Check that a buffer of `len` bytes exactly covers `stride * height` samples.
pub(crate) fn validate_len(
    len: usize,
    width: u32,
    height: u32,
    stride: usize,
) -> Result<(), PixelmatchError> {
    if stride < width as usize {
        return Err(PixelmatchError::InvalidInput(format!(
            "{SIZE_MISMATCH}: stride {stride} is smaller than width {width}"
        )));
    }
    let expected = stride
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL));
    match expected {
        Some(expected) if expected == len => Ok(()),
        Some(expected) => Err(PixelmatchError::InvalidInput(format!(
            "{SIZE_MISMATCH}: expected {expected} bytes, got {len}"
        ))),
        None => Err(PixelmatchError::InvalidInput(format!(
            "{SIZE_MISMATCH}: {stride}x{height} overflows"
        ))),
    }
}

/// Read-only view of an RGBA8 image.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Create a view, checking that `data` holds exactly `stride * height` samples.
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        stride: usize,
    ) -> Result<Self, PixelmatchError> {
        validate_len(data.len(), width, height, stride)?;
        Ok(Self { data, width, height, stride })
    }

    /// View over a tightly packed `image::RgbaImage`.
    pub fn from_image(image: &'a image::RgbaImage) -> Self {
        Self {
            data: image.as_raw(),
            width: image.width(),
            height: image.height(),
            stride: image.width() as usize,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Byte offset of the sample at (x, y).
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.stride + x as usize) * BYTES_PER_PIXEL
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        Color::from_slice(self.data, self.offset(x, y))
    }

    /// Byte-equality of two samples, without building `Color`s.
    #[inline]
    pub(crate) fn same_pixel(&self, x1: u32, y1: u32, x2: u32, y2: u32) -> bool {
        let a = self.offset(x1, y1);
        let b = self.offset(x2, y2);
        self.data[a..a + BYTES_PER_PIXEL] == self.data[b..b + BYTES_PER_PIXEL]
    }

    /// The visible `width * 4` bytes of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = self.offset(0, y);
        &self.data[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    fn same_shape(&self, other: &ImageView<'_>) -> bool {
        self.width == other.width && self.height == other.height && self.stride == other.stride
    }

    /// True if every visible sample equals the other view's sample.
    pub fn pixels_eq(&self, other: &ImageView<'_>) -> bool {
        self.same_shape(other) && (0..self.height).all(|y| self.row(y) == other.row(y))
    }
}

/// Mutable view receiving the diff image.
#[derive(Debug)]
pub struct ImageViewMut<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> ImageViewMut<'a> {
    pub fn new(
        data: &'a mut [u8],
        width: u32,
        height: u32,
        stride: usize,
    ) -> Result<Self, PixelmatchError> {
        validate_len(data.len(), width, height, stride)?;
        Ok(Self { data, width, height, stride })
    }

    pub fn from_image(image: &'a mut image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self { data: &mut **image, width, height, stride: width as usize }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }
}

/// Ensure two views (and the diff target, if any) share width, height and stride.
pub(crate) fn check_same_layout(
    a: &ImageView<'_>,
    b: &ImageView<'_>,
    diff: Option<&ImageViewMut<'_>>,
) -> Result<(), PixelmatchError> {
    if !a.same_shape(b) {
        return Err(PixelmatchError::InvalidInput(format!(
            "{SIZE_MISMATCH}: {}x{} (stride {}) vs {}x{} (stride {})",
            a.width, a.height, a.stride, b.width, b.height, b.stride
        )));
    }
    if let Some(d) = diff {
        if d.width != a.width || d.height != a.height || d.stride != a.stride {
            return Err(PixelmatchError::InvalidInput(format!(
                "{SIZE_MISMATCH}: diff output is {}x{} (stride {}), images are {}x{} (stride {})",
                d.width, d.height, d.stride, a.width, a.height, a.stride
            )));
        }
    }
    Ok(())
}
