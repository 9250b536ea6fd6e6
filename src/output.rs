//! PNG input/output and raw buffer helpers

use image::RgbaImage;
use std::io;
use std::path::Path;

use crate::buffer::BYTES_PER_PIXEL;

/// Error type for image file operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image decoding or encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Load an image file and convert it to tightly packed RGBA8.
pub fn load_rgba_png(path: &Path) -> Result<RgbaImage, OutputError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Compare two raw RGBA8 buffers row by row, ignoring bytes past `width` in each row.
pub fn images_equal(a: &[u8], b: &[u8], width: u32, height: u32, stride: usize) -> bool {
    let row_len = width as usize * BYTES_PER_PIXEL;
    (0..height as usize).all(|y| {
        let start = y * stride * BYTES_PER_PIXEL;
        match (a.get(start..start + row_len), b.get(start..start + row_len)) {
            (Some(ra), Some(rb)) => ra == rb,
            _ => false,
        }
    })
}
