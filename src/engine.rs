//! Pixel-by-pixel comparison driver
//!
//! Walks both images in raster order, classifies each pixel as a match, an
//! antialiasing difference or a real difference, and optionally renders the
//! diff image. Rows are independent, so large images are split across the
//! rayon thread pool and the per-row mismatch counts are summed.

use image::RgbaImage;
use log::debug;
use rayon::prelude::*;

use crate::antialias::is_antialiased;
use crate::buffer::{check_same_layout, ImageView, ImageViewMut, BYTES_PER_PIXEL};
use crate::color::Color;
use crate::compose::{compose_pixel, PixelClass};
use crate::delta::{color_delta, max_delta};
use crate::error::PixelmatchError;
use crate::options::Options;

/// Images with fewer pixels than this are compared on the calling thread.
const PARALLEL_MIN_PIXELS: u64 = 64 * 1024;

/// Whether the comparison may use the rayon thread pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Split rows across threads for large images
    #[default]
    Auto,
    /// Always run on the calling thread
    Sequential,
}

/// Result of [`compare_images`].
#[derive(Debug, Clone)]
pub struct DiffOutcome {
    /// Number of pixels classified as genuinely different
    pub mismatched: usize,
    /// Total pixels compared
    pub total: usize,
    /// Rendered diff image
    pub diff: RgbaImage,
}

impl DiffOutcome {
    /// Mismatched pixels as a percentage of all pixels.
    pub fn mismatch_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mismatched as f64 * 100.0 / self.total as f64
        }
    }
}

/// Compare two images, optionally rendering a diff, and return the mismatch count.
///
/// All views must share width, height and stride. The diff target, when given,
/// is fully overwritten: visible pixels get the rendered diff and any row padding
/// beyond `width` is zeroed.
///
/// # Examples
///
/// ```
/// use pixelmatch::{pixelmatch, ImageView, Options};
///
/// let a = [255u8; 4 * 4];
/// let mut b = a;
/// b[0] = 0;
/// let va = ImageView::new(&a, 2, 2, 2).unwrap();
/// let vb = ImageView::new(&b, 2, 2, 2).unwrap();
/// assert_eq!(pixelmatch(va, vb, None, &Options::default()).unwrap(), 1);
/// ```
pub fn pixelmatch(
    img_a: ImageView<'_>,
    img_b: ImageView<'_>,
    diff: Option<ImageViewMut<'_>>,
    options: &Options,
) -> Result<usize, PixelmatchError> {
    pixelmatch_with(img_a, img_b, diff, options, Parallelism::Auto)
}

/// [`pixelmatch`] with explicit control over threading.
pub fn pixelmatch_with(
    img_a: ImageView<'_>,
    img_b: ImageView<'_>,
    mut diff: Option<ImageViewMut<'_>>,
    options: &Options,
    parallelism: Parallelism,
) -> Result<usize, PixelmatchError> {
    check_same_layout(&img_a, &img_b, diff.as_ref())?;

    let (width, height) = (img_a.width(), img_a.height());
    if width == 0 || height == 0 {
        return Ok(0);
    }

    if diff.is_none() && img_a.pixels_eq(&img_b) {
        debug!("{width}x{height}: images are identical");
        return Ok(0);
    }

    let cutoff = max_delta(options.threshold);
    let parallel = parallelism == Parallelism::Auto
        && u64::from(width) * u64::from(height) >= PARALLEL_MIN_PIXELS;
    let row_bytes = img_a.stride() * BYTES_PER_PIXEL;

    let mismatched: usize = match diff.as_mut() {
        Some(out) if parallel => out
            .data_mut()
            .par_chunks_mut(row_bytes)
            .enumerate()
            .map(|(y, row)| compare_row(&img_a, &img_b, y as u32, cutoff, options, Some(row)))
            .sum(),
        Some(out) => out
            .data_mut()
            .chunks_mut(row_bytes)
            .enumerate()
            .map(|(y, row)| compare_row(&img_a, &img_b, y as u32, cutoff, options, Some(row)))
            .sum(),
        None if parallel => (0..height)
            .into_par_iter()
            .map(|y| compare_row(&img_a, &img_b, y, cutoff, options, None))
            .sum(),
        None => (0..height)
            .map(|y| compare_row(&img_a, &img_b, y, cutoff, options, None))
            .sum(),
    };

    debug!(
        "{width}x{height} (stride {}): {mismatched} mismatched, cutoff {cutoff:.3}, parallel={parallel}",
        img_a.stride()
    );
    Ok(mismatched)
}

/// Compare raw RGBA8 buffers laid out with `stride` samples per row.
///
/// Every buffer must be exactly `stride * height * 4` bytes long. Padding
/// samples of `diff` are zeroed.
pub fn compare(
    img_a: &[u8],
    img_b: &[u8],
    diff: Option<&mut [u8]>,
    width: u32,
    height: u32,
    stride: usize,
    options: &Options,
) -> Result<usize, PixelmatchError> {
    let a = ImageView::new(img_a, width, height, stride)?;
    let b = ImageView::new(img_b, width, height, stride)?;
    let diff = diff.map(|d| ImageViewMut::new(d, width, height, stride)).transpose()?;
    pixelmatch(a, b, diff, options)
}

/// Compare two decoded images and render a fresh diff image.
pub fn compare_images(
    img_a: &RgbaImage,
    img_b: &RgbaImage,
    options: &Options,
) -> Result<DiffOutcome, PixelmatchError> {
    if img_a.dimensions() != img_b.dimensions() {
        return Err(PixelmatchError::InvalidInput(format!(
            "image sizes do not match: {}x{} vs {}x{}",
            img_a.width(),
            img_a.height(),
            img_b.width(),
            img_b.height()
        )));
    }

    let mut diff = RgbaImage::new(img_a.width(), img_a.height());
    let mismatched = pixelmatch(
        ImageView::from_image(img_a),
        ImageView::from_image(img_b),
        Some(ImageViewMut::from_image(&mut diff)),
        options,
    )?;
    let total = img_a.width() as usize * img_a.height() as usize;
    Ok(DiffOutcome { mismatched, total, diff })
}

/// Classify pixel (x, y) of two same-layout views against a squared-distance `cutoff`.
pub fn classify_pixel(
    img_a: &ImageView<'_>,
    img_b: &ImageView<'_>,
    x: u32,
    y: u32,
    cutoff: f64,
    options: &Options,
) -> PixelClass {
    let pa = img_a.pixel(x, y);
    let pb = img_b.pixel(x, y);
    classify(img_a, img_b, x, y, pa, pb, cutoff, options)
}

#[inline]
fn classify(
    img_a: &ImageView<'_>,
    img_b: &ImageView<'_>,
    x: u32,
    y: u32,
    pa: Color,
    pb: Color,
    cutoff: f64,
    options: &Options,
) -> PixelClass {
    if pa == pb || color_delta(pa, pb).abs() <= cutoff {
        return PixelClass::Match;
    }
    if !options.include_aa
        && (is_antialiased(img_a, x, y, img_b) || is_antialiased(img_b, x, y, img_a))
    {
        PixelClass::Antialiased
    } else {
        PixelClass::Diff
    }
}

/// Compare row `y`, writing diff pixels into `out` (the row's bytes) if given.
fn compare_row(
    img_a: &ImageView<'_>,
    img_b: &ImageView<'_>,
    y: u32,
    cutoff: f64,
    options: &Options,
    mut out: Option<&mut [u8]>,
) -> usize {
    let mut mismatched = 0;
    for x in 0..img_a.width() {
        let pa = img_a.pixel(x, y);
        let pb = img_b.pixel(x, y);
        let class = classify(img_a, img_b, x, y, pa, pb, cutoff, options);
        if class == PixelClass::Diff {
            mismatched += 1;
        }
        if let Some(row) = out.as_deref_mut() {
            compose_pixel(class, pa, pb, options).write_to(row, x as usize * BYTES_PER_PIXEL);
        }
    }
    // padding past the visible width is cleared
    if let Some(row) = out {
        row[img_a.width() as usize * BYTES_PER_PIXEL..].fill(0);
    }
    mismatched
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::rgba(255, 255, 255, 255);
    const BLACK: Color = Color::rgba(0, 0, 0, 255);

    fn solid(width: u32, height: u32, c: Color) -> Vec<u8> {
        let mut data = vec![0u8; (width * height) as usize * 4];
        for i in 0..(width * height) as usize {
            c.write_to(&mut data, i * 4);
        }
        data
    }

    #[test]
    fn test_single_changed_pixel() {
        let a = solid(4, 4, WHITE);
        let mut b = a.clone();
        BLACK.write_to(&mut b, (4 + 2) * 4);
        let mut diff = vec![0u8; a.len()];

        let n = compare(&a, &b, Some(&mut diff), 4, 4, 4, &Options::default()).unwrap();
        assert_eq!(n, 1);
        assert_eq!(Color::from_slice(&diff, (4 + 2) * 4), Color::RED);
        // untouched pixel rendered as faded white
        assert_eq!(Color::from_slice(&diff, 0), Color::rgba(255, 255, 255, 255));
    }

    #[test]
    fn test_size_mismatch_is_invalid_input() {
        let a = [0u8; 8];
        let b = [0u8; 9];
        let err = compare(&a, &b, None, 2, 1, 2, &Options::default()).unwrap_err();
        assert!(err.to_string().starts_with("image data size does not match width/height"));

        let c = [0u8; 9];
        let err = compare(&c, &c, None, 2, 1, 2, &Options::default()).unwrap_err();
        assert!(err.to_string().starts_with("image data size does not match width/height"));
    }

    #[test]
    fn test_diff_buffer_size_checked() {
        let a = [0u8; 8];
        let mut diff = [0u8; 4];
        assert!(compare(&a, &a, Some(&mut diff), 2, 1, 2, &Options::default()).is_err());
    }

    #[test]
    fn test_empty_image() {
        assert_eq!(compare(&[], &[], None, 0, 0, 0, &Options::default()).unwrap(), 0);
    }

    #[test]
    fn test_stride_padding_ignored() {
        // 2 visible columns out of 3; the padding column differs wildly
        let mut a = solid(3, 2, WHITE);
        let mut b = solid(3, 2, WHITE);
        BLACK.write_to(&mut a, 2 * 4);
        Color::rgba(1, 2, 3, 4).write_to(&mut b, (3 + 2) * 4);
        assert_eq!(compare(&a, &b, None, 2, 2, 3, &Options::default()).unwrap(), 0);
    }

    #[test]
    fn test_diff_row_padding_is_cleared() {
        // 2 visible columns out of 3
        let a = solid(3, 2, WHITE);
        let mut b = a.clone();
        BLACK.write_to(&mut b, 4);
        let mut diff = vec![0xAB; a.len()];

        let n = compare(&a, &b, Some(&mut diff), 2, 2, 3, &Options::default()).unwrap();
        assert_eq!(n, 1);
        assert_eq!(Color::from_slice(&diff, 4), Color::RED);
        for y in 0..2 {
            assert_eq!(Color::from_slice(&diff, (y * 3 + 2) * 4), Color::TRANSPARENT);
        }
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let (w, h) = (300, 300);
        let a = solid(w, h, WHITE);
        let mut b = a.clone();
        for i in (0..(w * h) as usize).step_by(7) {
            BLACK.write_to(&mut b, i * 4);
        }
        let va = ImageView::new(&a, w, h, w as usize).unwrap();
        let vb = ImageView::new(&b, w, h, w as usize).unwrap();

        let mut diff_par = vec![0u8; a.len()];
        let mut diff_seq = vec![0u8; a.len()];
        let par = pixelmatch_with(
            va,
            vb,
            Some(ImageViewMut::new(&mut diff_par, w, h, w as usize).unwrap()),
            &Options::default(),
            Parallelism::Auto,
        )
        .unwrap();
        let seq = pixelmatch_with(
            va,
            vb,
            Some(ImageViewMut::new(&mut diff_seq, w, h, w as usize).unwrap()),
            &Options::default(),
            Parallelism::Sequential,
        )
        .unwrap();
        assert_eq!(par, seq);
        assert!(par > 0);
        assert_eq!(diff_par, diff_seq);
    }

    #[test]
    fn test_classify_pixel_threshold() {
        let a = solid(1, 1, Color::rgba(100, 100, 100, 255));
        let b = solid(1, 1, Color::rgba(104, 100, 100, 255));
        let va = ImageView::new(&a, 1, 1, 1).unwrap();
        let vb = ImageView::new(&b, 1, 1, 1).unwrap();
        let options = Options::default();
        assert_eq!(
            classify_pixel(&va, &vb, 0, 0, max_delta(0.1), &options),
            PixelClass::Match
        );
        assert_eq!(classify_pixel(&va, &vb, 0, 0, max_delta(0.0), &options), PixelClass::Diff);
    }

    #[test]
    fn test_compare_images_rejects_size_mismatch() {
        let a = RgbaImage::new(2, 2);
        let b = RgbaImage::new(3, 2);
        assert!(compare_images(&a, &b, &Options::default()).is_err());
    }

    #[test]
    fn test_compare_images_outcome() {
        let a = RgbaImage::from_pixel(4, 2, WHITE.into());
        let mut b = a.clone();
        b.put_pixel(3, 1, BLACK.into());
        let outcome = compare_images(&a, &b, &Options::default()).unwrap();
        assert_eq!(outcome.mismatched, 1);
        assert_eq!(outcome.total, 8);
        assert!((outcome.mismatch_percent() - 12.5).abs() < 1e-9);
        assert_eq!(Color::from(*outcome.diff.get_pixel(3, 1)), Color::RED);
    }
}
