//! Diff image pixel synthesis

use crate::color::Color;
use crate::delta::{blend, luma, rgb2y};
use crate::options::Options;

/// Alpha written for faded copies of matching pixels.
///
/// Opaque, as in the reference pixelmatch renderer: the fade comes from blending
/// the luma toward white, not from the alpha channel.
pub const MATCH_ALPHA: u8 = 255;

/// How the comparison classified a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelClass {
    /// Identical or within the threshold
    Match,
    /// Differs, but explained by antialiasing in one of the renders
    Antialiased,
    /// Genuine difference, counted as a mismatch
    Diff,
}

/// Render one diff-image sample for a classified pixel.
pub fn compose_pixel(class: PixelClass, a: Color, b: Color, options: &Options) -> Color {
    match class {
        PixelClass::Diff => diff_highlight(a, b, options).opaque(),
        PixelClass::Antialiased if options.diff_mask => Color::TRANSPARENT,
        PixelClass::Antialiased => options.aa_color.opaque(),
        PixelClass::Match if options.diff_mask => Color::TRANSPARENT,
        PixelClass::Match => faded(a, options.alpha),
    }
}

/// `diff_color` when `a` is the darker (or equally bright) sample, otherwise the
/// alternate color if one is configured.
fn diff_highlight(a: Color, b: Color, options: &Options) -> Color {
    if luma(a) > luma(b) {
        options.diff_color_alt.unwrap_or(options.diff_color)
    } else {
        options.diff_color
    }
}

/// Grayscale copy of `c` blended toward white, `alpha` being its remaining opacity.
pub fn faded(c: Color, alpha: f64) -> Color {
    let y = rgb2y(c.r as f64, c.g as f64, c.b as f64);
    let val = blend(y, alpha * c.a as f64 / 255.0) as u8;
    Color::rgba(val, val, val, MATCH_ALPHA)
}
