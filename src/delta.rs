//! Perceptual color difference in YIQ space
//!
//! Based on "Measuring perceived color difference using YIQ NTSC transmission
//! color space in mobile applications" by Y. Kotsarenko and F. Ramos.

use crate::color::Color;

/// Upper bound of [`color_delta`] over all pairs of samples.
pub const MAX_YIQ_DELTA: f64 = 35215.0;

/// Squared-distance cutoff for a normalized `threshold` in [0, 1].
pub fn max_delta(threshold: f64) -> f64 {
    MAX_YIQ_DELTA * threshold * threshold
}

/// Weighted YIQ distance between two samples.
///
/// The magnitude is symmetric in its arguments. The sign is negative when `a`
/// is brighter than `b`, which the diff renderer uses to pick a highlight color.
pub fn color_delta(a: Color, b: Color) -> f64 {
    if a == b {
        return 0.0;
    }
    let (r1, g1, b1) = composite(a);
    let (r2, g2, b2) = composite(b);

    let y1 = rgb2y(r1, g1, b1);
    let y2 = rgb2y(r2, g2, b2);
    let y = y1 - y2;
    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);

    let delta = 0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q;
    if y1 > y2 {
        -delta
    } else {
        delta
    }
}

/// Signed brightness difference only, `Y(a) - Y(b)`.
pub fn luma_delta(a: Color, b: Color) -> f64 {
    if a == b {
        return 0.0;
    }
    let (r1, g1, b1) = composite(a);
    let (r2, g2, b2) = composite(b);
    rgb2y(r1, g1, b1) - rgb2y(r2, g2, b2)
}

/// Luma of a sample composited over white.
pub fn luma(c: Color) -> f64 {
    let (r, g, b) = composite(c);
    rgb2y(r, g, b)
}

/// Composite a partially transparent sample over a white background.
fn composite(c: Color) -> (f64, f64, f64) {
    let (r, g, b) = (c.r as f64, c.g as f64, c.b as f64);
    if c.a < 255 {
        let a = c.a as f64 / 255.0;
        (blend(r, a), blend(g, a), blend(b, a))
    } else {
        (r, g, b)
    }
}

/// Blend a channel value with white at opacity `a`.
#[inline]
pub(crate) fn blend(c: f64, a: f64) -> f64 {
    255.0 + (c - 255.0) * a
}

#[inline]
pub(crate) fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.29889531 + g * 0.58662247 + b * 0.11448223
}

#[inline]
fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.59597799 - g * 0.27417610 - b * 0.32180189
}

#[inline]
fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.21147017 - g * 0.52261711 + b * 0.31114694
}
