//! Antialiasing pixel detection
//!
//! Based on "Anti-aliased Pixel and Intensity Slope Detector" by V. Vysniauskas, 2009.
//! A differing pixel counts as antialiasing when it sits on a one-directional
//! brightness slope between two flat regions, in either of the two renders.

use crate::buffer::ImageView;
use crate::delta::luma_delta;

/// Neighbors identical to a pixel before it counts as part of a flat region.
const FLAT_SIBLINGS: u8 = 2;

/// Clamped 3x3 window around (x, y): (x0, y0, x1, y1) inclusive.
#[inline]
fn window(img: &ImageView<'_>, x: u32, y: u32) -> (u32, u32, u32, u32) {
    (
        x.saturating_sub(1),
        y.saturating_sub(1),
        (x + 1).min(img.width() - 1),
        (y + 1).min(img.height() - 1),
    )
}

/// Pixels on the image border start with one implicit identical neighbor.
#[inline]
fn border_seed(img: &ImageView<'_>, x: u32, y: u32) -> u8 {
    let (x0, y0, x1, y1) = window(img, x, y);
    u8::from(x == x0 || x == x1 || y == y0 || y == y1)
}

/// Check whether pixel (x, y) of `img` is likely antialiasing, using `other`
/// (the second render) to confirm the flat regions on either side of the slope.
pub fn is_antialiased(img: &ImageView<'_>, x: u32, y: u32, other: &ImageView<'_>) -> bool {
    let (x0, y0, x1, y1) = window(img, x, y);
    let center = img.pixel(x, y);

    let mut zeroes = border_seed(img, x, y);
    let mut min = 0.0;
    let mut max = 0.0;
    let mut min_at = (0, 0);
    let mut max_at = (0, 0);

    for nx in x0..=x1 {
        for ny in y0..=y1 {
            if nx == x && ny == y {
                continue;
            }

            let delta = luma_delta(center, img.pixel(nx, ny));
            if delta == 0.0 {
                zeroes += 1;
                if zeroes > FLAT_SIBLINGS {
                    return false;
                }
            } else if delta < min {
                min = delta;
                min_at = (nx, ny);
            } else if delta > max {
                max = delta;
                max_at = (nx, ny);
            }
        }
    }

    // a slope needs both a darker and a brighter neighbor
    if min == 0.0 || max == 0.0 {
        return false;
    }

    let flat_in_both = |(px, py): (u32, u32)| {
        has_many_siblings(img, px, py) && has_many_siblings(other, px, py)
    };
    flat_in_both(min_at) || flat_in_both(max_at)
}

/// Check whether pixel (x, y) has more than two byte-identical neighbors.
pub fn has_many_siblings(img: &ImageView<'_>, x: u32, y: u32) -> bool {
    let (x0, y0, x1, y1) = window(img, x, y);
    let mut zeroes = border_seed(img, x, y);

    for nx in x0..=x1 {
        for ny in y0..=y1 {
            if nx == x && ny == y {
                continue;
            }
            if img.same_pixel(x, y, nx, ny) {
                zeroes += 1;
            }
            if zeroes > FLAT_SIBLINGS {
                return true;
            }
        }
    }
    false
}
