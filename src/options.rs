//! Comparison options

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings for a single comparison. Every field has an independent default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Matching threshold (0 to 1); smaller is more sensitive
    pub threshold: f64,
    /// Count antialiased pixels as mismatches instead of detecting them
    pub include_aa: bool,
    /// Opacity of the faded source image in the diff output
    pub alpha: f64,
    /// Color of antialiased pixels in the diff output
    pub aa_color: Color,
    /// Color of differing pixels where the first image is darker
    pub diff_color: Color,
    /// Color of differing pixels where the first image is brighter; `diff_color` if unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_color_alt: Option<Color>,
    /// Draw the diff over a transparent background (a mask)
    pub diff_mask: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            include_aa: false,
            alpha: 0.1,
            aa_color: Color::YELLOW,
            diff_color: Color::RED,
            diff_color_alt: None,
            diff_mask: false,
        }
    }
}

impl Options {
    /// Check that the fractional fields are within [0, 1].
    ///
    /// Returns one message per offending field.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(0.0..=1.0).contains(&self.threshold) {
            errors.push(format!("threshold must be between 0 and 1, got {}", self.threshold));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            errors.push(format!("alpha must be between 0 and 1, got {}", self.alpha));
        }
        errors
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Options{{threshold={}, include_aa={}, alpha={}, aa_color={}, diff_color={}, diff_color_alt=",
            self.threshold, self.include_aa, self.alpha, self.aa_color, self.diff_color
        )?;
        match self.diff_color_alt {
            Some(c) => write!(f, "{c}")?,
            None => write!(f, "none")?,
        }
        write!(f, ", diff_mask={}}}", self.diff_mask)
    }
}
