//! Pixelmatch - perceptual, antialiasing-aware image comparison
//!
//! This library provides functionality to:
//! - Count pixels that differ between two RGBA renders beyond a perceptual threshold
//! - Detect and exclude differences caused by antialiasing
//! - Render a diff image highlighting real and antialiasing differences
//! - Load and save PNGs and check diffs against golden images

pub mod antialias;
pub mod buffer;
pub mod cli;
pub mod color;
pub mod compose;
pub mod config;
pub mod delta;
pub mod engine;
pub mod error;
pub mod golden;
pub mod options;
pub mod output;

pub use buffer::{ImageView, ImageViewMut};
pub use color::Color;
pub use compose::PixelClass;
pub use engine::{compare, compare_images, pixelmatch, pixelmatch_with, DiffOutcome, Parallelism};
pub use error::PixelmatchError;
pub use options::Options;
