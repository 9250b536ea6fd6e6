//! Golden diff images for visual regression tests
//!
//! A freshly rendered diff is checked against an approved PNG stored next to
//! the test fixtures. Set `UPDATE_TEST_IMAGES` to overwrite the golden files
//! with the current output instead of comparing.

use image::RgbaImage;
use log::warn;
use std::path::{Path, PathBuf};

use crate::output::{images_equal, load_rgba_png, save_png, OutputError};

/// Environment variable that switches [`check_golden`] into update mode.
pub const UPDATE_ENV_VAR: &str = "UPDATE_TEST_IMAGES";

/// Outcome of checking a diff image against its golden file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoldenStatus {
    /// Pixels match the golden image
    Matched,
    /// The golden image was (re)written from the actual diff
    Updated,
    /// Golden and actual differ; the actual diff was saved to `actual`
    Mismatch { actual: PathBuf },
    /// Golden and actual have different dimensions
    SizeMismatch { expected: (u32, u32), actual: (u32, u32) },
}

impl GoldenStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, GoldenStatus::Matched | GoldenStatus::Updated)
    }
}

/// True when the update switch is set in the environment.
pub fn update_mode() -> bool {
    std::env::var_os(UPDATE_ENV_VAR).is_some()
}

/// Check `actual` against the golden PNG at `golden`, or overwrite it in update mode.
pub fn check_golden(actual: &RgbaImage, golden: &Path) -> Result<GoldenStatus, OutputError> {
    if update_mode() {
        warn!("{UPDATE_ENV_VAR} is set, updating {}", golden.display());
        save_png(actual, golden)?;
        return Ok(GoldenStatus::Updated);
    }

    let expected = load_rgba_png(golden)?;
    if expected.dimensions() != actual.dimensions() {
        return Ok(GoldenStatus::SizeMismatch {
            expected: expected.dimensions(),
            actual: actual.dimensions(),
        });
    }

    let (width, height) = actual.dimensions();
    if images_equal(actual.as_raw(), expected.as_raw(), width, height, width as usize) {
        return Ok(GoldenStatus::Matched);
    }

    let actual_path = std::env::temp_dir().join(escape_filename(golden));
    warn!(
        "diff does not match {}, saving actual diff to {}",
        golden.display(),
        actual_path.display()
    );
    save_png(actual, &actual_path)?;
    Ok(GoldenStatus::Mismatch { actual: actual_path })
}

/// Flatten a path into a single file name by replacing separators with `_`.
pub fn escape_filename(path: &Path) -> String {
    path.to_string_lossy().chars().map(|c| if c == '/' || c == '\\' { '_' } else { c }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_escape_filename() {
        assert_eq!(
            escape_filename(Path::new("tests/testdata/1diff.png")),
            "tests_testdata_1diff.png"
        );
        assert_eq!(escape_filename(Path::new("a\\b.png")), "a_b.png");
    }

    #[test]
    #[serial]
    fn test_check_golden_matched_and_mismatch() {
        std::env::remove_var(UPDATE_ENV_VAR);
        let dir = tempdir().unwrap();
        let golden = dir.path().join("golden.png");
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        save_png(&image, &golden).unwrap();

        assert_eq!(check_golden(&image, &golden).unwrap(), GoldenStatus::Matched);

        let mut changed = image.clone();
        changed.put_pixel(1, 1, Rgba([0, 0, 0, 255]));
        match check_golden(&changed, &golden).unwrap() {
            GoldenStatus::Mismatch { actual } => {
                assert!(actual.exists());
                std::fs::remove_file(actual).unwrap();
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_check_golden_size_mismatch() {
        std::env::remove_var(UPDATE_ENV_VAR);
        let dir = tempdir().unwrap();
        let golden = dir.path().join("golden.png");
        save_png(&RgbaImage::new(2, 2), &golden).unwrap();

        let status = check_golden(&RgbaImage::new(3, 2), &golden).unwrap();
        assert_eq!(status, GoldenStatus::SizeMismatch { expected: (2, 2), actual: (3, 2) });
        assert!(!status.is_ok());
    }

    #[test]
    #[serial]
    fn test_check_golden_update_mode_writes_file() {
        let dir = tempdir().unwrap();
        let golden = dir.path().join("new").join("golden.png");
        let image = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));

        std::env::set_var(UPDATE_ENV_VAR, "1");
        let status = check_golden(&image, &golden);
        std::env::remove_var(UPDATE_ENV_VAR);

        assert_eq!(status.unwrap(), GoldenStatus::Updated);
        assert_eq!(load_rgba_png(&golden).unwrap().as_raw(), image.as_raw());
    }

    #[test]
    #[serial]
    fn test_check_golden_missing_file_errors() {
        std::env::remove_var(UPDATE_ENV_VAR);
        let dir = tempdir().unwrap();
        assert!(check_golden(&RgbaImage::new(1, 1), &dir.path().join("none.png")).is_err());
    }
}
