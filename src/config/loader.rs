//! Configuration loading and discovery for `pixelmatch.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{PixelmatchConfig, CONFIG_FILE_NAME};
use crate::color::Color;
use crate::options::Options;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pixelmatch.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub threshold: Option<f64>,
    pub include_aa: Option<bool>,
    pub alpha: Option<f64>,
    pub aa_color: Option<Color>,
    pub diff_color: Option<Color>,
    pub diff_color_alt: Option<Color>,
    pub diff_mask: Option<bool>,
}

/// Find `pixelmatch.toml` by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find `pixelmatch.toml` by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a `pixelmatch.toml` file.
///
/// If a path is provided, loads from that file. Otherwise, uses [`find_config`]
/// to locate one. If no config file is found, returns the default configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("visual-tests/pixelmatch.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<PixelmatchConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(PixelmatchConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<PixelmatchConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: PixelmatchConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Merge CLI overrides into comparison options.
///
/// CLI arguments take precedence over config file values. The merged options
/// are validated again since overrides bypass the config file checks.
pub fn merge_cli_overrides(
    options: &Options,
    overrides: &CliOverrides,
) -> Result<Options, ConfigError> {
    let mut merged = *options;

    if let Some(threshold) = overrides.threshold {
        merged.threshold = threshold;
    }
    if let Some(include_aa) = overrides.include_aa {
        merged.include_aa = include_aa;
    }
    if let Some(alpha) = overrides.alpha {
        merged.alpha = alpha;
    }
    if let Some(aa_color) = overrides.aa_color {
        merged.aa_color = aa_color;
    }
    if let Some(diff_color) = overrides.diff_color {
        merged.diff_color = diff_color;
    }
    if let Some(diff_color_alt) = overrides.diff_color_alt {
        merged.diff_color_alt = Some(diff_color_alt);
    }
    if let Some(diff_mask) = overrides.diff_mask {
        merged.diff_mask = diff_mask;
    }

    let errors = merged.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }
    Ok(merged)
}
