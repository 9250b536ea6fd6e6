//! Command-line interface implementation

use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use crate::buffer::{ImageView, ImageViewMut};
use crate::color::{parse_color, Color};
use crate::config::{load_config, merge_cli_overrides, CliOverrides};
use crate::engine::{pixelmatch_with, Parallelism};
use crate::options::Options;
use crate::output::{load_rgba_png, save_png};

/// No mismatched pixels
const EXIT_SUCCESS: u8 = 0;
/// The images differ
const EXIT_MISMATCH: u8 = 1;
/// Bad arguments, unreadable images or size mismatch
const EXIT_ERROR: u8 = 2;

/// Pixelmatch - compare two images and count perceptually different pixels
#[derive(Parser, Debug)]
#[command(name = "pixelmatch")]
#[command(about = "Compare two images and count perceptually different pixels")]
#[command(version)]
pub struct Cli {
    /// First image (PNG or any format the image crate decodes)
    pub image_a: PathBuf,

    /// Second image, same dimensions as the first
    pub image_b: PathBuf,

    /// Where to write the diff image (PNG)
    pub diff_output: Option<PathBuf>,

    /// Matching threshold (0 to 1); smaller is more sensitive
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Count antialiased pixels as differences
    #[arg(long)]
    pub include_aa: bool,

    /// Opacity of the faded source image in the diff (0 to 1)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Color of antialiased pixels, e.g. "#FFFF00" or "yellow"
    #[arg(long, value_parser = parse_color)]
    pub aa_color: Option<Color>,

    /// Color of differing pixels
    #[arg(long, value_parser = parse_color)]
    pub diff_color: Option<Color>,

    /// Color of differing pixels where the first image is brighter
    #[arg(long, value_parser = parse_color)]
    pub diff_color_alt: Option<Color>,

    /// Draw the diff over a transparent background
    #[arg(long)]
    pub diff_mask: bool,

    /// Config file (default: nearest pixelmatch.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Compare on a single thread
    #[arg(long)]
    pub sequential: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            threshold: self.threshold,
            include_aa: self.include_aa.then_some(true),
            alpha: self.alpha,
            aa_color: self.aa_color,
            diff_color: self.diff_color,
            diff_color_alt: self.diff_color_alt,
            diff_mask: self.diff_mask.then_some(true),
        }
    }
}

/// JSON report printed with `--json`
#[derive(Debug, Serialize)]
pub struct Report {
    pub mismatched: usize,
    pub total: usize,
    pub percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<PathBuf>,
    pub elapsed_ms: f64,
    pub options: Options,
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    match run_compare(&cli) {
        Ok(report) => {
            print_report(&report, cli.json);
            if report.mismatched == 0 {
                ExitCode::from(EXIT_SUCCESS)
            } else {
                ExitCode::from(EXIT_MISMATCH)
            }
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Resolve options, load both images, compare them and write the diff.
pub fn run_compare(cli: &Cli) -> Result<Report, String> {
    let config = load_config(cli.config.as_deref()).map_err(|e| e.to_string())?;
    let options =
        merge_cli_overrides(&config.options, &cli.overrides()).map_err(|e| e.to_string())?;
    log::debug!("comparing with {}", options);

    let img_a = load_image(&cli.image_a)?;
    let img_b = load_image(&cli.image_b)?;
    if img_a.dimensions() != img_b.dimensions() {
        return Err(format!(
            "Image dimensions do not match: {}x{} vs {}x{}",
            img_a.width(),
            img_a.height(),
            img_b.width(),
            img_b.height()
        ));
    }

    let parallelism = if cli.sequential { Parallelism::Sequential } else { Parallelism::Auto };
    let (width, height) = img_a.dimensions();
    let mut diff = cli.diff_output.as_ref().map(|_| image::RgbaImage::new(width, height));

    let start = Instant::now();
    let mismatched = pixelmatch_with(
        ImageView::from_image(&img_a),
        ImageView::from_image(&img_b),
        diff.as_mut().map(ImageViewMut::from_image),
        &options,
        parallelism,
    )
    .map_err(|e| e.to_string())?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    if let (Some(path), Some(diff)) = (&cli.diff_output, &diff) {
        save_png(diff, path).map_err(|e| format!("Failed to save '{}': {}", path.display(), e))?;
    }

    let total = width as usize * height as usize;
    let percent = if total == 0 { 0.0 } else { mismatched as f64 * 100.0 / total as f64 };
    Ok(Report { mismatched, total, percent, diff: cli.diff_output.clone(), elapsed_ms, options })
}

fn load_image(path: &Path) -> Result<image::RgbaImage, String> {
    load_rgba_png(path).map_err(|e| format!("Cannot read image '{}': {}", path.display(), e))
}

fn print_report(report: &Report, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("Error: failed to serialize report: {}", e),
        }
        return;
    }

    println!("matched in: {:.3}ms", report.elapsed_ms);
    println!("different pixels: {}", report.mismatched);
    println!("error: {:.2}%", report.percent);
    if let Some(path) = &report.diff {
        println!("Saved: {}", path.display());
    }
}
