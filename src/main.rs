//! Pixelmatch - command-line tool for comparing two images pixel by pixel

use std::process::ExitCode;

use pixelmatch::cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    cli::run()
}
