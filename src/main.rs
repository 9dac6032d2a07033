//! yuvcutter
//!
//! Cuts the first frames from a raw planar YUV video file and writes the
//! remaining frames to a new file.
//!
//! # Usage
//!
//! ```bash
//! yuvcutter foreman.yuv -W 352 -H 288 -N 10      # drop 10 frames into cut.yuv
//! yuvcutter foreman.yuv -W 352 -H 288 -C         # only count frames
//! yuvcutter foreman.yuv -M 444 -N 1 -o tail.yuv  # 4:4:4 input, custom output
//! ```

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use yuvcut::cli::{commands, Cli};
use yuvcut::config::{FileSettings, Settings};
use yuvcut::engine::{ProgressCallback, SilentProgress, TerminalProgress};

/// Main entry point for yuvcutter
fn main() -> ExitCode {
    // Help, version and usage errors exit inside clap
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("  caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let file = FileSettings::discover(cli.config.as_deref(), Path::new("."))?;
    let settings = Settings::resolve(file, cli.overrides());
    settings.logging.init();

    info!("Starting yuvcutter {}", env!("CARGO_PKG_VERSION"));

    let progress: Box<dyn ProgressCallback> =
        if cli.no_progress || !std::io::stdout().is_terminal() {
            Box::new(SilentProgress)
        } else {
            Box::new(TerminalProgress::new())
        };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&cli, &settings, progress.as_ref(), &mut out)?;

    info!("yuvcutter completed successfully");
    Ok(())
}
