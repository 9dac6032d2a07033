//! CLI module for yuvcutter
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Overrides, DEFAULT_INPUT};
use crate::domain::model::MAX_DIMENSION;
use crate::utils::logging::{LogFormat, LogLevel};

pub mod commands;

/// yuvcutter
///
/// Drops the first frames of a raw planar YUV file and writes the rest to a
/// new file.
#[derive(Parser, Debug)]
#[command(name = "yuvcutter")]
#[command(about = "Cut the first N frames from a raw YUV video file")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Raw YUV file to read
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Print a parameter summary before acting
    #[arg(short, long)]
    pub verbose: bool,

    /// Count the number of frames in the input file
    #[arg(short = 'C', long)]
    pub count: bool,

    /// Video height in pixels [default: 1080]
    #[arg(short = 'H', long, env = "YUVCUTTER_HEIGHT", value_parser = parse_dimension)]
    pub height: Option<u32>,

    /// YUV mode: 420, 422 or 444 [default: 420]
    #[arg(short = 'M', long, env = "YUVCUTTER_MODE")]
    pub mode: Option<u32>,

    /// Number of frames to cut [default: 1]
    #[arg(short = 'N', long, env = "YUVCUTTER_FRAMES")]
    pub frames: Option<u64>,

    /// Video width in pixels [default: 1920]
    #[arg(short = 'W', long, env = "YUVCUTTER_WIDTH", value_parser = parse_dimension)]
    pub width: Option<u32>,

    /// Output file, overwritten if it exists [default: cut.yuv]
    #[arg(short, long, env = "YUVCUTTER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Print the frame count as JSON
    #[arg(long, requires = "count")]
    pub json: bool,

    /// Do not draw the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Configuration file [default: ./yuvcutter.toml when present]
    #[arg(long, env = "YUVCUTTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level [default: warn]
    #[arg(long, value_enum, env = "YUVCUTTER_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Logging format [default: compact]
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Values that take precedence over the config file
    pub fn overrides(&self) -> Overrides {
        Overrides {
            width: self.width,
            height: self.height,
            mode: self.mode,
            frames: self.frames,
            output: self.output.clone(),
            log_level: self.log_level,
            log_format: self.log_format,
        }
    }
}

fn parse_dimension(s: &str) -> Result<u32, String> {
    clap_num::number_range(s, 1, MAX_DIMENSION)
}
