//! Command implementations

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::Cli;
use crate::config::Settings;
use crate::domain::model::{CutAction, CutRequest, FrameLayout, VideoGeometry};
use crate::domain::rules::{check_yuv_extension, ensure_cut_fits, ensure_output_differs};
use crate::engine::{FrameCutter, ProgressCallback};
use crate::error::{YuvCutError, YuvCutResult};
use crate::utils::format_file_size;

/// Output format of the count query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFormat {
    Text,
    Json,
}

/// Frame count report printed with `--json`
#[derive(Debug, Serialize)]
pub struct CountReport<'a> {
    pub input: &'a Path,
    #[serde(flatten)]
    pub geometry: &'a VideoGeometry,
    pub trailing_bytes: u64,
}

/// Validate the parsed arguments and freeze them into a request.
///
/// Performs no file I/O: extension, chroma mode and dimensions are all
/// checked before the source is touched.
pub fn build_request(cli: &Cli, settings: &Settings) -> YuvCutResult<CutRequest> {
    check_yuv_extension(&cli.input)?;
    let layout = FrameLayout::new(settings.width, settings.height, settings.mode)?;

    let request = CutRequest::new(
        cli.input.clone(),
        settings.output.clone(),
        layout,
        settings.frames,
    )
    .with_verbose(cli.verbose);

    Ok(if cli.count { request.count_only() } else { request })
}

/// Size of the source file in bytes
pub fn stat_input(path: &Path) -> YuvCutResult<u64> {
    std::fs::metadata(path)
        .map(|metadata| metadata.len())
        .map_err(|source| YuvCutError::StatFailure {
            path: path.to_path_buf(),
            source,
        })
}

/// Resolve the geometry of the request's source file
pub fn resolve(request: &CutRequest) -> YuvCutResult<VideoGeometry> {
    let file_size = stat_input(&request.input)?;
    let geometry = VideoGeometry::resolve(request.layout, file_size, request.frames_to_remove);
    info!(
        "{}: {} bytes, {} frame(s) of {} bytes",
        request.input.display(),
        geometry.total_size,
        geometry.frame_count,
        geometry.frame_byte_size
    );
    Ok(geometry)
}

/// Run a request: count frames or cut them, writing the report to `out`
pub fn execute(
    request: &CutRequest,
    format: CountFormat,
    progress: &dyn ProgressCallback,
    out: &mut dyn Write,
) -> Result<VideoGeometry> {
    let geometry = resolve(request)?;

    match request.action {
        CutAction::Count => {
            if request.verbose {
                print_summary(out, request, &geometry)?;
            }
            print_count(out, request, &geometry, format)?;
        }
        CutAction::Cut => {
            ensure_cut_fits(&geometry).map_err(YuvCutError::from)?;
            ensure_output_differs(&request.input, &request.output).map_err(YuvCutError::from)?;
            if request.verbose {
                print_summary(out, request, &geometry)?;
            }

            writeln!(out, "Please wait while writing to file...")?;
            out.flush()?;
            let written = FrameCutter::new().cut(
                &request.input,
                &request.output,
                &geometry,
                progress,
            )?;
            info!("{} written", format_file_size(written));
            writeln!(out, "Done writing to {}", request.output.display())?;
        }
    }

    Ok(geometry)
}

/// Build and execute the request described by the parsed arguments
pub fn run(
    cli: &Cli,
    settings: &Settings,
    progress: &dyn ProgressCallback,
    out: &mut dyn Write,
) -> Result<()> {
    let request = build_request(cli, settings)?;
    let format = if cli.json {
        CountFormat::Json
    } else {
        CountFormat::Text
    };
    execute(&request, format, progress, out)?;
    Ok(())
}

fn print_count(
    out: &mut dyn Write,
    request: &CutRequest,
    geometry: &VideoGeometry,
    format: CountFormat,
) -> Result<()> {
    match format {
        CountFormat::Text => writeln!(
            out,
            "Number of frames in {}: {}",
            request.input.display(),
            geometry.frame_count
        )?,
        CountFormat::Json => {
            let report = CountReport {
                input: &request.input,
                geometry,
                trailing_bytes: geometry.trailing_bytes(),
            };
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize frame count to JSON")?;
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}

fn print_summary(out: &mut dyn Write, request: &CutRequest, geometry: &VideoGeometry) -> Result<()> {
    let rows: Vec<(&str, String)> = vec![
        ("Input file name", request.input.display().to_string()),
        ("Height", request.layout.height.to_string()),
        ("Width", request.layout.width.to_string()),
        ("YUV mode", request.layout.chroma.to_string()),
        ("Number of frames", geometry.frame_count.to_string()),
    ];
    for (label, value) in rows {
        writeln!(out, "{:>26}: {}", label, value)?;
    }

    if request.action == CutAction::Cut {
        writeln!(out, "{:>26}: {}", "# of frames to cut", request.frames_to_remove)?;
        writeln!(
            out,
            "{:>26}: {}",
            "Resulting number of frames",
            geometry.remaining_frames()
        )?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FileSettings, Settings};
    use crate::domain::errors::DomainError;
    use crate::engine::SilentProgress;
    use clap::Parser;
    use tempfile::TempDir;

    fn settings_for(cli: &Cli) -> Settings {
        Settings::resolve(FileSettings::default(), cli.overrides())
    }

    fn domain_error(err: &anyhow::Error) -> Option<&DomainError> {
        match err.downcast_ref::<YuvCutError>() {
            Some(YuvCutError::Domain(e)) => Some(e),
            _ => None,
        }
    }

    #[test]
    fn test_build_request_rejects_extension_before_mode() {
        let cli = Cli::try_parse_from(["yuvcutter", "movie.mp4", "-M", "411"]).unwrap();
        let err = build_request(&cli, &settings_for(&cli)).unwrap_err();
        assert!(matches!(err, YuvCutError::Domain(DomainError::InvalidExtension(_))));
    }

    #[test]
    fn test_build_request_rejects_mode_without_io() {
        // The file does not exist; the mode is rejected first
        let cli = Cli::try_parse_from(["yuvcutter", "missing.yuv", "-M", "411"]).unwrap();
        let err = build_request(&cli, &settings_for(&cli)).unwrap_err();
        assert!(matches!(
            err,
            YuvCutError::Domain(DomainError::UnsupportedChromaMode(411))
        ));
    }

    #[test]
    fn test_build_request_rejects_oversized_config_width() {
        // The flag range does not apply to values read from a config file
        let cli = Cli::try_parse_from(["yuvcutter", "clip.yuv", "-N", "1"]).unwrap();
        let file = FileSettings {
            width: Some(4_000_000_000),
            ..FileSettings::default()
        };
        let settings = Settings::resolve(file, cli.overrides());
        let err = build_request(&cli, &settings).unwrap_err();
        assert!(matches!(
            err,
            YuvCutError::Domain(DomainError::InvalidDimensions {
                width: 4_000_000_000,
                height: 1080
            })
        ));
    }

    #[test]
    fn test_build_request_count_mode() {
        let cli = Cli::try_parse_from(["yuvcutter", "clip.yuv", "-C", "-v"]).unwrap();
        let request = build_request(&cli, &settings_for(&cli)).unwrap();
        assert_eq!(request.action, CutAction::Count);
        assert!(request.verbose);
        assert_eq!(request.layout, FrameLayout::default());
    }

    #[test]
    fn test_stat_missing_file() {
        let err = stat_input(Path::new("definitely/not/here.yuv")).unwrap_err();
        assert!(matches!(err, YuvCutError::StatFailure { .. }));
    }

    #[test]
    fn test_execute_count_text_and_summary() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("qcif.yuv");
        std::fs::write(&input, vec![0u8; 176 * 144 * 3 * 2 + 10]).unwrap();

        let layout = FrameLayout::new(176, 144, 444).unwrap();
        let request = CutRequest::new(&input, dir.path().join("cut.yuv"), layout, 1)
            .count_only()
            .with_verbose(true);
        let mut out = Vec::new();

        let geometry = execute(&request, CountFormat::Text, &SilentProgress, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(geometry.frame_count, 2);
        assert!(text.contains("                  YUV mode: 444"));
        assert!(text.contains("          Number of frames: 2"));
        assert!(!text.contains("# of frames to cut"));
        assert!(text.ends_with(&format!("Number of frames in {}: 2\n", input.display())));
        assert!(!dir.path().join("cut.yuv").exists());
    }

    #[test]
    fn test_execute_count_json() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.yuv");
        std::fs::write(&input, vec![0u8; 16 * 16 * 3 / 2 * 3]).unwrap();

        let layout = FrameLayout::new(16, 16, 420).unwrap();
        let request = CutRequest::new(&input, dir.path().join("cut.yuv"), layout, 1).count_only();
        let mut out = Vec::new();

        execute(&request, CountFormat::Json, &SilentProgress, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["frame_count"], 3);
        assert_eq!(value["frame_byte_size"], 384);
        assert_eq!(value["layout"]["chroma"], 420);
        assert_eq!(value["trailing_bytes"], 0);
    }

    #[test]
    fn test_execute_count_ignores_cut_size() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("tiny.yuv");
        std::fs::write(&input, b"short").unwrap();

        let request =
            CutRequest::new(&input, dir.path().join("cut.yuv"), FrameLayout::default(), 1).count_only();
        let mut out = Vec::new();

        let geometry = execute(&request, CountFormat::Text, &SilentProgress, &mut out).unwrap();
        assert_eq!(geometry.frame_count, 0);
    }

    #[test]
    fn test_execute_cut_rejects_whole_video() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.yuv");
        let output = dir.path().join("cut.yuv");
        std::fs::write(&input, vec![1u8; 768 * 2]).unwrap();

        let layout = FrameLayout::new(16, 16, 444).unwrap();
        let request = CutRequest::new(&input, &output, layout, 2);
        let mut out = Vec::new();

        let err = execute(&request, CountFormat::Text, &SilentProgress, &mut out).unwrap_err();
        assert_eq!(
            domain_error(&err),
            Some(&DomainError::CutExceedsAvailableFrames {
                requested: 2,
                available: 2
            })
        );
        assert!(!output.exists());
    }

    #[test]
    fn test_execute_cut_refuses_output_over_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.yuv");
        std::fs::write(&input, vec![1u8; 768 * 3]).unwrap();

        let layout = FrameLayout::new(16, 16, 444).unwrap();
        let request = CutRequest::new(&input, &input, layout, 1);
        let mut out = Vec::new();

        let err = execute(&request, CountFormat::Text, &SilentProgress, &mut out).unwrap_err();
        assert!(matches!(domain_error(&err), Some(DomainError::OutputIsInput(_))));
        assert_eq!(std::fs::metadata(&input).unwrap().len(), 768 * 3);
    }

    #[test]
    fn test_execute_cut_writes_suffix() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.yuv");
        let output = dir.path().join("tail.yuv");
        let data: Vec<u8> = (0..768 * 3).map(|i| (i % 256) as u8).collect();
        std::fs::write(&input, &data).unwrap();

        let layout = FrameLayout::new(16, 16, 444).unwrap();
        let request = CutRequest::new(&input, &output, layout, 1).with_verbose(true);
        let mut out = Vec::new();

        execute(&request, CountFormat::Text, &SilentProgress, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), &data[768..]);
        assert!(text.contains("        # of frames to cut: 1"));
        assert!(text.contains("Resulting number of frames: 2"));
        assert!(text.contains("Please wait while writing to file..."));
        assert!(text.contains(&format!("to {}", output.display())));
    }
}
