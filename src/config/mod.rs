//! Layered configuration: defaults < TOML file < environment < flags
//!
//! Environment variables and flags both reach us through clap, so this module
//! only merges a parsed [`Overrides`] over an optional file and the defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{YuvCutError, YuvCutResult};
use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};

/// Config file looked up in the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "yuvcutter.toml";
/// Default source path
pub const DEFAULT_INPUT: &str = "input.yuv";
/// Default output path
pub const DEFAULT_OUTPUT: &str = "cut.yuv";

/// Values accepted in the `[yuvcutter]` table of a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mode: Option<u32>,
    pub frames: Option<u64>,
    pub output: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    yuvcutter: FileSettings,
}

impl FileSettings {
    /// Parse the contents of a config file
    pub fn parse(content: &str, path: &Path) -> YuvCutResult<Self> {
        toml::from_str::<ConfigFile>(content)
            .map(|file| file.yuvcutter)
            .map_err(|e| YuvCutError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> YuvCutResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| YuvCutError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// Load the named file, else `yuvcutter.toml` in `dir` when present, else nothing
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> YuvCutResult<Self> {
        if let Some(path) = explicit {
            debug!("Loading configuration from {}", path.display());
            return Self::load(path);
        }

        let implicit = dir.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            debug!("Loading configuration from {}", implicit.display());
            return Self::load(&implicit);
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mode: Option<u32>,
    pub frames: Option<u64>,
    pub output: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub mode: u32,
    pub frames: u64,
    pub output: PathBuf,
    pub logging: LoggingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            mode: 420,
            frames: 1,
            output: PathBuf::from(DEFAULT_OUTPUT),
            logging: LoggingConfig::default(),
        }
    }
}

impl Settings {
    /// Merge overrides over file values over defaults
    pub fn resolve(file: FileSettings, overrides: Overrides) -> Self {
        let defaults = Self::default();

        Self {
            width: overrides.width.or(file.width).unwrap_or(defaults.width),
            height: overrides.height.or(file.height).unwrap_or(defaults.height),
            mode: overrides.mode.or(file.mode).unwrap_or(defaults.mode),
            frames: overrides.frames.or(file.frames).unwrap_or(defaults.frames),
            output: overrides.output.or(file.output).unwrap_or(defaults.output),
            logging: LoggingConfig {
                level: overrides
                    .log_level
                    .or(file.log_level)
                    .unwrap_or(defaults.logging.level),
                format: overrides
                    .log_format
                    .or(file.log_format)
                    .unwrap_or(defaults.logging.format),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(FileSettings::default(), Overrides::default());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.width, 1920);
        assert_eq!(settings.height, 1080);
        assert_eq!(settings.mode, 420);
        assert_eq!(settings.frames, 1);
        assert_eq!(settings.output, PathBuf::from("cut.yuv"));
    }

    #[test]
    fn test_parse_file() {
        let file = FileSettings::parse(
            "[yuvcutter]\nwidth = 176\nheight = 144\nmode = 444\nlog_level = \"info\"\n",
            Path::new("yuvcutter.toml"),
        )
        .unwrap();

        assert_eq!(file.width, Some(176));
        assert_eq!(file.height, Some(144));
        assert_eq!(file.mode, Some(444));
        assert_eq!(file.frames, None);
        assert_eq!(file.log_level, Some(LogLevel::Info));
    }

    #[test]
    fn test_parse_empty_file() {
        let file = FileSettings::parse("", Path::new("yuvcutter.toml")).unwrap();
        assert_eq!(file, FileSettings::default());
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = FileSettings::parse("[yuvcutter]\ncrf = 18\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, YuvCutError::Config { .. }));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = FileSettings {
            width: Some(176),
            height: Some(144),
            frames: Some(4),
            ..FileSettings::default()
        };
        let overrides = Overrides {
            width: Some(352),
            frames: Some(2),
            ..Overrides::default()
        };

        let settings = Settings::resolve(file, overrides);
        assert_eq!(settings.width, 352);
        assert_eq!(settings.height, 144);
        assert_eq!(settings.frames, 2);
        assert_eq!(settings.mode, 420);
    }

    #[test]
    fn test_discover_implicit_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[yuvcutter]\nframes = 7\n").unwrap();

        let file = FileSettings::discover(None, dir.path()).unwrap();
        assert_eq!(file.frames, Some(7));
    }

    #[test]
    fn test_discover_without_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(FileSettings::discover(None, dir.path()).unwrap(), FileSettings::default());
    }

    #[test]
    fn test_discover_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(FileSettings::discover(Some(missing.as_path()), dir.path()).is_err());
    }
}
