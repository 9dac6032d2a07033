// Domain models - Frame geometry of raw planar YUV files

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::errors::DomainError;


/// Largest accepted frame width or height
pub const MAX_DIMENSION: u32 = 65535;

/// Chroma subsampling mode of a planar YUV stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u32")]
pub enum ChromaMode {
    /// 4:2:0, chroma planes at quarter resolution
    Yuv420,
    /// 4:2:2, chroma planes at half horizontal resolution
    Yuv422,
    /// 4:4:4, no subsampling
    Yuv444,
}

impl ChromaMode {
    /// Parse the numeric code used on the command line (420, 422 or 444)
    pub fn from_code(code: u32) -> Result<Self, DomainError> {
        match code {
            420 => Ok(ChromaMode::Yuv420),
            422 => Ok(ChromaMode::Yuv422),
            444 => Ok(ChromaMode::Yuv444),
            other => Err(DomainError::UnsupportedChromaMode(other)),
        }
    }

    /// Numeric code of this mode
    pub fn code(&self) -> u32 {
        match self {
            ChromaMode::Yuv420 => 420,
            ChromaMode::Yuv422 => 422,
            ChromaMode::Yuv444 => 444,
        }
    }

    /// Bytes of one frame given the luma plane size.
    ///
    /// 4:2:0 is computed as `luma * 3 / 2` in integer arithmetic, so an odd
    /// luma size loses half a byte per frame.
    pub fn frame_bytes(&self, luma_plane_size: u64) -> u64 {
        match self {
            ChromaMode::Yuv420 => luma_plane_size * 3 / 2,
            ChromaMode::Yuv422 => luma_plane_size * 2,
            ChromaMode::Yuv444 => luma_plane_size * 3,
        }
    }
}

impl From<ChromaMode> for u32 {
    fn from(mode: ChromaMode) -> Self {
        mode.code()
    }
}

impl fmt::Display for ChromaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Dimensions and subsampling of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameLayout {
    pub width: u32,
    pub height: u32,
    pub chroma: ChromaMode,
}

impl FrameLayout {
    /// Build a layout from raw CLI or config values. Performs no I/O.
    ///
    /// Both dimensions must lie in `1..=MAX_DIMENSION`, which keeps the
    /// frame size well inside `u64`.
    pub fn new(width: u32, height: u32, mode_code: u32) -> Result<Self, DomainError> {
        let chroma = ChromaMode::from_code(mode_code)?;
        let valid = 1..=MAX_DIMENSION;
        if !valid.contains(&width) || !valid.contains(&height) {
            return Err(DomainError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, chroma })
    }

    /// Size of the luma plane in bytes
    pub fn luma_plane_size(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Size of one frame in bytes, always positive
    pub fn frame_byte_size(&self) -> u64 {
        self.chroma.frame_bytes(self.luma_plane_size())
    }
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            chroma: ChromaMode::Yuv420,
        }
    }
}

/// Resolved geometry of a source file and the requested cut.
///
/// Computed once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoGeometry {
    pub layout: FrameLayout,
    pub frame_byte_size: u64,
    pub total_size: u64,
    pub frame_count: u64,
    pub frames_to_remove: u64,
    pub cut_offset: u64,
    pub result_size: u64,
}

impl VideoGeometry {
    /// Resolve the geometry of a file of `file_size` bytes.
    ///
    /// `frame_count` uses floor division: trailing bytes that do not fill a
    /// whole frame are not counted. Whether the cut fits is checked separately
    /// by [`crate::domain::rules::ensure_cut_fits`].
    pub fn resolve(layout: FrameLayout, file_size: u64, frames_to_remove: u64) -> Self {
        let frame_byte_size = layout.frame_byte_size();
        let frame_count = file_size / frame_byte_size;
        let cut_offset = frame_byte_size.saturating_mul(frames_to_remove);
        let result_size = file_size.saturating_sub(cut_offset);

        Self {
            layout,
            frame_byte_size,
            total_size: file_size,
            frame_count,
            frames_to_remove,
            cut_offset,
            result_size,
        }
    }

    /// Frames left once the cut is applied
    pub fn remaining_frames(&self) -> u64 {
        self.frame_count.saturating_sub(self.frames_to_remove)
    }

    /// Bytes past the last whole frame
    pub fn trailing_bytes(&self) -> u64 {
        self.total_size % self.frame_byte_size
    }
}

/// What the caller wants done with a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutAction {
    /// Report the frame count only
    Count,
    /// Drop leading frames and write the rest
    Cut,
}

/// Immutable description of one invocation, built once by the CLI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub layout: FrameLayout,
    pub frames_to_remove: u64,
    pub action: CutAction,
    pub verbose: bool,
}

impl CutRequest {
    /// Create a new cut request
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        layout: FrameLayout,
        frames_to_remove: u64,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            layout,
            frames_to_remove,
            action: CutAction::Cut,
            verbose: false,
        }
    }

    /// Switch to count-only mode
    pub fn count_only(mut self) -> Self {
        self.action = CutAction::Count;
        self
    }

    /// Enable the parameter summary
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
