// Domain errors - Failures detected before any file I/O takes place

use std::fmt;

use crate::domain::model::MAX_DIMENSION;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Source path lacks a `.yuv` suffix or has an empty stem
    InvalidExtension(String),
    /// Chroma mode outside 420, 422 and 444
    UnsupportedChromaMode(u32),
    /// Width or height of zero or above `MAX_DIMENSION`
    InvalidDimensions { width: u32, height: u32 },
    /// Requested removal leaves no frame behind
    CutExceedsAvailableFrames { requested: u64, available: u64 },
    /// Output path names the source file
    OutputIsInput(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::InvalidExtension(path) => {
                write!(f, "Please choose a YUV file: '{}' is not one", path)
            }
            DomainError::UnsupportedChromaMode(code) => write!(
                f,
                "Please choose either 420, 422 or 444 as YUV mode: {} is not supported",
                code
            ),
            DomainError::InvalidDimensions { width, height } => write!(
                f,
                "Frame dimensions must be between 1 and {}, got {}x{}",
                MAX_DIMENSION, width, height
            ),
            DomainError::CutExceedsAvailableFrames { requested, available } => write!(
                f,
                "Cannot cut {} frame(s): the video only has {} frame(s) and at least one must remain",
                requested, available
            ),
            DomainError::OutputIsInput(path) => {
                write!(f, "Output path '{}' is the input file", path)
            }
        }
    }
}

impl std::error::Error for DomainError {}
