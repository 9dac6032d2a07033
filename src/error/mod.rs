//! Error handling module for yuvcut

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for yuvcut operations
#[derive(Error, Debug)]
pub enum YuvCutError {
    /// Request rejected before any I/O
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Source size could not be determined
    #[error("Cannot stat {path}")]
    StatFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source or destination could not be opened
    #[error("Cannot open {path} for {purpose}")]
    OpenFailure {
        path: PathBuf,
        purpose: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Start offset could not be reached
    #[error("Cannot seek to position {offset}")]
    SeekFailure {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    /// Lower-level read error, distinct from end of stream
    #[error("Cannot read input after {position} bytes")]
    ReadFailure {
        position: u64,
        #[source]
        source: std::io::Error,
    },

    /// Chunk write failed or came up short
    #[error("Cannot write to output file after {written} bytes")]
    WriteFailure {
        written: u64,
        #[source]
        source: std::io::Error,
    },

    /// Flushing or syncing a handle on release failed
    #[error("Cannot close {path}")]
    CloseFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file unreadable or malformed
    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl YuvCutError {
    /// Message followed by every underlying cause, joined by `: `
    pub fn with_causes(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }

    /// Error raised when a chunk write accepts fewer bytes than offered
    pub fn short_write(written: u64, requested: usize, accepted: usize) -> Self {
        YuvCutError::WriteFailure {
            written,
            source: std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                format!("short write: {} of {} bytes accepted", accepted, requested),
            ),
        }
    }
}


/// Result type alias for yuvcut operations
pub type YuvCutResult<T> = std::result::Result<T, YuvCutError>;
