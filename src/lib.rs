//! yuvcut library
//!
//! Drops leading frames from raw, headerless planar YUV files. The frame
//! geometry lives in [`domain`], the chunked copy in [`engine`].

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{ChromaMode, CutAction, CutRequest, FrameLayout, VideoGeometry};
pub use error::{YuvCutError, YuvCutResult};
