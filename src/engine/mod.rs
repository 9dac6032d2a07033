//! Core cutting engine module

pub mod copy;
pub mod cutter;
pub mod progress;

pub use copy::{CopyState, StreamCopier};
pub use cutter::FrameCutter;
pub use progress::{ProgressCallback, RecordingProgress, SilentProgress, TerminalProgress};
