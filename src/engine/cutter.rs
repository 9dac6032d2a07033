//! File-level cut: open source and destination, copy, release both

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::domain::model::VideoGeometry;
use crate::engine::copy::StreamCopier;
use crate::engine::progress::ProgressCallback;
use crate::error::{YuvCutError, YuvCutResult};

/// Writes the part of a source file that follows the removed frames
pub struct FrameCutter {
    chunk_size: usize,
}

impl FrameCutter {
    /// Create a new frame cutter
    pub fn new() -> Self {
        Self {
            chunk_size: StreamCopier::DEFAULT_CHUNK_SIZE,
        }
    }

    /// Use a different read chunk size
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// Copy `input` from `geometry.cut_offset` to its end into `output`,
    /// which is created or truncated.
    ///
    /// A partially written output is left in place on failure.
    pub fn cut(
        &self,
        input: &Path,
        output: &Path,
        geometry: &VideoGeometry,
        progress: &dyn ProgressCallback,
    ) -> YuvCutResult<u64> {
        let started = Instant::now();
        info!(
            "Cutting {} frame(s) ({} bytes) from {}",
            geometry.frames_to_remove,
            geometry.cut_offset,
            input.display()
        );
        if geometry.trailing_bytes() > 0 {
            warn!(
                "{} trailing byte(s) do not form a whole frame and are copied as-is",
                geometry.trailing_bytes()
            );
        }

        let mut source = File::open(input).map_err(|source| YuvCutError::OpenFailure {
            path: input.to_path_buf(),
            purpose: "reading",
            source,
        })?;
        let destination = File::create(output).map_err(|source| YuvCutError::OpenFailure {
            path: output.to_path_buf(),
            purpose: "writing",
            source,
        })?;
        let mut writer = BufWriter::with_capacity(self.chunk_size.max(1), destination);

        let copied = StreamCopier::with_chunk_size(self.chunk_size).copy(
            &mut source,
            &mut writer,
            geometry.cut_offset,
            geometry.result_size,
            progress,
        );
        drop(source);
        let closed = close_output(writer, output);

        let written = settle(copied, closed)?;

        info!(
            "Wrote {} bytes to {} in {:.2}s",
            written,
            output.display(),
            started.elapsed().as_secs_f64()
        );
        Ok(written)
    }
}

impl Default for FrameCutter {
    fn default() -> Self {
        Self::new()
    }
}

/// Combine the copy and close outcomes; a copy error outranks a close error
fn settle(copied: YuvCutResult<u64>, closed: YuvCutResult<()>) -> YuvCutResult<u64> {
    match (copied, closed) {
        (Ok(written), Ok(())) => Ok(written),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(copy_err), Ok(())) => Err(copy_err),
        (Err(copy_err), Err(close_err)) => {
            error!("{}", close_err.with_causes());
            Err(copy_err)
        }
    }
}

/// Flush buffered bytes and sync the destination before it is dropped
fn close_output(writer: BufWriter<File>, path: &Path) -> YuvCutResult<()> {
    let close_failure = |source| YuvCutError::CloseFailure {
        path: path.to_path_buf(),
        source,
    };

    let file = writer
        .into_inner()
        .map_err(|e| close_failure(e.into_error()))?;
    file.sync_all().map_err(close_failure)
}
