//! Streaming byte copy from an offset to end of input

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use tracing::{debug, trace};

use crate::engine::progress::ProgressCallback;
use crate::error::{YuvCutError, YuvCutResult};

/// Lifecycle of a single copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    Idle,
    Seeking,
    Copying,
    Done,
    Failed,
}

/// Chunked copier. Each instance performs at most one copy.
#[derive(Debug)]
pub struct StreamCopier {
    chunk_size: usize,
    state: CopyState,
}

impl StreamCopier {
    /// Default chunk size in bytes
    pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

    /// Create a new copier with the default chunk size
    pub fn new() -> Self {
        Self::with_chunk_size(Self::DEFAULT_CHUNK_SIZE)
    }

    /// Create a copier reading `chunk_size` bytes at a time (at least one)
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            state: CopyState::Idle,
        }
    }

    /// Chunk size in use
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Current state
    pub fn state(&self) -> CopyState {
        self.state
    }

    fn transition(&mut self, next: CopyState) {
        trace!("copier state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Copy every byte of `source` from `start_offset` to end of stream into
    /// `destination`, reporting cumulative progress against `expected`.
    ///
    /// Returns the number of bytes written. Consumes the copier, so a copy
    /// cannot be restarted from `Done` or `Failed`.
    pub fn copy<R, W>(
        mut self,
        source: &mut R,
        destination: &mut W,
        start_offset: u64,
        expected: u64,
        progress: &dyn ProgressCallback,
    ) -> YuvCutResult<u64>
    where
        R: Read + Seek,
        W: Write,
    {
        let result = self.run(source, destination, start_offset, expected, progress);
        match &result {
            Ok(written) => {
                self.transition(CopyState::Done);
                debug!("copied {} bytes from offset {}", written, start_offset);
            }
            Err(e) => {
                self.transition(CopyState::Failed);
                debug!("copy from offset {} failed: {}", start_offset, e);
            }
        }
        result
    }

    fn run<R, W>(
        &mut self,
        source: &mut R,
        destination: &mut W,
        start_offset: u64,
        expected: u64,
        progress: &dyn ProgressCallback,
    ) -> YuvCutResult<u64>
    where
        R: Read + Seek,
        W: Write,
    {
        self.transition(CopyState::Seeking);
        seek_within(source, start_offset)?;

        self.transition(CopyState::Copying);
        progress.on_start(expected);

        let mut buf = vec![0u8; self.chunk_size];
        let mut written: u64 = 0;
        let mut chunks: u64 = 0;

        loop {
            let read = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(YuvCutError::ReadFailure {
                        position: start_offset + written,
                        source,
                    })
                }
            };

            let accepted = destination
                .write(&buf[..read])
                .map_err(|source| YuvCutError::WriteFailure { written, source })?;
            if accepted != read {
                return Err(YuvCutError::short_write(written, read, accepted));
            }

            written += read as u64;
            chunks += 1;
            progress.on_progress(written, expected);
        }

        debug!("{} chunk(s) of at most {} bytes", chunks, self.chunk_size);
        progress.on_complete(written);
        Ok(written)
    }
}

impl Default for StreamCopier {
    fn default() -> Self {
        Self::new()
    }
}

/// Position `source` at `offset`, refusing offsets past its end
fn seek_within<R: Seek>(source: &mut R, offset: u64) -> YuvCutResult<()> {
    let seek_failure = |source| YuvCutError::SeekFailure { offset, source };

    let len = source.seek(SeekFrom::End(0)).map_err(seek_failure)?;
    if offset > len {
        return Err(seek_failure(std::io::Error::new(
            ErrorKind::InvalidInput,
            format!("offset is past the end of the {}-byte input", len),
        )));
    }
    source.seek(SeekFrom::Start(offset)).map_err(seek_failure)?;
    Ok(())
}
