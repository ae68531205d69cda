//! Output sink boundary.

use std::io::{self, Write};

/// Which logical stream a write belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamHandle {
    Output,
    Error,
}

/// Destination for flushed stream bytes.
///
/// Called once per contiguous run, which is at most one stream block.
pub trait OutputSink {
    /// Write `bytes` to `handle` and return how many were written.
    fn write_bytes(&mut self, handle: StreamHandle, bytes: &[u8]) -> usize;
}

/// Sink writing to the process's stdout and stderr.
#[derive(Debug, Default)]
pub struct StdSink;

impl StdSink {
    fn write_to(target: &mut impl Write, bytes: &[u8]) -> usize {
        let mut written = 0;
        while written < bytes.len() {
            match target.write(&bytes[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    tracing::warn!(%err, written, "sink write failed");
                    break;
                }
            }
        }
        written
    }
}

impl OutputSink for StdSink {
    fn write_bytes(&mut self, handle: StreamHandle, bytes: &[u8]) -> usize {
        match handle {
            StreamHandle::Output => Self::write_to(&mut io::stdout().lock(), bytes),
            StreamHandle::Error => Self::write_to(&mut io::stderr().lock(), bytes),
        }
    }
}

/// Sink capturing bytes in memory, one buffer per handle.
#[derive(Debug, Default)]
pub struct MemorySink {
    output: Vec<u8>,
    error: Vec<u8>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes received on `handle`.
    pub fn captured(&self, handle: StreamHandle) -> &[u8] {
        match handle {
            StreamHandle::Output => &self.output,
            StreamHandle::Error => &self.error,
        }
    }

    /// Captured bytes of `handle` as text.
    pub fn captured_text(&self, handle: StreamHandle) -> String {
        String::from_utf8_lossy(self.captured(handle)).into_owned()
    }

    /// Number of `write_bytes` calls received.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl OutputSink for MemorySink {
    fn write_bytes(&mut self, handle: StreamHandle, bytes: &[u8]) -> usize {
        self.writes += 1;
        match handle {
            StreamHandle::Output => self.output.extend_from_slice(bytes),
            StreamHandle::Error => self.error.extend_from_slice(bytes),
        }
        bytes.len()
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn write_bytes(&mut self, handle: StreamHandle, bytes: &[u8]) -> usize {
        (**self).write_bytes(handle, bytes)
    }
}
