//! Append-only byte buffer over a bucket array.

use gnom_arena::{Arena, BucketArray, Iter};

use crate::interval::Interval;
use crate::sink::{OutputSink, StreamHandle};

/// Bytes per stream block unless overridden.
pub const DEFAULT_STREAM_BLOCK_SIZE: u32 = 512;

/// Append-only byte buffer stored in arena blocks.
///
/// Bytes never move once pushed, so [`Interval`]s into the stream stay
/// valid for as long as the stream is borrowed.
pub struct ByteStream<'a> {
    bytes: BucketArray<'a, u8>,
    /// Bytes already handed to a sink.
    flushed: usize,
}

impl<'a> ByteStream<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self::with_block_size(arena, DEFAULT_STREAM_BLOCK_SIZE)
    }

    pub fn with_block_size(arena: &'a Arena, block_size: u32) -> Self {
        Self {
            bytes: BucketArray::new(arena, block_size),
            flushed: 0,
        }
    }

    /// Build a stream holding a copy of `source`.
    pub fn from_bytes(arena: &'a Arena, source: &[u8]) -> Self {
        let mut stream = Self::new(arena);
        stream.push_bytes(source);
        stream
    }

    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.bytes.push(byte);
        }
    }

    /// Append the bytes an interval (into another stream) refers to.
    pub fn push_interval(&mut self, interval: &Interval<'_>) {
        for chunk in interval.chunks() {
            self.push_bytes(chunk);
        }
    }

    /// Total bytes pushed.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn block_size(&self) -> u32 {
        self.bytes.block_size()
    }

    /// Byte cursor positioned at the start of the stream.
    pub fn iter(&self) -> Iter<'_, u8> {
        self.bytes.iter()
    }

    /// Byte at `index`.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    /// Interval of `len` bytes starting at byte `start`, or `None` when
    /// the range runs past the end.
    pub fn interval(&self, start: usize, len: usize) -> Option<Interval<'_>> {
        let end = start.checked_add(len)?;
        if end > self.len() {
            return None;
        }
        let block_size = self.bytes.block_size() as usize;
        let block = self.bytes.block(start / block_size);
        Some(Interval::new(block, start % block_size, block_size, len))
    }

    /// Copy of the whole stream.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.chunks().flatten().copied().collect()
    }

    /// Bytes not yet flushed.
    pub fn pending(&self) -> usize {
        self.len() - self.flushed
    }

    /// Write every unflushed byte to `sink`, one call per block touched.
    ///
    /// Returns the byte count the sink reported. The watermark advances
    /// past everything offered, so a second flush only emits bytes pushed
    /// in between.
    pub fn flush<S: OutputSink + ?Sized>(&mut self, handle: StreamHandle, sink: &mut S) -> usize {
        let mut skip = self.flushed;
        let mut written = 0;
        for chunk in self.bytes.chunks() {
            if skip >= chunk.len() {
                skip -= chunk.len();
                continue;
            }
            let run = &chunk[skip..];
            skip = 0;
            written += sink.write_bytes(handle, run);
        }
        tracing::debug!(
            ?handle,
            offered = self.pending(),
            written,
            "flushed byte stream"
        );
        self.flushed = self.len();
        written
    }
}

impl std::fmt::Debug for ByteStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStream")
            .field("len", &self.len())
            .field("flushed", &self.flushed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
