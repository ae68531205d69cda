//! Zero-copy views into a [`ByteStream`](crate::ByteStream).

use std::borrow::Cow;
use std::fmt;

use gnom_arena::{BlockRef, Iter};

/// A run of bytes inside a byte stream.
///
/// Stored as the block holding the first byte, the offset of that byte in
/// the block, the stream's block size and the run length. Runs may span
/// several blocks; walking one follows the block chain whenever the
/// in-block offset wraps to zero. The `'s` lifetime is the borrow of the
/// stream, so an interval cannot outlive the bytes it refers to.
#[derive(Clone, Copy)]
pub struct Interval<'s> {
    block: Option<BlockRef<'s, u8>>,
    start: usize,
    block_size: usize,
    len: usize,
}

impl<'s> Interval<'s> {
    pub(crate) fn new(
        block: Option<BlockRef<'s, u8>>,
        start: usize,
        block_size: usize,
        len: usize,
    ) -> Self {
        debug_assert!(block.is_some() || len == 0, "non-empty interval without a block");
        Self {
            block,
            start,
            block_size,
            len,
        }
    }

    /// Interval of `len` bytes beginning at the cursor's current byte.
    pub fn starting_at(cursor: &Iter<'s, u8>, len: usize) -> Self {
        Self::new(cursor.block(), cursor.offset_in_block(), cursor.block_size(), len)
    }

    /// Interval covering nothing.
    pub fn empty() -> Self {
        Self::new(None, 0, 1, 0)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte-by-byte walk over the interval.
    pub fn bytes(&self) -> Bytes<'s> {
        Bytes {
            block: self.block,
            offset: self.start,
            block_size: self.block_size,
            remaining: self.len,
        }
    }

    /// Contiguous runs of the interval, one per block touched.
    pub fn chunks(&self) -> impl Iterator<Item = &'s [u8]> + 's {
        let mut block = self.block;
        let mut start = self.start;
        let mut remaining = self.len;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let current = block?;
            let written = current.as_slice().get(start..).unwrap_or_default();
            let run = &written[..written.len().min(remaining)];
            if run.is_empty() {
                return None;
            }
            remaining -= run.len();
            start = 0;
            block = current.next();
            Some(run)
        })
    }

    /// Byte-wise equality with `other`.
    ///
    /// Walks both sides in lockstep and is true only when they run out
    /// together, so a prefix never compares equal.
    pub fn eq_bytes(&self, other: &[u8]) -> bool {
        let mut mine = self.bytes();
        let mut theirs = other.iter();
        loop {
            match (mine.next(), theirs.next()) {
                (Some(a), Some(&b)) if a == b => {}
                (None, None) => return true,
                _ => return false,
            }
        }
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes().collect()
    }

    /// The bytes as UTF-8, replacing invalid sequences.
    pub fn to_string_lossy(&self) -> Cow<'s, str> {
        let mut chunks = self.chunks();
        match (chunks.next(), chunks.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(only), None) => String::from_utf8_lossy(only),
            _ => Cow::Owned(String::from_utf8_lossy(&self.to_vec()).into_owned()),
        }
    }
}

/// Byte iterator over an [`Interval`].
#[derive(Clone)]
pub struct Bytes<'s> {
    block: Option<BlockRef<'s, u8>>,
    offset: usize,
    block_size: usize,
    remaining: usize,
}

impl Iterator for Bytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            return None;
        }
        let block = self.block?;
        let byte = *block.as_slice().get(self.offset)?;
        self.remaining -= 1;
        self.offset += 1;
        if self.offset == self.block_size {
            self.offset = 0;
            self.block = block.next();
        }
        Some(byte)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl PartialEq for Interval<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.bytes().eq(other.bytes())
    }
}

impl Eq for Interval<'_> {}

impl PartialEq<[u8]> for Interval<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.eq_bytes(other)
    }
}

impl PartialEq<Interval<'_>> for [u8] {
    fn eq(&self, other: &Interval<'_>) -> bool {
        other.eq_bytes(self)
    }
}

impl PartialEq<&[u8]> for Interval<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.eq_bytes(other)
    }
}

impl PartialEq<str> for Interval<'_> {
    fn eq(&self, other: &str) -> bool {
        self.eq_bytes(other.as_bytes())
    }
}

impl PartialEq<Interval<'_>> for str {
    fn eq(&self, other: &Interval<'_>) -> bool {
        other.eq_bytes(self.as_bytes())
    }
}

impl PartialEq<&str> for Interval<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.eq_bytes(other.as_bytes())
    }
}

impl PartialEq<Interval<'_>> for &str {
    fn eq(&self, other: &Interval<'_>) -> bool {
        other.eq_bytes(self.as_bytes())
    }
}

impl fmt::Display for Interval<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for Interval<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interval({:?})", self.to_string_lossy())
    }
}
