//! Append-only block-chained container ("bucket array").
//!
//! Elements live in fixed-capacity blocks allocated from an [`Arena`]. A
//! block is a [`BucketBlock`] header followed by `block_size` element
//! slots; blocks are linked in both directions so that indexed access can
//! walk from whichever end of the chain is nearer.

#![allow(
    unsafe_code,
    reason = "elements are stored in raw arena regions behind block headers"
)]

use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::block::round_up;
use crate::Arena;

/// Header at the start of every bucket block.
#[repr(C)]
pub(crate) struct BucketBlock {
    pub(crate) next: Option<NonNull<BucketBlock>>,
    pub(crate) prev: Option<NonNull<BucketBlock>>,
    /// Number of slots handed out from this block.
    pub(crate) offset: u32,
    /// Slots still free in this block.
    pub(crate) space: u32,
}

/// Byte offset of the first element slot behind a block header.
const fn elements_offset<T>() -> usize {
    round_up(mem::size_of::<BucketBlock>(), mem::align_of::<T>())
}

/// Pointer to slot 0 of `block`.
#[inline]
pub(crate) fn elements<T>(block: NonNull<BucketBlock>) -> NonNull<T> {
    // SAFETY: block allocations are sized `elements_offset::<T>()` plus the
    // slot area (see `Chain::grow`), so the offset is in bounds.
    unsafe { block.cast::<u8>().add(elements_offset::<T>()).cast::<T>() }
}

/// The block chain shared by [`BucketArray`] and
/// [`FreeListBucketArray`](crate::FreeListBucketArray).
pub(crate) struct Chain<'a, T> {
    arena: &'a Arena,
    pub(crate) first: Option<NonNull<BucketBlock>>,
    /// Tail of the chain; appends always go here.
    pub(crate) current: Option<NonNull<BucketBlock>>,
    pub(crate) block_size: u32,
    pub(crate) block_count: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: Copy> Chain<'a, T> {
    pub(crate) fn new(arena: &'a Arena, block_size: u32) -> Self {
        assert!(block_size != 0, "bucket block size must be non-zero");
        assert!(
            mem::align_of::<T>() <= 8,
            "bucket elements must not need more than 8-byte alignment"
        );
        Self {
            arena,
            first: None,
            current: None,
            block_size,
            block_count: 0,
            _marker: PhantomData,
        }
    }

    /// Hand out the next unused slot, growing the chain when the tail block
    /// is full. The slot is uninitialised.
    pub(crate) fn push_slot(&mut self) -> NonNull<T> {
        let block = match self.current {
            // SAFETY: chain blocks live as long as the arena borrow.
            Some(block) if unsafe { block.as_ref() }.space > 0 => block,
            _ => self.grow(),
        };
        // SAFETY: the block has a free slot at `offset`, which lies inside
        // its slot area; header fields are only touched through `&mut self`.
        unsafe {
            let header = &mut *block.as_ptr();
            let slot = elements::<T>(block).add(header.offset as usize);
            header.offset += 1;
            header.space -= 1;
            slot
        }
    }

    fn grow(&mut self) -> NonNull<BucketBlock> {
        let slots = mem::size_of::<T>()
            .checked_mul(self.block_size as usize)
            .and_then(|bytes| bytes.checked_add(elements_offset::<T>()))
            .unwrap_or_else(|| panic!("bucket block of {} slots overflows usize", self.block_size));
        let align = mem::align_of::<BucketBlock>().max(mem::align_of::<T>());
        let block = self.arena.alloc_raw(slots, align).cast::<BucketBlock>();

        // SAFETY: the region is fresh, large enough for the header and slot
        // area, and aligned for the header. The old tail is live.
        unsafe {
            block.as_ptr().write(BucketBlock {
                next: None,
                prev: self.current,
                offset: 0,
                space: self.block_size,
            });
            match self.current {
                Some(tail) => (*tail.as_ptr()).next = Some(block),
                None => self.first = Some(block),
            }
        }
        self.current = Some(block);
        self.block_count += 1;
        tracing::trace!(
            block_count = self.block_count,
            slots = self.block_size,
            "bucket block linked"
        );
        block
    }

    /// Find block `block_index`, walking from the nearer end of the chain.
    ///
    /// Indices in the first half are reached from the head, the rest from
    /// the tail, so at most `ceil(block_count / 2)` links are followed.
    pub(crate) fn block_at(&self, block_index: usize) -> Option<NonNull<BucketBlock>> {
        if block_index >= self.block_count {
            return None;
        }
        if block_index <= self.block_count / 2 {
            let mut scan = self.first?;
            for _ in 0..block_index {
                // SAFETY: chain links point at live blocks.
                scan = unsafe { scan.as_ref() }.next?;
            }
            Some(scan)
        } else {
            let mut scan = self.current?;
            for _ in 0..self.block_count - 1 - block_index {
                // SAFETY: chain links point at live blocks.
                scan = unsafe { scan.as_ref() }.prev?;
            }
            Some(scan)
        }
    }

    /// Whether `slot` is a handed-out slot of this chain: inside some
    /// block's slot area, on an element boundary, and (in the tail block)
    /// below the write offset.
    pub(crate) fn owns_slot(&self, slot: NonNull<T>) -> bool {
        let size = mem::size_of::<T>();
        let addr = slot.as_ptr() as usize;
        let mut scan = self.first;
        while let Some(block) = scan {
            let start = elements::<T>(block).as_ptr() as usize;
            let end = start + size * self.block_size as usize;
            if (start..end).contains(&addr) {
                let offset = addr - start;
                // SAFETY: live chain block, plain field read.
                let written = unsafe { block.as_ref() }.offset as usize;
                return offset % size == 0
                    && (Some(block) != self.current || offset / size < written);
            }
            // SAFETY: chain links point at live blocks.
            scan = unsafe { block.as_ref() }.next;
        }
        false
    }
}

/// Append-only sequence of `T` stored in arena-allocated blocks.
///
/// Elements are never moved once pushed, so references into the container
/// stay valid for as long as it is borrowed. `T` is `Copy` because elements
/// are never dropped.
pub struct BucketArray<'a, T> {
    chain: Chain<'a, T>,
    len: usize,
}

impl<'a, T: Copy> BucketArray<'a, T> {
    /// Create an empty array storing `block_size` elements per block.
    pub fn new(arena: &'a Arena, block_size: u32) -> Self {
        Self {
            chain: Chain::new(arena, block_size),
            len: 0,
        }
    }

    /// Append `value` and return the slot it was written to.
    pub fn push(&mut self, value: T) -> &mut T {
        let slot = self.chain.push_slot();
        self.len += 1;
        // SAFETY: the slot is fresh, aligned for `T` and exclusively ours for
        // the duration of the `&mut self` borrow.
        unsafe {
            slot.as_ptr().write(value);
            &mut *slot.as_ptr()
        }
    }

    /// Number of elements pushed.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Elements per block.
    pub fn block_size(&self) -> u32 {
        self.chain.block_size
    }

    /// Number of blocks in the chain.
    pub fn block_count(&self) -> usize {
        self.chain.block_count
    }

    /// Locate `index` as `(block, slot)`.
    fn slot(&self, index: usize) -> Option<NonNull<T>> {
        if index >= self.len {
            return None;
        }
        let block_size = self.chain.block_size as usize;
        let block = self.chain.block_at(index / block_size)?;
        // SAFETY: `index < len`, so the slot inside this block was written.
        Some(unsafe { elements::<T>(block).add(index % block_size) })
    }

    /// Element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&T> {
        // SAFETY: written slot; shared borrow of `self` prevents mutation.
        self.slot(index).map(|slot| unsafe { &*slot.as_ptr() })
    }

    /// Mutable element at `index`, or `None` past the end.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        // SAFETY: written slot; exclusive borrow of `self`.
        self.slot(index).map(|slot| unsafe { &mut *slot.as_ptr() })
    }

    /// Handle to block `block_index`, found by nearest-end search.
    pub fn block(&self, block_index: usize) -> Option<BlockRef<'_, T>> {
        self.chain.block_at(block_index).map(BlockRef::new)
    }

    /// Iterate elements in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            block: self.chain.first,
            index: 0,
            len: self.len,
            block_size: self.chain.block_size as usize,
            _marker: PhantomData,
        }
    }

    /// Iterate the written part of every block as one contiguous slice.
    pub fn chunks(&self) -> Chunks<'_, T> {
        Chunks {
            block: self.chain.first.map(BlockRef::new),
        }
    }

    /// Reference lookup by walking every block from the head.
    #[cfg(test)]
    pub(crate) fn get_linear(&self, index: usize) -> Option<&T> {
        let mut remaining = index;
        for chunk in self.chunks() {
            if remaining < chunk.len() {
                return chunk.get(remaining);
            }
            remaining -= chunk.len();
        }
        None
    }
}

impl<T: Copy + std::fmt::Debug> std::fmt::Debug for BucketArray<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'s, T: Copy> IntoIterator for &'s BucketArray<'_, T> {
    type Item = &'s T;
    type IntoIter = Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Shared handle to one block of a [`BucketArray`].
///
/// Valid for the lifetime of the borrow it was obtained from.
pub struct BlockRef<'s, T> {
    block: NonNull<BucketBlock>,
    _marker: PhantomData<&'s T>,
}

impl<T> Clone for BlockRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BlockRef<'_, T> {}

impl<T> PartialEq for BlockRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.block == other.block
    }
}

impl<T> Eq for BlockRef<'_, T> {}

impl<T> std::fmt::Debug for BlockRef<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BlockRef").field(&self.block).finish()
    }
}

impl<'s, T> BlockRef<'s, T> {
    fn new(block: NonNull<BucketBlock>) -> Self {
        Self {
            block,
            _marker: PhantomData,
        }
    }

    /// The following block in the chain.
    pub fn next(self) -> Option<BlockRef<'s, T>> {
        // SAFETY: the block outlives `'s`; header reads cannot race with a
        // push because pushing needs `&mut` on the owning array.
        unsafe { self.block.as_ref() }.next.map(BlockRef::new)
    }

    /// Elements written into this block so far.
    pub fn as_slice(self) -> &'s [T] {
        // SAFETY: the first `offset` slots are initialised and immutable
        // while `'s` lasts.
        unsafe {
            let written = self.block.as_ref().offset as usize;
            std::slice::from_raw_parts(elements::<T>(self.block).as_ptr(), written)
        }
    }
}

/// Forward iterator over a [`BucketArray`].
///
/// `Copy`, so a position can be snapshotted and resumed independently.
/// Advancing crosses into the next block whenever the in-block offset wraps
/// to zero; the iterator is exhausted once every element has been visited
/// or the chain runs out.
pub struct Iter<'s, T> {
    block: Option<NonNull<BucketBlock>>,
    index: usize,
    len: usize,
    block_size: usize,
    _marker: PhantomData<&'s T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Iter<'_, T> {}

impl<T> std::fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter")
            .field("index", &self.index)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl<'s, T> Iter<'s, T> {
    /// Element under the iterator, without advancing.
    #[inline]
    pub fn current(&self) -> Option<&'s T> {
        if self.index >= self.len {
            return None;
        }
        let block = self.block?;
        // SAFETY: `index < len` and `block` is the block holding `index`.
        Some(unsafe { &*elements::<T>(block).add(self.index % self.block_size).as_ptr() })
    }

    /// Step to the next element.
    #[inline]
    pub fn advance(&mut self) {
        if self.is_exhausted() {
            return;
        }
        self.index += 1;
        if self.index % self.block_size == 0 {
            if let Some(block) = self.block {
                // SAFETY: live chain block.
                self.block = unsafe { block.as_ref() }.next;
            }
        }
    }

    /// Element `n` positions ahead of the current one.
    pub fn peek_forward(&self, n: usize) -> Option<&'s T> {
        let mut ahead = *self;
        for _ in 0..n {
            ahead.advance();
        }
        ahead.current()
    }

    /// Whether every element has been visited.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.len || self.block.is_none()
    }

    /// Absolute index of the current element.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Offset of the current element inside its block.
    #[inline]
    pub fn offset_in_block(&self) -> usize {
        self.index % self.block_size
    }

    /// Elements per block of the underlying array.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Handle to the block holding the current element.
    pub fn block(&self) -> Option<BlockRef<'s, T>> {
        self.block.map(BlockRef::new)
    }
}

impl<'s, T> Iterator for Iter<'s, T> {
    type Item = &'s T;

    fn next(&mut self) -> Option<&'s T> {
        let item = self.current()?;
        self.advance();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

/// Iterator over the written part of each block.
pub struct Chunks<'s, T> {
    block: Option<BlockRef<'s, T>>,
}

impl<'s, T> Iterator for Chunks<'s, T> {
    type Item = &'s [T];

    fn next(&mut self) -> Option<&'s [T]> {
        let block = self.block?;
        self.block = block.next();
        Some(block.as_slice())
    }
}
