//! Bump allocator over a chain of recyclable blocks.

#![allow(
    unsafe_code,
    reason = "the arena hands out raw regions of blocks it owns"
)]

use std::cell::Cell;
use std::mem;
use std::ptr::{self, NonNull};

use crate::block::{acquire_block, release_block, MemoryBlock};

/// Minimum bump capacity of a freshly acquired block (64 KiB).
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// Region allocator owning a doubly linked chain of blocks.
///
/// Allocation bumps a cursor in the current block. When the current block
/// is full the arena moves on to the next block in the chain (left over from
/// before a [`reset`](Self::reset)) if it is large enough, and otherwise
/// links a new block right after the current one.
///
/// Allocation takes `&self` so that several containers can share one arena.
/// The arena is not `Sync`; use one arena per thread.
pub struct Arena {
    /// Block most recently bumped into. `None` until the first allocation.
    current: Cell<Option<NonNull<MemoryBlock>>>,
    block_size: usize,
    block_count: Cell<usize>,
}

// SAFETY: the arena exclusively owns its blocks, and moving it requires
// that no borrow (and therefore no region handed out through `alloc`)
// outlives the move. Raw regions from `alloc_raw` are the caller's concern.
unsafe impl Send for Arena {}

impl Arena {
    /// Create an empty arena with [`DEFAULT_BLOCK_SIZE`] blocks.
    pub fn new() -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE)
    }

    /// Create an empty arena whose blocks hold at least `block_size` bytes.
    ///
    /// No memory is acquired until the first allocation.
    pub fn with_block_size(block_size: usize) -> Self {
        assert!(block_size != 0, "arena block size must be non-zero");
        Self {
            current: Cell::new(None),
            block_size,
            block_count: Cell::new(0),
        }
    }

    /// Minimum capacity of newly acquired blocks.
    pub fn default_block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks currently linked into the chain.
    pub fn block_count(&self) -> usize {
        self.block_count.get()
    }

    /// Allocate `size` bytes aligned to `alignment`.
    ///
    /// `alignment` must be 1, 2, 4 or 8 and `size` must be non-zero; anything
    /// else is a programming error and panics. The returned region stays
    /// valid until the arena is reset, cleared or dropped.
    pub fn alloc_raw(&self, size: usize, alignment: usize) -> NonNull<u8> {
        assert!(size != 0, "arena allocation of zero bytes");
        assert!(
            matches!(alignment, 1 | 2 | 4 | 8),
            "unsupported arena alignment {alignment} (expected 1, 2, 4 or 8)"
        );

        let block = match self.current.get() {
            // SAFETY: blocks in the chain stay allocated until `clear`.
            Some(current) if unsafe { current.as_ref() }.fits(size, alignment) => current,
            Some(current) => self.move_past(current, size, alignment),
            None => {
                let block = acquire_block((size + alignment - 1).max(self.block_size));
                self.block_count.set(1);
                self.current.set(Some(block));
                block
            }
        };

        // SAFETY: `block` is live and was checked (or created) to fit the
        // request, so the bumped region lies inside its bump area.
        unsafe {
            let offset = (*block.as_ptr()).bump(size, alignment);
            MemoryBlock::region(block).add(offset)
        }
    }

    /// Make a block after `current` the current one, reusing the recycled
    /// successor when it can hold the request.
    fn move_past(
        &self,
        current: NonNull<MemoryBlock>,
        size: usize,
        alignment: usize,
    ) -> NonNull<MemoryBlock> {
        // SAFETY: `current` and its successor are live chain blocks.
        let next = unsafe { current.as_ref().next };
        if let Some(next) = next {
            if unsafe { next.as_ref() }.fits(size, alignment) {
                tracing::trace!(size, "reusing recycled arena block");
                self.current.set(Some(next));
                return next;
            }
        }

        let capacity = (size + alignment - 1).max(self.block_size);
        let block = acquire_block(capacity);
        // SAFETY: all three blocks are live; relinking keeps the chain a
        // well-formed doubly linked list with `block` between `current` and
        // its former successor.
        unsafe {
            (*block.as_ptr()).prev = Some(current);
            (*block.as_ptr()).next = next;
            if let Some(next) = next {
                (*next.as_ptr()).prev = Some(block);
            }
            (*current.as_ptr()).next = Some(block);
        }
        self.block_count.set(self.block_count.get() + 1);
        self.current.set(Some(block));
        block
    }

    /// Allocate and initialise a single value (`PushStruct`).
    ///
    /// Values are never dropped, hence the `Copy` bound.
    #[allow(
        clippy::mut_from_ref,
        reason = "every call returns a fresh region disjoint from all others"
    )]
    pub fn alloc<T: Copy>(&self, value: T) -> &mut T {
        let ptr = self
            .alloc_raw(mem::size_of::<T>(), mem::align_of::<T>())
            .cast::<T>();
        // SAFETY: the region is sized and aligned for `T`, freshly bumped and
        // therefore not aliased.
        unsafe {
            ptr.as_ptr().write(value);
            &mut *ptr.as_ptr()
        }
    }

    /// Allocate a copy of `values` (`PushArray`).
    #[allow(
        clippy::mut_from_ref,
        reason = "every call returns a fresh region disjoint from all others"
    )]
    pub fn alloc_slice_copy<T: Copy>(&self, values: &[T]) -> &mut [T] {
        if values.is_empty() {
            return &mut [];
        }
        let ptr = self
            .alloc_raw(mem::size_of_val(values), mem::align_of::<T>())
            .cast::<T>();
        // SAFETY: the region holds exactly `values.len()` elements of `T`,
        // is aligned for `T` and does not overlap `values`.
        unsafe {
            ptr::copy_nonoverlapping(values.as_ptr(), ptr.as_ptr(), values.len());
            std::slice::from_raw_parts_mut(ptr.as_ptr(), values.len())
        }
    }

    /// Rewind every block for another pass without releasing memory.
    ///
    /// Walks to the tail, then back to the head restoring each cursor. The
    /// head becomes current so later allocations refill the chain in order.
    pub fn reset(&mut self) {
        let Some(tail) = self.tail() else {
            return;
        };
        let mut head = tail;
        let mut scan = Some(tail);
        while let Some(block) = scan {
            // SAFETY: `&mut self` guarantees no region is borrowed, and the
            // block is a live member of the chain.
            unsafe {
                (*block.as_ptr()).rewind();
                scan = block.as_ref().prev;
            }
            head = block;
        }
        self.current.set(Some(head));
        tracing::debug!(blocks = self.block_count(), "arena reset");
    }

    /// Release every block back to the system, leaving the arena empty.
    pub fn clear(&mut self) {
        let mut scan = self.tail();
        while let Some(block) = scan {
            // SAFETY: read the link before releasing; each block is released
            // exactly once and nothing borrows it (`&mut self`).
            unsafe {
                scan = block.as_ref().prev;
                release_block(block);
            }
        }
        if self.block_count() != 0 {
            tracing::debug!(blocks = self.block_count(), "arena cleared");
        }
        self.current.set(None);
        self.block_count.set(0);
    }

    /// Total bump capacity across all blocks.
    pub fn capacity(&self) -> usize {
        self.fold_blocks(|block| block.capacity)
    }

    /// Bytes consumed (including alignment padding) across all blocks.
    pub fn allocated_bytes(&self) -> usize {
        self.fold_blocks(|block| block.used)
    }

    fn fold_blocks(&self, f: impl Fn(&MemoryBlock) -> usize) -> usize {
        let mut total = 0;
        let mut scan = self.tail();
        while let Some(block) = scan {
            // SAFETY: live chain block; only plain fields are read.
            let block = unsafe { block.as_ref() };
            total += f(block);
            scan = block.prev;
        }
        total
    }

    /// Last block of the chain, following `next` links from the current one.
    fn tail(&self) -> Option<NonNull<MemoryBlock>> {
        let mut block = self.current.get()?;
        // SAFETY: chain links only ever point at live blocks.
        while let Some(next) = unsafe { block.as_ref().next } {
            block = next;
        }
        Some(block)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("block_size", &self.block_size)
            .field("block_count", &self.block_count())
            .field("allocated_bytes", &self.allocated_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests;
