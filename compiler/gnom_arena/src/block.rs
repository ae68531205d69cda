//! Arena blocks and the allocator boundary.
//!
//! A block is one page-aligned allocation: a [`MemoryBlock`] header followed
//! by the bump region. [`acquire_block`] and [`release_block`] are the only
//! places that talk to the global allocator.

#![allow(
    unsafe_code,
    reason = "blocks are raw page allocations with an in-place header"
)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Granularity of block allocations. Requests are rounded up to a multiple.
pub const PAGE_SIZE: usize = 4096;

/// Largest alignment a block region can serve.
pub(crate) const MAX_ALIGN: usize = 8;

/// Header size rounded so the bump region starts `MAX_ALIGN`-aligned.
const HEADER_SIZE: usize = round_up(std::mem::size_of::<MemoryBlock>(), MAX_ALIGN);

/// Round `value` up to the next multiple of `align` (a power of two).
pub(crate) const fn round_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

/// Header placed at the start of every block.
///
/// The bump region follows the header. `used` is the cursor offset into that
/// region and `capacity - used` is the remaining space.
#[repr(C)]
pub(crate) struct MemoryBlock {
    pub(crate) prev: Option<NonNull<MemoryBlock>>,
    pub(crate) next: Option<NonNull<MemoryBlock>>,
    pub(crate) used: usize,
    pub(crate) capacity: usize,
    /// Size of the whole allocation, header included.
    total: usize,
}

impl MemoryBlock {
    /// Padding needed to align the cursor to `align`.
    ///
    /// The region base is at least `MAX_ALIGN`-aligned, so the padding only
    /// depends on the cursor offset.
    #[inline]
    fn padding(&self, align: usize) -> usize {
        self.used.wrapping_neg() & (align - 1)
    }

    /// Bytes left in the bump region.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    /// Whether `size` bytes at `align` fit behind the cursor.
    #[inline]
    pub(crate) fn fits(&self, size: usize, align: usize) -> bool {
        self.padding(align)
            .checked_add(size)
            .is_some_and(|needed| needed <= self.remaining())
    }

    /// Advance the cursor past an aligned `size`-byte region and return the
    /// region's offset from the start of the bump area.
    ///
    /// Caller must have checked [`fits`](Self::fits).
    #[inline]
    pub(crate) fn bump(&mut self, size: usize, align: usize) -> usize {
        let start = self.used + self.padding(align);
        debug_assert!(start + size <= self.capacity, "bump past block end");
        self.used = start + size;
        start
    }

    /// Rewind the cursor to the start of the region.
    #[inline]
    pub(crate) fn rewind(&mut self) {
        self.used = 0;
    }

    /// Pointer to the first byte of the bump region of `block`.
    #[inline]
    pub(crate) fn region(block: NonNull<MemoryBlock>) -> NonNull<u8> {
        // SAFETY: every block allocation is at least HEADER_SIZE bytes long
        // (`acquire_block` adds the header to the requested capacity), so
        // the offset stays inside the allocation.
        unsafe { block.cast::<u8>().add(HEADER_SIZE) }
    }
}

/// Acquire a block whose bump region holds at least `min_capacity` bytes.
///
/// The allocation is rounded up to whole pages and the surplus becomes
/// extra capacity. Allocation failure aborts via
/// [`handle_alloc_error`](alloc::handle_alloc_error).
pub(crate) fn acquire_block(min_capacity: usize) -> NonNull<MemoryBlock> {
    let requested = HEADER_SIZE
        .checked_add(min_capacity)
        .and_then(|n| n.checked_add(PAGE_SIZE - 1))
        .unwrap_or_else(|| panic!("arena block of {min_capacity} bytes overflows usize"));
    let total = requested & !(PAGE_SIZE - 1);
    let layout = match Layout::from_size_align(total, PAGE_SIZE) {
        Ok(layout) => layout,
        Err(err) => panic!("invalid arena block layout ({total} bytes): {err}"),
    };

    // SAFETY: `layout` has a non-zero size (at least one page).
    let raw = unsafe { alloc::alloc(layout) };
    let Some(block) = NonNull::new(raw.cast::<MemoryBlock>()) else {
        alloc::handle_alloc_error(layout);
    };

    // SAFETY: the allocation is page-aligned and larger than the header, so
    // writing a `MemoryBlock` at its start is in bounds and aligned.
    unsafe {
        block.as_ptr().write(MemoryBlock {
            prev: None,
            next: None,
            used: 0,
            capacity: total - HEADER_SIZE,
            total,
        });
    }
    tracing::debug!(total, capacity = total - HEADER_SIZE, "acquired arena block");
    block
}

/// Return a block to the allocator.
///
/// # Safety
///
/// `block` must come from [`acquire_block`], must not have been released
/// already, and nothing may point into it afterwards.
pub(crate) unsafe fn release_block(block: NonNull<MemoryBlock>) {
    // SAFETY: the header was written by `acquire_block` and is still live.
    let total = unsafe { block.as_ref().total };
    // SAFETY: `total` and PAGE_SIZE are the exact size and alignment used
    // to allocate this block.
    unsafe {
        let layout = Layout::from_size_align_unchecked(total, PAGE_SIZE);
        alloc::dealloc(block.as_ptr().cast::<u8>(), layout);
    }
}
