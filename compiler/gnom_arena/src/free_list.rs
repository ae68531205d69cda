//! Bucket array with an intrusive free list for O(1) removal and reuse.

#![allow(
    unsafe_code,
    reason = "free slots store the list link in place of the element"
)]

use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::bucket::Chain;
use crate::Arena;

/// Handle to a live element of a [`FreeListBucketArray`].
///
/// Not `Clone`: handing the slot back through
/// [`remove`](FreeListBucketArray::remove) consumes it, so a handle cannot be
/// released twice.
pub struct Slot<'a, T> {
    ptr: NonNull<T>,
    _marker: PhantomData<&'a T>,
}

impl<T> std::fmt::Debug for Slot<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Slot").field(&self.ptr).finish()
    }
}

impl<T> PartialEq for Slot<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

/// Bucket storage whose removed slots are recycled before new ones are
/// taken from the tail block.
///
/// A removed slot holds the address of the next free slot in its first
/// pointer-sized bytes, which is why elements must be at least as large as
/// a pointer. Freed slots are reused last-in first-out.
pub struct FreeListBucketArray<'a, T> {
    chain: Chain<'a, T>,
    free: Option<NonNull<u8>>,
    live: usize,
}

impl<'a, T: Copy> FreeListBucketArray<'a, T> {
    /// Create an empty array storing `block_size` elements per block.
    pub fn new(arena: &'a Arena, block_size: u32) -> Self {
        assert!(
            mem::size_of::<T>() >= mem::size_of::<*mut u8>(),
            "free-list elements must be at least pointer sized ({} < {})",
            mem::size_of::<T>(),
            mem::size_of::<*mut u8>()
        );
        Self {
            chain: Chain::new(arena, block_size),
            free: None,
            live: 0,
        }
    }

    /// Store `value`, reusing the most recently freed slot if there is one.
    pub fn push(&mut self, value: T) -> Slot<'a, T> {
        let ptr = match self.free {
            Some(free) => {
                // SAFETY: free slots are owned by the chain and hold the next
                // link in their first bytes (written by `remove`).
                self.free = unsafe { free.as_ptr().cast::<Option<NonNull<u8>>>().read_unaligned() };
                free.cast::<T>()
            }
            None => self.chain.push_slot(),
        };
        // SAFETY: `ptr` is an aligned slot of the chain that no handle refers
        // to (fresh or freed).
        unsafe { ptr.as_ptr().write(value) };
        self.live += 1;
        Slot {
            ptr,
            _marker: PhantomData,
        }
    }

    /// Release `slot` for reuse and return the value it held.
    ///
    /// Panics if the handle does not belong to this array.
    pub fn remove(&mut self, slot: Slot<'a, T>) -> T {
        self.validate(&slot);
        // SAFETY: validated slot of this chain; the handle is consumed, so
        // nothing else refers to it once the link is written over the value.
        unsafe {
            let value = slot.ptr.as_ptr().read();
            slot.ptr
                .as_ptr()
                .cast::<Option<NonNull<u8>>>()
                .write_unaligned(self.free);
            self.free = Some(slot.ptr.cast::<u8>());
            self.live -= 1;
            value
        }
    }

    /// Element behind `slot`.
    pub fn get(&self, slot: &Slot<'a, T>) -> &T {
        self.validate(slot);
        // SAFETY: validated live slot; the shared borrow of `self` prevents
        // removal or mutation.
        unsafe { &*slot.ptr.as_ptr() }
    }

    /// Mutable element behind `slot`.
    pub fn get_mut(&mut self, slot: &Slot<'a, T>) -> &mut T {
        self.validate(slot);
        // SAFETY: validated live slot; exclusive borrow of `self`.
        unsafe { &mut *slot.ptr.as_ptr() }
    }

    /// Number of live (pushed and not yet removed) elements.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of blocks in the chain.
    pub fn block_count(&self) -> usize {
        self.chain.block_count
    }

    fn validate(&self, slot: &Slot<'a, T>) {
        assert!(
            self.chain.owns_slot(slot.ptr),
            "slot {:p} does not belong to this free-list array",
            slot.ptr
        );
    }
}

impl<T> std::fmt::Debug for FreeListBucketArray<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreeListBucketArray")
            .field("live", &self.live)
            .field("has_free", &self.free.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
