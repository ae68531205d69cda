#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::PAGE_SIZE;

// === Allocation ===

#[test]
fn first_allocation_acquires_one_block() {
    let arena = Arena::with_block_size(1024);
    assert_eq!(arena.block_count(), 0);
    arena.alloc_raw(16, 8);
    assert_eq!(arena.block_count(), 1);
    assert!(arena.capacity() >= 1024);
}

#[test]
fn allocations_are_aligned() {
    let arena = Arena::with_block_size(256);
    for align in [1, 2, 4, 8] {
        // Misalign the cursor first.
        arena.alloc_raw(1, 1);
        let ptr = arena.alloc_raw(3, align);
        assert_eq!(ptr.as_ptr() as usize % align, 0, "alignment {align}");
    }
}

#[test]
fn padding_counts_toward_allocated_bytes() {
    let arena = Arena::with_block_size(256);
    arena.alloc_raw(1, 1);
    arena.alloc_raw(8, 8);
    // 1 byte, 7 bytes of padding, 8 bytes.
    assert_eq!(arena.allocated_bytes(), 16);
}

#[test]
fn regions_do_not_overlap() {
    let arena = Arena::with_block_size(64);
    let mut regions: Vec<(usize, usize)> = (1..200)
        .map(|i| {
            let size = i % 13 + 1;
            (arena.alloc_raw(size, 4).as_ptr() as usize, size)
        })
        .collect();
    regions.sort_unstable();
    for pair in regions.windows(2) {
        assert!(pair[0].0 + pair[0].1 <= pair[1].0);
    }
}

#[test]
fn oversized_request_gets_its_own_block() {
    let arena = Arena::with_block_size(64);
    arena.alloc_raw(8, 8);
    arena.alloc_raw(3 * PAGE_SIZE, 8);
    assert_eq!(arena.block_count(), 2);
    assert!(arena.capacity() >= 3 * PAGE_SIZE);
}

#[test]
fn full_block_links_a_new_one() {
    let arena = Arena::with_block_size(PAGE_SIZE);
    let per_block = arena_capacity_after_first(&arena);
    for _ in 0..per_block / 64 + 1 {
        arena.alloc_raw(64, 8);
    }
    assert_eq!(arena.block_count(), 2);
}

fn arena_capacity_after_first(arena: &Arena) -> usize {
    arena.alloc_raw(1, 1);
    arena.capacity()
}

#[test]
#[should_panic(expected = "zero bytes")]
fn zero_size_is_fatal() {
    Arena::new().alloc_raw(0, 1);
}

#[test]
#[should_panic(expected = "unsupported arena alignment")]
fn odd_alignment_is_fatal() {
    Arena::new().alloc_raw(4, 3);
}

#[test]
#[should_panic(expected = "unsupported arena alignment")]
fn over_aligned_request_is_fatal() {
    Arena::new().alloc_raw(16, 16);
}

// === Typed helpers ===

#[test]
fn alloc_returns_initialised_value() {
    let arena = Arena::new();
    let a = arena.alloc(0xdead_beef_u64);
    let b = arena.alloc((1u8, 2u16));
    *a += 1;
    assert_eq!(*a, 0xdead_bef0);
    assert_eq!(*b, (1, 2));
}

#[test]
fn alloc_slice_copy_copies() {
    let arena = Arena::new();
    let values = [1u32, 2, 3, 4];
    let copy = arena.alloc_slice_copy(&values);
    copy[0] = 10;
    assert_eq!(copy, &[10, 2, 3, 4]);
    assert_eq!(values[0], 1);
    assert!(arena.alloc_slice_copy::<u32>(&[]).is_empty());
}

// === Reset / clear ===

#[test]
fn reset_reuses_blocks() {
    let mut arena = Arena::with_block_size(PAGE_SIZE);
    for _ in 0..200 {
        arena.alloc_raw(100, 4);
    }
    let blocks = arena.block_count();
    let capacity = arena.capacity();
    assert!(blocks > 1);

    arena.reset();
    assert_eq!(arena.allocated_bytes(), 0);
    assert_eq!(arena.block_count(), blocks);

    for _ in 0..200 {
        arena.alloc_raw(100, 4);
    }
    assert_eq!(arena.block_count(), blocks, "no new block after reset");
    assert_eq!(arena.capacity(), capacity);
}

#[test]
fn reset_refills_from_the_head() {
    let mut arena = Arena::with_block_size(PAGE_SIZE);
    let first = arena.alloc_raw(8, 8).as_ptr() as usize;
    for _ in 0..100 {
        arena.alloc_raw(512, 8);
    }
    arena.reset();
    let again = arena.alloc_raw(8, 8).as_ptr() as usize;
    assert_eq!(first, again);
}

#[test]
fn too_small_successor_is_skipped_not_dropped() {
    let mut arena = Arena::with_block_size(PAGE_SIZE);
    arena.alloc_raw(16, 8);
    arena.alloc_raw(3 * PAGE_SIZE, 8);
    assert_eq!(arena.block_count(), 2);
    arena.reset();

    // Fill the head, then ask for more than the successor can hold.
    arena.alloc_raw(arena.default_block_size() - 64, 8);
    arena.alloc_raw(8 * PAGE_SIZE, 8);
    assert_eq!(arena.block_count(), 3);
}

#[test]
fn reset_on_empty_arena_is_noop() {
    let mut arena = Arena::new();
    arena.reset();
    assert_eq!(arena.block_count(), 0);
}

#[test]
fn clear_releases_everything() {
    let mut arena = Arena::with_block_size(128);
    for _ in 0..100 {
        arena.alloc_raw(64, 8);
    }
    assert!(arena.block_count() > 0);
    arena.clear();
    assert_eq!(arena.block_count(), 0);
    assert_eq!(arena.capacity(), 0);

    // Still usable afterwards.
    arena.alloc_raw(8, 8);
    assert_eq!(arena.block_count(), 1);
}

#[test]
fn arena_can_move_between_threads() {
    let arena = Arena::new();
    arena.alloc_raw(32, 8);
    let handle = std::thread::spawn(move || arena.block_count());
    assert_eq!(handle.join().unwrap(), 1);
}
