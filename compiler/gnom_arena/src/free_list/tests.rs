use pretty_assertions::assert_eq;

use super::*;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Node {
    id: u64,
    weight: u32,
}

fn node(id: u64) -> Node {
    Node { id, weight: 0 }
}

#[test]
fn push_then_get() {
    let arena = Arena::new();
    let mut nodes = FreeListBucketArray::new(&arena, 4);
    let a = nodes.push(node(1));
    let b = nodes.push(node(2));
    assert_eq!(nodes.get(&a).id, 1);
    assert_eq!(nodes.get(&b).id, 2);
    assert_eq!(nodes.len(), 2);
}

#[test]
fn get_mut_writes_through() {
    let arena = Arena::new();
    let mut nodes = FreeListBucketArray::new(&arena, 4);
    let a = nodes.push(node(1));
    nodes.get_mut(&a).weight = 40;
    assert_eq!(*nodes.get(&a), Node { id: 1, weight: 40 });
}

#[test]
fn remove_returns_value() {
    let arena = Arena::new();
    let mut nodes = FreeListBucketArray::new(&arena, 4);
    let a = nodes.push(node(7));
    assert_eq!(nodes.remove(a), node(7));
    assert!(nodes.is_empty());
}

#[test]
fn freed_slots_are_reused_last_in_first_out() {
    let arena = Arena::new();
    let mut nodes = FreeListBucketArray::new(&arena, 8);
    let a = nodes.push(node(1));
    let b = nodes.push(node(2));
    let _c = nodes.push(node(3));
    let a_addr = format!("{a:?}");
    let b_addr = format!("{b:?}");

    nodes.remove(a);
    nodes.remove(b);
    let first = nodes.push(node(4));
    let second = nodes.push(node(5));
    assert_eq!(format!("{first:?}"), b_addr);
    assert_eq!(format!("{second:?}"), a_addr);
    assert_eq!(nodes.get(&first).id, 4);
    assert_eq!(nodes.get(&second).id, 5);
}

#[test]
fn reuse_does_not_grow_the_chain() {
    let arena = Arena::new();
    let mut nodes = FreeListBucketArray::new(&arena, 2);
    let mut slots: Vec<_> = (0..4).map(|i| nodes.push(node(i))).collect();
    assert_eq!(nodes.block_count(), 2);
    for slot in slots.drain(..) {
        nodes.remove(slot);
    }
    for i in 0..4 {
        slots.push(nodes.push(node(i)));
    }
    assert_eq!(nodes.block_count(), 2);
    assert_eq!(nodes.len(), 4);
}

#[test]
#[should_panic(expected = "does not belong")]
fn foreign_slot_is_rejected() {
    let arena = Arena::new();
    let mut left = FreeListBucketArray::new(&arena, 4);
    let mut right = FreeListBucketArray::new(&arena, 4);
    let _keep = right.push(node(0));
    let slot = left.push(node(1));
    right.remove(slot);
}

#[test]
#[should_panic(expected = "at least pointer sized")]
fn small_elements_are_rejected() {
    let arena = Arena::new();
    let _ = FreeListBucketArray::<u16>::new(&arena, 4);
}

mod proptest_free_list {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn live_values_survive_interleaved_removal(ops in proptest::collection::vec(any::<(bool, u8)>(), 0..200)) {
            let arena = Arena::with_block_size(512);
            let mut nodes = FreeListBucketArray::new(&arena, 5);
            let mut live: Vec<(Slot<'_, Node>, u64)> = Vec::new();
            for (next, (remove, pick)) in (0u64..).zip(ops) {
                if remove && !live.is_empty() {
                    let (slot, id) = live.swap_remove(usize::from(pick) % live.len());
                    prop_assert_eq!(nodes.remove(slot).id, id);
                } else {
                    live.push((nodes.push(node(next)), next));
                }
            }
            prop_assert_eq!(nodes.len(), live.len());
            for (slot, id) in &live {
                prop_assert_eq!(nodes.get(slot).id, *id);
            }
        }
    }
}
