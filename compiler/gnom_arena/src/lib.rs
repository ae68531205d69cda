//! Memory substrate for the gnom front end.
//!
//! Three layers, leaf first:
//!
//! - [`Arena`]: bump allocation out of a doubly linked chain of page-sized
//!   blocks. Individual allocations are never freed; the whole arena is
//!   either [reset](Arena::reset) for another pass (blocks are kept and
//!   refilled in order) or [cleared](Arena::clear) (blocks go back to the
//!   system).
//! - [`BucketArray`]: append-only sequence built from fixed-capacity blocks
//!   carved out of an arena. Elements never move, which is what lets
//!   downstream code hold zero-copy references into it.
//! - [`FreeListBucketArray`]: the same block chain plus an intrusive free
//!   list threaded through removed slots, for O(1) release and reuse.
//!
//! Containers borrow their arena (`&'a Arena`), so `reset` and `clear`,
//! which need `&mut Arena`, cannot run while any container is alive.
//!
//! # Tracing
//!
//! Block acquisition, reset and clear are logged at `debug` level under the
//! `gnom_arena` target.

mod arena;
mod block;
mod bucket;
mod free_list;

pub use arena::{Arena, DEFAULT_BLOCK_SIZE};
pub use block::PAGE_SIZE;
pub use bucket::{BlockRef, BucketArray, Chunks, Iter};
pub use free_list::{FreeListBucketArray, Slot};
