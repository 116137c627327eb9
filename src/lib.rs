//! # listalloc - A Linked-List Memory Allocator Library
//!
//! This crate provides a simple **first-fit free-list allocator** that manages
//! a single growable heap region, by default the one behind the `sbrk` system
//! call.
//!
//! ## Overview
//!
//! Every allocation is a *block*: a fixed-size header immediately followed by
//! the payload handed to the caller. Blocks are chained into one singly linked
//! list in the order they were carved from the heap:
//!
//! ```text
//!    ------------      ---------------------------------
//!    |          |      |                               |
//!    |          v      |                               v
//!    |          -------------------------       -------------------------
//!  [head]       | header | payload      |       | header | payload      |
//!               -------------------------       -------------------------
//!                                               ^
//!  [tail]                                       |
//!    |                                          |
//!    --------------------------------------------
//! ```
//!
//! Freed blocks are marked reusable in place and handed back to later
//! allocations of the same or smaller size (first fit). Only when the freed
//! block is the last one before the heap boundary is its memory actually
//! returned to the heap source.
//!
//! ## Crate Structure
//!
//! ```text
//!   listalloc
//!   ├── align      - Word-alignment macro (align!)
//!   ├── block      - Block header layout and carving primitives (internal)
//!   ├── error      - AllocError
//!   ├── heap       - HeapGrower trait, BrkHeap and FixedHeap growers
//!   └── list       - ListAllocator implementation
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use listalloc::{FixedHeap, ListAllocator};
//!
//! let allocator = ListAllocator::new(FixedHeap::new(4096));
//!
//! let ptr = allocator.allocate(64).unwrap();
//!
//! unsafe {
//!     ptr.as_ptr().write(42);
//!     assert_eq!(ptr.as_ptr().read(), 42);
//!
//!     allocator.free(ptr.as_ptr());
//! }
//! ```
//!
//! To manage the real process heap, construct the allocator over [`BrkHeap`]
//! instead. `BrkHeap` moves the program break with `sbrk(2)`, so the process
//! must not have another allocator fighting over the break at the same time.
//!
//! ## How It Works
//!
//! Allocation first scans the block list for a free block large enough for the
//! request. The scan is first-fit: the earliest-carved candidate wins, and it
//! is handed back whole even when it is larger than asked for. Only when no
//! block qualifies does the allocator extend the heap:
//!
//! ```text
//!   allocate(n)
//!       │
//!       ├── free block with size >= n found ──> mark used, return its payload
//!       │
//!       └── none ──> extend heap by header + n, carve a new tail block
//! ```
//!
//! Freeing runs the decision in reverse. A block whose payload ends exactly at
//! the current heap boundary is unlinked and the boundary is pulled back over
//! it; any other block just flips its free flag and waits for reuse:
//!
//! ```text
//!   free(p)
//!       │
//!       ├── payload end == heap boundary ──> unlink, shrink the heap
//!       │
//!       └── otherwise ──> mark free, keep for reuse
//! ```
//!
//! All list and boundary mutations happen behind one process-wide mutex, so
//! any number of threads may call into the same allocator.
//!
//! ## Features
//!
//! - **First-fit reuse**: freed blocks satisfy later allocations without
//!   touching the OS
//! - **Boundary reclaim**: trailing blocks are returned to the heap source
//! - **Pluggable heap source**: anything implementing [`HeapGrower`] works,
//!   including the in-process [`FixedHeap`] used by the test suite
//! - **Thread safe**: one lock serializes all bookkeeping
//!
//! ## Limitations
//!
//! - **No splitting**: an oversized free block is reused whole; the surplus is
//!   wasted until the block is reclaimed
//! - **No coalescing**: adjacent free blocks are never merged
//! - **Single reclaim per free**: freeing a block can expose another trailing
//!   free block, which stays in the list until it is itself freed or reused
//! - **Word alignment only**: payloads are aligned to the machine word, never
//!   to larger alignments
//!
//! ## Safety
//!
//! [`ListAllocator::free`] and [`ListAllocator::resize`] trust the caller to
//! pass pointers previously returned by the same allocator and not yet freed.
//! Nothing validates provenance; a foreign or stale pointer corrupts the block
//! list. Both operations are `unsafe fn` for that reason.

pub mod align;
mod block;
mod error;
mod heap;
mod list;

pub use error::AllocError;
pub use heap::{BrkHeap, FixedHeap, HeapGrower};
pub use list::ListAllocator;
