use std::{mem, ptr};

use libc::{c_void, intptr_t, sbrk};

/// Source of contiguous heap space for a [`ListAllocator`].
///
/// The heap is one region with a single moving boundary: [`extend`] pushes the
/// boundary forward and hands back the region it just uncovered, [`shrink`]
/// pulls it back over the trailing region. The boundary never moves any other
/// way.
///
/// [`ListAllocator`]: crate::ListAllocator
/// [`extend`]: HeapGrower::extend
/// [`shrink`]: HeapGrower::shrink
pub trait HeapGrower {
  /// Extends the heap by `bytes` and returns the start of the new region,
  /// or null if the heap cannot grow.
  fn extend(
    &mut self,
    bytes: usize,
  ) -> *mut u8;

  /// The current heap boundary, one past the last usable byte.
  fn boundary(&mut self) -> *mut u8;

  /// Moves the boundary back by `bytes`, releasing the trailing region.
  ///
  /// Callers only shrink over a region they obtained from [`extend`] and no
  /// longer reference.
  ///
  /// [`extend`]: HeapGrower::extend
  fn shrink(
    &mut self,
    bytes: usize,
  );
}

/// Grows the heap by moving the program break with `sbrk(2)`.
///
/// The program break is a process-wide resource. While an allocator over
/// `BrkHeap` is live, nothing else in the process may move the break, or the
/// boundary bookkeeping falls apart. In particular the test harness and the
/// Rust standard library allocate through `malloc`, which on most libcs also
/// uses the break, so `BrkHeap` is only safe in processes built around this
/// allocator. Tests use [`FixedHeap`] instead.
#[derive(Debug, Default)]
pub struct BrkHeap;

impl HeapGrower for BrkHeap {
  fn extend(
    &mut self,
    bytes: usize,
  ) -> *mut u8 {
    // sbrk() increments the break by `bytes` and returns its previous
    // value, which is exactly the start of the new region.
    let address = unsafe { sbrk(bytes as intptr_t) };

    if address == usize::MAX as *mut c_void {
      return ptr::null_mut();
    }

    address as *mut u8
  }

  fn boundary(&mut self) -> *mut u8 {
    // sbrk(0) reads the current break without moving it.
    unsafe { sbrk(0) as *mut u8 }
  }

  fn shrink(
    &mut self,
    bytes: usize,
  ) {
    unsafe {
      sbrk(0 - bytes as intptr_t);
    }
  }
}

/// Fixed-capacity heap inside an owned buffer.
///
/// Behaves like [`BrkHeap`] over a private region instead of the process
/// break: the boundary starts at the buffer base and moves within it. Lets
/// any number of independent allocator instances coexist in one process,
/// which is what the test suite relies on.
pub struct FixedHeap {
  // u64 backing keeps the base, and with it every carved header, word-aligned.
  buf: Box<[u64]>,
  used: usize,
}

impl FixedHeap {
  /// A heap holding up to `capacity` bytes, rounded up to a whole word.
  pub fn new(capacity: usize) -> Self {
    let words = capacity.div_ceil(mem::size_of::<u64>());

    Self {
      buf: vec![0u64; words].into_boxed_slice(),
      used: 0,
    }
  }

  /// Total capacity in bytes.
  pub fn capacity(&self) -> usize {
    self.buf.len() * mem::size_of::<u64>()
  }

  fn base(&mut self) -> *mut u8 {
    self.buf.as_mut_ptr() as *mut u8
  }
}

impl HeapGrower for FixedHeap {
  fn extend(
    &mut self,
    bytes: usize,
  ) -> *mut u8 {
    if self.used + bytes > self.capacity() {
      return ptr::null_mut();
    }

    let address = unsafe { self.base().add(self.used) };
    self.used += bytes;

    address
  }

  fn boundary(&mut self) -> *mut u8 {
    unsafe { self.base().add(self.used) }
  }

  fn shrink(
    &mut self,
    bytes: usize,
  ) {
    debug_assert!(bytes <= self.used);
    self.used -= bytes;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extend_moves_boundary_forward() {
    let mut heap = FixedHeap::new(128);

    let start = heap.boundary();
    let first = heap.extend(32);

    assert_eq!(start, first);
    assert_eq!(unsafe { first.add(32) }, heap.boundary());

    let second = heap.extend(16);

    assert_eq!(unsafe { first.add(32) }, second);
    assert_eq!(unsafe { first.add(48) }, heap.boundary());
  }

  #[test]
  fn test_extend_fails_past_capacity() {
    let mut heap = FixedHeap::new(64);

    assert!(!heap.extend(64).is_null());
    assert!(heap.extend(1).is_null());

    // A failed extend leaves the boundary alone.
    let boundary = heap.boundary();
    assert!(heap.extend(8).is_null());
    assert_eq!(boundary, heap.boundary());
  }

  #[test]
  fn test_shrink_reopens_the_region() {
    let mut heap = FixedHeap::new(64);

    let first = heap.extend(48);
    heap.shrink(48);

    assert_eq!(first, heap.boundary());
    assert_eq!(first, heap.extend(48));
  }

  #[test]
  fn test_capacity_rounds_up_to_words() {
    let heap = FixedHeap::new(13);

    assert_eq!(0, heap.capacity() % mem::size_of::<u64>());
    assert!(heap.capacity() >= 13);
  }
}
