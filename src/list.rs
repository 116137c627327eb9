use std::fmt::Write;
use std::{mem, ptr, ptr::NonNull};

use log::{debug, trace};
use parking_lot::Mutex;

use crate::{
  align,
  block::{Block, HEADER_SIZE},
  error::AllocError,
  heap::{BrkHeap, HeapGrower},
};

/// Block list and heap source behind the allocator's lock.
///
/// The list head/tail, every reachable block's fields and the heap boundary
/// form one unit of shared state; none of them is touched without the lock.
struct Inner<G> {
  head: *mut Block,
  tail: *mut Block,
  grower: G,
}

// Blocks are reachable only through the lock owning this state, so the raw
// pointers move between threads with it.
unsafe impl<G: Send> Send for Inner<G> {}

impl<G: HeapGrower> Inner<G> {
  /// First-fit scan: the earliest free block large enough wins.
  fn find_reusable(
    &self,
    size: usize,
  ) -> *mut Block {
    let mut current = self.head;

    while !current.is_null() {
      unsafe {
        if (*current).is_free && (*current).size >= size {
          return current;
        }
        current = (*current).next;
      }
    }

    ptr::null_mut()
  }

  /// Extends the heap and links a fresh in-use block as the new tail.
  fn carve_block(
    &mut self,
    size: usize,
  ) -> Result<*mut Block, AllocError> {
    let total = HEADER_SIZE + size;
    let address = self.grower.extend(total);

    if address.is_null() {
      return Err(AllocError::HeapExhausted { requested: total });
    }

    let block = unsafe { Block::carve(address, size) };

    if self.head.is_null() {
      self.head = block;
    }

    if !self.tail.is_null() {
      unsafe {
        (*self.tail).next = block;
      }
    }

    self.tail = block;

    debug!("extended heap by {} bytes, carved block at {:p}", total, block);

    Ok(block)
  }

  /// Unlinks the current tail block; its predecessor becomes the tail.
  ///
  /// Carving order and address order coincide, so the block at the heap
  /// boundary is always the list tail.
  fn drop_tail(&mut self) {
    if self.head == self.tail {
      self.head = ptr::null_mut();
      self.tail = ptr::null_mut();
      return;
    }

    let mut current = self.head;

    while !current.is_null() {
      unsafe {
        if (*current).next == self.tail {
          (*current).next = ptr::null_mut();
          self.tail = current;
        }
        current = (*current).next;
      }
    }
  }
}

/// First-fit free-list allocator over a growable heap region.
///
/// All bookkeeping happens behind one mutex, so a shared reference is enough
/// for every operation and the allocator can be used from any number of
/// threads. The lock covers the block list and the heap boundary only; the
/// payloads themselves are handed to callers unsynchronized, exactly like any
/// other allocator.
///
/// `G` selects the heap source: [`BrkHeap`] manages the process program
/// break, [`FixedHeap`](crate::FixedHeap) a self-contained buffer.
pub struct ListAllocator<G: HeapGrower = BrkHeap> {
  inner: Mutex<Inner<G>>,
}

impl<G: HeapGrower> ListAllocator<G> {
  /// An allocator with an empty block list over the given heap source.
  pub fn new(grower: G) -> Self {
    Self {
      inner: Mutex::new(Inner {
        head: ptr::null_mut(),
        tail: ptr::null_mut(),
        grower,
      }),
    }
  }

  /// Allocates `size` bytes and returns the payload address.
  ///
  /// The request is rounded up to a whole machine word, and a reused block
  /// may be larger still; the caller always gets at least `size` usable
  /// bytes.
  pub fn allocate(
    &self,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    if size == 0 {
      return Err(AllocError::ZeroSized);
    }

    let size = align!(size);
    let mut inner = self.inner.lock();

    let reusable = inner.find_reusable(size);

    if !reusable.is_null() {
      unsafe {
        (*reusable).is_free = false;
      }

      trace!("reused block at {:p} for a {} byte request", reusable, size);

      // Non-null: the payload sits HEADER_SIZE past a non-null header.
      return Ok(unsafe { NonNull::new_unchecked(Block::payload(reusable)) });
    }

    let block = inner.carve_block(size)?;

    Ok(unsafe { NonNull::new_unchecked(Block::payload(block)) })
  }

  /// Allocates room for `count` elements of `element_size` bytes each and
  /// zero-fills it.
  ///
  /// Fails if either argument is zero or their product overflows `usize`.
  pub fn allocate_zeroed(
    &self,
    count: usize,
    element_size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    if count == 0 || element_size == 0 {
      return Err(AllocError::ZeroSized);
    }

    let size = count
      .checked_mul(element_size)
      .ok_or(AllocError::SizeOverflow { count, element_size })?;

    let payload = self.allocate(size)?;

    unsafe {
      ptr::write_bytes(payload.as_ptr(), 0, size);
    }

    Ok(payload)
  }

  /// Grows the allocation behind `payload` to at least `new_size` bytes.
  ///
  /// A null `payload` with a nonzero size is a plain allocation. When the
  /// block's recorded size already covers `new_size` the same pointer comes
  /// back untouched; a block is never shrunk in place. Otherwise the data
  /// moves into a fresh allocation and the old block is freed. On failure
  /// the old block stays valid and owned by the caller.
  ///
  /// # Safety
  ///
  /// `payload` must be null or a pointer obtained from this allocator that
  /// has not been freed since.
  pub unsafe fn resize(
    &self,
    payload: *mut u8,
    new_size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    if payload.is_null() {
      if new_size == 0 {
        return Err(AllocError::ZeroSized);
      }

      return self.allocate(new_size);
    }

    let current_size = {
      let _inner = self.inner.lock();
      unsafe { (*Block::from_payload(payload)).size }
    };

    if current_size >= new_size {
      return Ok(unsafe { NonNull::new_unchecked(payload) });
    }

    let grown = self.allocate(new_size)?;

    unsafe {
      ptr::copy_nonoverlapping(payload, grown.as_ptr(), current_size);
      self.free(payload);
    }

    Ok(grown)
  }

  /// Releases the allocation behind `payload`. Null is a no-op.
  ///
  /// The trailing block is physically reclaimed by pulling the heap boundary
  /// back over it; any other block is marked free and kept for reuse. Only
  /// the freed block itself is ever reclaimed, even when that exposes another
  /// free block at the boundary.
  ///
  /// # Safety
  ///
  /// `payload` must be null or a pointer obtained from this allocator that
  /// has not been freed since.
  pub unsafe fn free(
    &self,
    payload: *mut u8,
  ) {
    if payload.is_null() {
      return;
    }

    let mut inner = self.inner.lock();
    let block = unsafe { Block::from_payload(payload) };

    if unsafe { Block::payload_end(block) } == inner.grower.boundary() {
      let total = HEADER_SIZE + unsafe { (*block).size };

      inner.drop_tail();
      inner.grower.shrink(total);

      debug!("reclaimed block at {:p}, heap shrunk by {} bytes", block, total);
      return;
    }

    unsafe {
      (*block).is_free = true;
    }

    trace!("marked block at {:p} free for reuse", block);
  }

  /// Human-readable listing of the block list, oldest block first.
  ///
  /// One line for head/tail, then one line per block with its address, size,
  /// free flag and successor.
  pub fn dump(&self) -> String {
    let inner = self.inner.lock();
    let mut out = String::new();

    let _ = writeln!(out, "head = {:p}, tail = {:p}", inner.head, inner.tail);

    let mut current = inner.head;

    while !current.is_null() {
      unsafe {
        let _ = writeln!(
          out,
          "addr = {:p}, size = {}, is_free = {}, next = {:p}",
          current,
          (*current).size,
          (*current).is_free,
          (*current).next,
        );
        current = (*current).next;
      }
    }

    out
  }
}

impl<G: HeapGrower + Default> Default for ListAllocator<G> {
  fn default() -> Self {
    Self::new(G::default())
  }
}
