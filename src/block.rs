use std::{mem, ptr};

/// Bookkeeping header carved immediately before every payload.
///
/// The caller-visible address of a block is always
/// `header address + HEADER_SIZE`, so a payload pointer is enough to find its
/// header again. `size` records the word-rounded payload size and never
/// changes after carving.
#[repr(C)]
pub struct Block {
  pub size: usize,
  pub is_free: bool,
  pub next: *mut Block,
}

/// Byte distance between a block's header and its payload.
pub const HEADER_SIZE: usize = mem::size_of::<Block>();

impl Block {
  /// Writes a fresh in-use header at `address` and returns it.
  ///
  /// # Safety
  ///
  /// `address` must point to at least `HEADER_SIZE + size` writable bytes,
  /// word-aligned, not overlapping any live block.
  pub unsafe fn carve(
    address: *mut u8,
    size: usize,
  ) -> *mut Block {
    let block = address as *mut Block;

    unsafe {
      (*block).size = size;
      (*block).is_free = false;
      (*block).next = ptr::null_mut();
    }

    block
  }

  /// The payload address handed to callers for this header.
  ///
  /// # Safety
  ///
  /// `block` must point to a live header.
  pub unsafe fn payload(block: *mut Block) -> *mut u8 {
    unsafe { (block as *mut u8).add(HEADER_SIZE) }
  }

  /// Recovers the header a payload pointer belongs to.
  ///
  /// # Safety
  ///
  /// `payload` must be an address previously returned by [`Block::payload`]
  /// for a block that is still present in the list.
  pub unsafe fn from_payload(payload: *mut u8) -> *mut Block {
    unsafe { payload.sub(HEADER_SIZE) as *mut Block }
  }

  /// One past the last payload byte of this block.
  ///
  /// A block whose payload end coincides with the heap boundary is the
  /// trailing block and can be physically reclaimed.
  ///
  /// # Safety
  ///
  /// `block` must point to a live header.
  pub unsafe fn payload_end(block: *mut Block) -> *mut u8 {
    unsafe { Block::payload(block).add((*block).size) }
  }
}
