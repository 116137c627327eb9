use thiserror::Error;

/// Failure returned by the allocation operations.
///
/// Every failure leaves the allocator's bookkeeping exactly as it was before
/// the call; no partial state is ever created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
  /// A zero byte count, zero element count or zero element size was
  /// requested. Zero-size blocks are never created.
  #[error("zero-sized allocation request")]
  ZeroSized,

  /// `count * element_size` does not fit in `usize`.
  #[error("allocation size overflows: {count} elements of {element_size} bytes")]
  SizeOverflow {
    count: usize,
    element_size: usize,
  },

  /// The heap source could not extend the heap by the needed amount.
  #[error("heap exhausted while growing by {requested} bytes")]
  HeapExhausted {
    requested: usize,
  },
}
