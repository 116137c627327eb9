/// Rounds the given byte count up to the next machine word multiple.
///
/// Every requested payload size passes through this before any bookkeeping
/// happens, which keeps block headers and payload addresses word-aligned as
/// the heap grows.
///
/// # Examples
///
/// ```rust
/// use std::mem;
/// use listalloc::align;
///
/// let word = mem::size_of::<usize>();
///
/// assert_eq!(align!(1), word);
/// assert_eq!(align!(word), word);
/// assert_eq!(align!(word + 1), 2 * word);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + mem::size_of::<usize>() - 1) & !(mem::size_of::<usize>() - 1)
  };
}

#[cfg(test)]
mod tests {
  use std::mem;

  #[test]
  fn test_word_multiples_are_unchanged() {
    let word = mem::size_of::<usize>();

    for i in 1..=8 {
      assert_eq!(word * i, align!(word * i));
    }
  }

  #[test]
  fn test_rounds_up_to_next_word() {
    let word = mem::size_of::<usize>();

    for i in 0..8 {
      for size in (word * i + 1)..(word * (i + 1)) {
        assert_eq!(word * (i + 1), align!(size));
      }
    }
  }
}
