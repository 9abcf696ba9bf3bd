/// Rounds `$value` up to the next multiple of `$alignment`.
///
/// Same arithmetic as [`round_up_to_alignment`], usable in const contexts.
///
/// # Examples
///
/// ```rust
/// use raligned::align_to;
///
/// assert_eq!(align_to!(13, 16), 16);
/// assert_eq!(align_to!(32, 16), 32);
/// assert_eq!(align_to!(0x1007, 16), 0x1010);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $alignment:expr) => {
    (($value + $alignment - 1) - (($value + $alignment - 1) % $alignment))
  };
}

/// Returns `true` if `address` is a multiple of `alignment`.
///
/// `alignment` is expected to be a power of two.
#[inline]
pub const fn is_aligned(
  address: usize,
  alignment: usize,
) -> bool {
  address % alignment == 0
}

/// Returns the smallest address `>= address` that is aligned to `alignment`.
///
/// The caller guarantees `address + alignment - 1` does not overflow.
#[inline]
pub const fn round_up_to_alignment(
  address: usize,
  alignment: usize,
) -> usize {
  align_to!(address, alignment)
}
