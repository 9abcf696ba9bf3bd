use std::{mem, ptr::NonNull};

/// Size in bytes of the field stored right before every aligned pointer.
pub const OFFSET_FIELD_SIZE: usize = mem::size_of::<u16>();

/// Typed view over the 2 bytes preceding an aligned pointer.
///
/// ```text
///   block                      field   aligned pointer
///     │                          │       │
///     ▼                          ▼       ▼
///     ┌──────────────────────────┬───────┬──────────────────────┐
///     │         padding          │  u16  │      user data       │
///     └──────────────────────────┴───────┴──────────────────────┘
///     ◄──────────── offset = aligned - block ─────────►
/// ```
pub(crate) struct OffsetField {
  field: NonNull<u16>,
}

impl OffsetField {
  /// # Safety
  ///
  /// The 2 bytes at `ptr - 2` must lie inside a live block owned by the
  /// caller, and `ptr` must be at least 2-byte aligned.
  pub(crate) unsafe fn preceding(ptr: NonNull<u8>) -> Self {
    let field = unsafe { ptr.sub(OFFSET_FIELD_SIZE) }.cast::<u16>();

    Self { field }
  }

  pub(crate) fn write(
    &self,
    offset: u16,
  ) {
    unsafe { self.field.write(offset) }
  }

  pub(crate) fn read(&self) -> u16 {
    unsafe { self.field.read() }
  }
}
