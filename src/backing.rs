use std::ptr::NonNull;

use libc::{c_void, free, malloc};

/// A general-purpose allocator with no alignment guarantee beyond the
/// platform default.
///
/// Blocks are identified only by their start address; the backing
/// allocator is the one that remembers how big each block is.
pub trait BackingAllocator {
  /// Returns a block of at least `size` bytes, or `None` when exhausted.
  fn allocate_unaligned(
    &self,
    size: usize,
  ) -> Option<NonNull<u8>>;

  /// Releases a block.
  ///
  /// # Safety
  ///
  /// `block` must have been returned by `allocate_unaligned` on this
  /// allocator and must not have been released already.
  unsafe fn free_unaligned(
    &self,
    block: NonNull<u8>,
  );
}

/// Backing allocator over the C heap (`malloc` / `free`).
#[derive(Debug, Default, Clone, Copy)]
pub struct LibcAllocator;

impl BackingAllocator for LibcAllocator {
  fn allocate_unaligned(
    &self,
    size: usize,
  ) -> Option<NonNull<u8>> {
    let address = unsafe { malloc(size) };

    NonNull::new(address as *mut u8)
  }

  unsafe fn free_unaligned(
    &self,
    block: NonNull<u8>,
  ) {
    unsafe { free(block.as_ptr() as *mut c_void) }
  }
}

impl<B: BackingAllocator + ?Sized> BackingAllocator for &B {
  fn allocate_unaligned(
    &self,
    size: usize,
  ) -> Option<NonNull<u8>> {
    (**self).allocate_unaligned(size)
  }

  unsafe fn free_unaligned(
    &self,
    block: NonNull<u8>,
  ) {
    unsafe { (**self).free_unaligned(block) }
  }
}
