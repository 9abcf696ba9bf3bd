use std::{
  alloc::{GlobalAlloc, Layout},
  ptr::{self, NonNull},
};

use crate::{aligned::AlignedAllocator, backing::BackingAllocator};

/// Lets an [`AlignedAllocator`] stand in for the process allocator.
///
/// ```rust,ignore
/// use raligned::AlignedAllocator;
///
/// #[global_allocator]
/// static GLOBAL: AlignedAllocator = AlignedAllocator::new();
/// ```
///
/// Nothing on this path logs, so a logger that allocates cannot recurse
/// into it.
unsafe impl<B: BackingAllocator> GlobalAlloc for AlignedAllocator<B> {
  unsafe fn alloc(
    &self,
    layout: Layout,
  ) -> *mut u8 {
    match self.carve(layout.size(), layout.align()) {
      Ok((_, ptr)) => ptr.as_ptr(),
      Err(_) => ptr::null_mut(),
    }
  }

  unsafe fn dealloc(
    &self,
    ptr: *mut u8,
    _layout: Layout,
  ) {
    if let Some(ptr) = NonNull::new(ptr) {
      unsafe { self.release(ptr) };
    }
  }
}
