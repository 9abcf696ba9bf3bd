use std::{alloc::Layout, ptr::NonNull};

use log::{debug, trace};

use crate::{
  align::{is_aligned, round_up_to_alignment},
  backing::{BackingAllocator, LibcAllocator},
  error::{AllocResult, AllocationError},
  offset::{OFFSET_FIELD_SIZE, OffsetField},
};

/// Requested alignments below this are promoted to it.
pub const MIN_ALIGNMENT: usize = 4;

/// Largest accepted alignment. An already aligned block is skipped forward
/// by a full alignment, so the offset field must be able to hold it.
pub const MAX_ALIGNMENT: usize = 1 << 15;

/// Serves power-of-two aligned allocations on top of an allocator that
/// knows nothing about alignment.
///
/// Each allocation pads the request, carves an aligned pointer out of the
/// padded block and stores the distance back to the block start in the
/// 2 bytes just before the pointer:
///
/// ```text
///   Block already aligned (always skip forward):
///
///   block                                ptr = block + alignment
///   ┌────────────────────────────┬───────┬──────────────────────────┐
///   │           unused           │ field │        size bytes        │
///   └────────────────────────────┴───────┴──────────────────────────┘
///
///   Block not aligned (round up):
///
///   block          ptr = round_up(block, alignment)
///   ┌──────┬───────┬──────────────────────────┬─────────────────────┐
///   │      │ field │        size bytes        │       unused        │
///   └──────┴───────┴──────────────────────────┴─────────────────────┘
/// ```
///
/// The allocator owns every padded block it requests. Callers only ever see
/// the derived aligned pointer, which must go back through
/// [`free_aligned`](Self::free_aligned) to be released.
///
/// There is no internal locking. Sharing one allocator between threads is
/// only sound when the backing allocator is itself thread-safe, and never
/// for operations on the same pointer.
#[derive(Debug, Default)]
pub struct AlignedAllocator<B: BackingAllocator = LibcAllocator> {
  backing: B,
}

impl AlignedAllocator<LibcAllocator> {
  /// Aligned allocator over `malloc` / `free`.
  pub const fn new() -> Self {
    Self {
      backing: LibcAllocator,
    }
  }
}

impl<B: BackingAllocator> AlignedAllocator<B> {
  pub const fn with_backing(backing: B) -> Self {
    Self { backing }
  }

  pub fn backing(&self) -> &B {
    &self.backing
  }

  /// Allocates `size` bytes aligned to `alignment`.
  ///
  /// Alignments below [`MIN_ALIGNMENT`] are promoted to it. The backing
  /// allocator is called exactly once, unless the request is rejected
  /// before reaching it.
  ///
  /// # Errors
  ///
  /// - [`AllocationError::InvalidSize`] if `size` is zero.
  /// - [`AllocationError::InvalidAlignment`] if `alignment` is zero, not a
  ///   power of two, or above [`MAX_ALIGNMENT`].
  /// - [`AllocationError::OutOfMemory`] if the padded block cannot be
  ///   obtained.
  pub fn allocate_aligned(
    &self,
    size: usize,
    alignment: usize,
  ) -> AllocResult<NonNull<u8>> {
    match self.carve(size, alignment) {
      Ok((block, ptr)) => {
        trace!(
          "allocated {} bytes aligned to {}: block = {:?}, ptr = {:?}, offset = {}",
          size,
          alignment,
          block,
          ptr,
          ptr.as_ptr() as usize - block.as_ptr() as usize
        );

        Ok(ptr)
      }
      Err(error) => {
        debug!("rejected aligned allocation of {} bytes aligned to {}: {}", size, alignment, error);

        Err(error)
      }
    }
  }

  /// Same as [`allocate_aligned`](Self::allocate_aligned) with the size and
  /// alignment taken from `layout`.
  pub fn allocate_layout(
    &self,
    layout: Layout,
  ) -> AllocResult<NonNull<u8>> {
    self.allocate_aligned(layout.size(), layout.align())
  }

  /// Releases a pointer obtained from this allocator.
  ///
  /// # Safety
  ///
  /// `ptr` must have been returned by [`allocate_aligned`](Self::allocate_aligned)
  /// (or [`allocate_layout`](Self::allocate_layout)) on this allocator and
  /// must not have been freed already. Double frees, foreign pointers and a
  /// clobbered offset field are not detected.
  pub unsafe fn free_aligned(
    &self,
    ptr: NonNull<u8>,
  ) {
    let block = unsafe { self.release(ptr) };

    trace!("freed ptr = {:?}, block = {:?}", ptr, block);
  }

  /// Core of the allocation path, without logging. Returns the backing
  /// block together with the aligned pointer carved out of it.
  pub(crate) fn carve(
    &self,
    size: usize,
    alignment: usize,
  ) -> AllocResult<(NonNull<u8>, NonNull<u8>)> {
    if size == 0 {
      return Err(AllocationError::InvalidSize);
    }

    if !alignment.is_power_of_two() || alignment > MAX_ALIGNMENT {
      return Err(AllocationError::InvalidAlignment { alignment });
    }

    let alignment = alignment.max(MIN_ALIGNMENT);
    let padding = alignment + OFFSET_FIELD_SIZE;

    let block = size
      .checked_add(padding)
      .and_then(|padded_size| self.backing.allocate_unaligned(padded_size))
      .ok_or(AllocationError::OutOfMemory {
        size: size.saturating_add(padding),
      })?;

    let address = block.as_ptr() as usize;

    let mut offset = if is_aligned(address, alignment) {
      alignment
    } else {
      round_up_to_alignment(address, alignment) - address
    };

    // A block one byte short of a boundary leaves no room for the field.
    if offset < OFFSET_FIELD_SIZE {
      offset += alignment;
    }

    debug_assert!(offset >= OFFSET_FIELD_SIZE && offset <= u16::MAX as usize);

    unsafe {
      let ptr = block.add(offset);

      OffsetField::preceding(ptr).write(offset as u16);

      Ok((block, ptr))
    }
  }

  /// Core of the free path, without logging. Returns the recovered block.
  ///
  /// # Safety
  ///
  /// Same contract as [`free_aligned`](Self::free_aligned).
  pub(crate) unsafe fn release(
    &self,
    ptr: NonNull<u8>,
  ) -> NonNull<u8> {
    unsafe {
      let offset = OffsetField::preceding(ptr).read();
      let block = ptr.sub(offset as usize);

      self.backing.free_unaligned(block);

      block
    }
  }
}
