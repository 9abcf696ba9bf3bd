//! Backing allocators that record what they hand out, for tests.

use std::{
  alloc::{self, Layout},
  cell::{Cell, RefCell},
  collections::HashMap,
  ptr::NonNull,
};

use crate::backing::BackingAllocator;

/// Every staged block sits `misalignment` bytes past an address aligned to
/// this, which is larger than any alignment the allocator accepts.
const STAGE_ALIGNMENT: usize = 1 << 16;

/// Hands out blocks at a chosen distance from a large alignment boundary,
/// so a test controls which branch of the aligning step is taken.
pub(crate) struct StagedAllocator {
  misalignment: usize,
  live: RefCell<HashMap<usize, (NonNull<u8>, Layout)>>,
  requests: RefCell<Vec<(usize, usize)>>,
  releases: RefCell<Vec<usize>>,
}

impl StagedAllocator {
  pub(crate) fn new(misalignment: usize) -> Self {
    Self {
      misalignment,
      live: RefCell::new(HashMap::new()),
      requests: RefCell::new(Vec::new()),
      releases: RefCell::new(Vec::new()),
    }
  }

  /// `(block address, requested size)` of the most recent allocation.
  pub(crate) fn last_request(&self) -> (usize, usize) {
    *self.requests.borrow().last().expect("no block was requested")
  }

  pub(crate) fn request_count(&self) -> usize {
    self.requests.borrow().len()
  }

  pub(crate) fn last_release(&self) -> usize {
    *self.releases.borrow().last().expect("no block was released")
  }

  pub(crate) fn live_blocks(&self) -> usize {
    self.live.borrow().len()
  }
}

impl BackingAllocator for StagedAllocator {
  fn allocate_unaligned(
    &self,
    size: usize,
  ) -> Option<NonNull<u8>> {
    let layout = Layout::from_size_align(size.checked_add(self.misalignment)?, STAGE_ALIGNMENT).ok()?;
    let base = NonNull::new(unsafe { alloc::alloc(layout) })?;
    let block = unsafe { base.add(self.misalignment) };
    let address = block.as_ptr() as usize;

    self.live.borrow_mut().insert(address, (base, layout));
    self.requests.borrow_mut().push((address, size));

    Some(block)
  }

  unsafe fn free_unaligned(
    &self,
    block: NonNull<u8>,
  ) {
    let address = block.as_ptr() as usize;
    let (base, layout) = self
      .live
      .borrow_mut()
      .remove(&address)
      .expect("block was not handed out by this allocator");

    self.releases.borrow_mut().push(address);

    unsafe { alloc::dealloc(base.as_ptr(), layout) }
  }
}

impl Drop for StagedAllocator {
  fn drop(&mut self) {
    for (_, (base, layout)) in self.live.get_mut().drain() {
      unsafe { alloc::dealloc(base.as_ptr(), layout) }
    }
  }
}

/// Wraps another backing allocator and remembers the last block it saw in
/// each direction.
pub(crate) struct Recording<B> {
  inner: B,
  allocated: Cell<Option<(usize, usize)>>,
  freed: Cell<Option<usize>>,
}

impl<B> Recording<B> {
  pub(crate) fn new(inner: B) -> Self {
    Self {
      inner,
      allocated: Cell::new(None),
      freed: Cell::new(None),
    }
  }

  pub(crate) fn allocated(&self) -> Option<(usize, usize)> {
    self.allocated.get()
  }

  pub(crate) fn freed(&self) -> Option<usize> {
    self.freed.get()
  }
}

impl<B: BackingAllocator> BackingAllocator for Recording<B> {
  fn allocate_unaligned(
    &self,
    size: usize,
  ) -> Option<NonNull<u8>> {
    let block = self.inner.allocate_unaligned(size)?;

    self.allocated.set(Some((block.as_ptr() as usize, size)));

    Some(block)
  }

  unsafe fn free_unaligned(
    &self,
    block: NonNull<u8>,
  ) {
    self.freed.set(Some(block.as_ptr() as usize));

    unsafe { self.inner.free_unaligned(block) }
  }
}

/// A backing allocator with nothing left to give.
pub(crate) struct ExhaustedAllocator;

impl BackingAllocator for ExhaustedAllocator {
  fn allocate_unaligned(
    &self,
    _size: usize,
  ) -> Option<NonNull<u8>> {
    None
  }

  unsafe fn free_unaligned(
    &self,
    _block: NonNull<u8>,
  ) {
    unreachable!("an exhausted allocator never hands out blocks")
  }
}
