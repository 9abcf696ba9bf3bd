//! # raligned - Aligned Allocations Over Any Allocator
//!
//! This crate turns a general-purpose allocator that only guarantees the
//! platform's default alignment into one that serves **power-of-two
//! alignments** up to 32 KiB, with just 2 bytes of bookkeeping per
//! allocation and no side table.
//!
//! ## Overview
//!
//! Every request is padded by the alignment plus the size of a small offset
//! field. Somewhere inside the padded block there is an aligned address with
//! room behind it for the field:
//!
//! ```text
//!   Aligned Allocation:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │              PADDED BLOCK (size + alignment + 2 bytes)               │
//!   │                                                                      │
//!   │   ┌──────────────┬────────┬───────────────────────────┬───────────┐  │
//!   │   │   padding    │ offset │        user data          │  unused   │  │
//!   │   │              │  u16   │                           │           │  │
//!   │   └──────────────┴────────┴───────────────────────────┴───────────┘  │
//!   │   ▲                       ▲                                          │
//!   │   │                       │                                          │
//!   │ block                 aligned ptr  (ptr % alignment == 0)            │
//!   │                                                                      │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   offset = ptr - block, so free recovers block = ptr - offset.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   raligned
//!   ├── align      - Alignment helpers (is_aligned, round_up_to_alignment, align_to!)
//!   ├── backing    - BackingAllocator trait and the libc malloc/free backing
//!   ├── offset     - Typed view over the 2-byte offset field (internal)
//!   ├── aligned    - AlignedAllocator implementation
//!   ├── global     - GlobalAlloc adapter
//!   └── error      - AllocationError
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use raligned::AlignedAllocator;
//!
//! let allocator = AlignedAllocator::new();
//!
//! let ptr = allocator.allocate_aligned(100, 64).unwrap();
//! assert_eq!(ptr.as_ptr() as usize % 64, 0);
//!
//! unsafe {
//!     ptr.as_ptr().write_bytes(0, 100);
//!     allocator.free_aligned(ptr);
//! }
//! ```
//!
//! ## How It Works
//!
//! Alignments below 4 are promoted to 4. When the block is not aligned, the
//! pointer is rounded up to the next boundary. When it already is, the
//! pointer is moved a full alignment forward so the offset field never
//! falls before the block:
//!
//! ```text
//!   block % 16 == 7                    block % 16 == 0
//!
//!   0x1007          0x1010             0x2000                    0x2010
//!   ┌──────┬───────┬─────────┐         ┌──────────────┬─────────┬─────────┐
//!   │ pad  │ 9u16  │  data   │         │     pad      │  16u16  │  data   │
//!   └──────┴───────┴─────────┘         └──────────────┴─────────┴─────────┘
//! ```
//!
//! ## Limitations
//!
//! - **No locking**: safe to share only if the backing allocator is
//! - **No resizing**: there is no realloc-style grow or shrink
//! - **No introspection**: the requested size is not recorded
//! - **Trusting free**: double frees or foreign pointers are not detected
//!
//! ## Safety
//!
//! Allocation is safe and reports failures as [`AllocationError`]. Freeing
//! is `unsafe`: the pointer must come from the same allocator and must not
//! have been freed before.

pub mod align;
mod aligned;
mod backing;
mod error;
mod global;
mod offset;

#[cfg(test)]
mod testing;

pub use aligned::{AlignedAllocator, MAX_ALIGNMENT, MIN_ALIGNMENT};
pub use backing::{BackingAllocator, LibcAllocator};
pub use error::{AllocResult, AllocationError};
pub use offset::OFFSET_FIELD_SIZE;
