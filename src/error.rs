use thiserror::Error;

/// Reasons an aligned allocation request can be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocationError {
  /// Zero-sized requests are not served.
  #[error("invalid allocation size: 0")]
  InvalidSize,

  /// The alignment is zero, not a power of two, or too large for the
  /// 2-byte offset field to describe.
  #[error("unsupported alignment: {alignment}")]
  InvalidAlignment { alignment: usize },

  /// The backing allocator could not provide a padded block of `size` bytes.
  #[error("out of memory: backing allocator refused {size} bytes")]
  OutOfMemory { size: usize },
}

pub type AllocResult<T> = Result<T, AllocationError>;
