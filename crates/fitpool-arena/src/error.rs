//! Pool error types.

use thiserror::Error;

/// Errors returned by [`FirstFitPool`](crate::FirstFitPool) operations.
///
/// Both variants are recoverable: the caller can retry with a smaller
/// request or after freeing other allocations. Freeing an unknown offset
/// is not an error and has no variant here.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No gap is large enough, or backing storage could not be reserved.
    #[error("out of memory: requested {requested} bytes, largest free block {largest_free} bytes")]
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Largest contiguous free range at the time of the request.
        largest_free: usize,
    },
    /// A zero-byte allocation or a zero-byte pool was requested.
    #[error("invalid size: {requested} bytes")]
    InvalidSize {
        /// The rejected size.
        requested: usize,
    },
}
