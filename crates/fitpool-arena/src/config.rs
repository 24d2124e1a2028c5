//! Pool configuration parameters.

use crate::error::PoolError;

/// Configuration for a [`FirstFitPool`](crate::FirstFitPool).
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Size of the backing pool in bytes. Must be non-zero.
    pub total_size: usize,

    /// Number of allocation records to reserve up front.
    ///
    /// Default: 64. The record set still grows past this on demand; the
    /// hint only avoids early reallocations for workloads with a known
    /// live-allocation count.
    pub record_capacity: usize,
}

impl PoolConfig {
    /// Default number of records reserved at init.
    pub const DEFAULT_RECORD_CAPACITY: usize = 64;

    /// Create a config for a pool of `total_size` bytes.
    ///
    /// Uses default values for all other parameters.
    pub fn new(total_size: usize) -> Self {
        Self {
            total_size,
            record_capacity: Self::DEFAULT_RECORD_CAPACITY,
        }
    }

    /// Override the record capacity hint.
    pub fn with_record_capacity(mut self, record_capacity: usize) -> Self {
        self.record_capacity = record_capacity;
        self
    }

    /// Check structural invariants.
    ///
    /// A zero-byte pool could never satisfy any request and would make
    /// utilization undefined, so it is rejected as [`PoolError::InvalidSize`].
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.total_size == 0 {
            return Err(PoolError::InvalidSize { requested: 0 });
        }
        Ok(())
    }
}
