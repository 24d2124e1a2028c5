//! Backing storage for a pool.
//!
//! A [`Pool`] is one contiguous `Box<[u8]>` reserved at init. It knows
//! nothing about allocations; the engine resolves offsets against it.

use crate::error::PoolError;

/// Fixed-size contiguous byte region.
///
/// Reserved fallibly so that an oversized request surfaces as
/// [`PoolError::OutOfMemory`] instead of aborting the process. Contents are
/// zero-filled once at reservation and never touched by the allocator again.
pub(crate) struct Pool {
    data: Box<[u8]>,
}

impl Pool {
    /// Reserve `size` bytes.
    pub(crate) fn reserve(size: usize) -> Result<Self, PoolError> {
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| PoolError::OutOfMemory {
                requested: size,
                largest_free: 0,
            })?;
        data.resize(size, 0);
        Ok(Self {
            data: data.into_boxed_slice(),
        })
    }

    /// Shared slice at the given offset and length.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the pool.
    pub(crate) fn slice(&self, offset: usize, len: usize) -> &[u8] {
        &self.data[offset..offset + len]
    }

    /// Mutable slice at the given offset and length.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the pool.
    pub(crate) fn slice_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.data[offset..offset + len]
    }

    /// Total capacity in bytes.
    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }
}
