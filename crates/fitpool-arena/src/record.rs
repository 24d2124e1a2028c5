//! Allocation records and the address-ordered record set.
//!
//! [`RecordSet`] keeps live allocations sorted by start offset with no two
//! records overlapping. The gap walk in [`crate::gaps`] depends on that
//! ordering to find free space without a separate free list.

use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use crate::error::PoolError;
use crate::offset::Offset;

/// One live allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AllocationRecord {
    /// Position of the first byte within the pool.
    pub start: Offset,
    /// Length in bytes. Always at least 1.
    pub size: usize,
}

impl AllocationRecord {
    /// Create a new record.
    pub fn new(start: Offset, size: usize) -> Self {
        Self { start, size }
    }

    /// One past the last byte covered by this record.
    pub fn end(&self) -> usize {
        self.start.0 + self.size
    }

    /// Whether this record shares at least one byte with `other`.
    pub fn overlaps(&self, other: &AllocationRecord) -> bool {
        self.start.0 < other.end() && other.start.0 < self.end()
    }
}

impl fmt::Display for AllocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}) {} bytes", self.start.0, self.end(), self.size)
    }
}

/// Address-ordered set of live records.
///
/// Invariant: for every adjacent pair `r[i].end() <= r[i + 1].start`.
#[derive(Debug, Default)]
pub(crate) struct RecordSet {
    records: Vec<AllocationRecord>,
}

impl RecordSet {
    /// Create an empty set with room for `capacity` records.
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self, PoolError> {
        let mut records = Vec::new();
        records
            .try_reserve_exact(capacity)
            .map_err(|_| PoolError::OutOfMemory {
                requested: capacity.saturating_mul(std::mem::size_of::<AllocationRecord>()),
                largest_free: 0,
            })?;
        Ok(Self { records })
    }

    /// Insert `record` at `index`, which must be its sorted position.
    ///
    /// Fails without mutating the set if record metadata cannot be grown.
    pub(crate) fn insert_at(
        &mut self,
        index: usize,
        record: AllocationRecord,
    ) -> Result<(), PoolError> {
        debug_assert!(index == 0 || self.records[index - 1].end() <= record.start.0);
        debug_assert!(index == self.records.len() || record.end() <= self.records[index].start.0);
        self.records
            .try_reserve(1)
            .map_err(|_| PoolError::OutOfMemory {
                requested: record.size,
                largest_free: 0,
            })?;
        self.records.insert(index, record);
        Ok(())
    }

    /// Index of the record starting exactly at `offset`.
    pub(crate) fn position(&self, offset: Offset) -> Option<usize> {
        self.records
            .binary_search_by_key(&offset, |r| r.start)
            .ok()
    }

    /// The record starting exactly at `offset`.
    pub(crate) fn get(&self, offset: Offset) -> Option<&AllocationRecord> {
        self.position(offset).map(|idx| &self.records[idx])
    }

    /// Remove and return the record starting exactly at `offset`.
    pub(crate) fn remove(&mut self, offset: Offset) -> Option<AllocationRecord> {
        let idx = self.position(offset)?;
        Some(self.records.remove(idx))
    }

    /// All live records in address order.
    pub(crate) fn as_slice(&self) -> &[AllocationRecord] {
        &self.records
    }

    /// Number of live records.
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Sum of all live record sizes.
    pub(crate) fn allocated_bytes(&self) -> usize {
        self.records.iter().map(|r| r.size).sum()
    }

    /// Drop every record, returning how many were live.
    pub(crate) fn clear(&mut self) -> usize {
        let released = self.records.len();
        self.records.clear();
        released
    }
}

/// Snapshot iterator over live allocations in address order.
///
/// Returned by [`FirstFitPool::enumerate`](crate::FirstFitPool::enumerate).
/// Borrows the pool, so the set cannot change while it is being walked.
#[derive(Clone, Debug)]
pub struct Allocations<'a> {
    inner: slice::Iter<'a, AllocationRecord>,
}

impl<'a> Allocations<'a> {
    pub(crate) fn new(records: &'a [AllocationRecord]) -> Self {
        Self {
            inner: records.iter(),
        }
    }
}

impl Iterator for Allocations<'_> {
    type Item = AllocationRecord;

    fn next(&mut self) -> Option<AllocationRecord> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Allocations<'_> {}

impl FusedIterator for Allocations<'_> {}
