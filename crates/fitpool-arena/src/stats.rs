//! Usage and fragmentation statistics.

use std::fmt;

use crate::gaps::Gaps;
use crate::record::AllocationRecord;

/// Point-in-time usage figures for one pool.
///
/// Produced by [`FirstFitPool::stats`](crate::FirstFitPool::stats) in a single
/// pass over the record set, using the same gap walk as allocation. The
/// report is a plain value; it does not borrow the pool.
#[derive(Clone, Debug, PartialEq)]
pub struct UsageReport {
    /// Pool size in bytes.
    pub total_size: usize,
    /// Number of live allocations.
    pub allocation_count: usize,
    /// Sum of all live allocation sizes.
    pub allocated_bytes: usize,
    /// `total_size - allocated_bytes`.
    pub free_bytes: usize,
    /// Size of the largest single gap.
    pub largest_free_block: usize,
    /// Number of distinct non-empty gaps.
    pub free_fragment_count: usize,
    /// `allocated_bytes * 100 / total_size`.
    pub utilization_percent: f64,
}

impl UsageReport {
    pub(crate) fn collect(records: &[AllocationRecord], total_size: usize) -> Self {
        let allocated_bytes: usize = records.iter().map(|r| r.size).sum();

        let mut largest_free_block = 0;
        let mut free_fragment_count = 0;
        for gap in Gaps::new(records, total_size) {
            free_fragment_count += 1;
            largest_free_block = largest_free_block.max(gap.len);
        }

        let utilization_percent = if total_size == 0 {
            0.0
        } else {
            allocated_bytes as f64 * 100.0 / total_size as f64
        };

        Self {
            total_size,
            allocation_count: records.len(),
            allocated_bytes,
            free_bytes: total_size - allocated_bytes,
            largest_free_block,
            free_fragment_count,
            utilization_percent,
        }
    }

    /// Share of free space unusable by a single request of maximal size.
    ///
    /// `1 - largest_free_block / free_bytes`, in `[0.0, 1.0]`. Zero when the
    /// pool is full or all free space is one contiguous gap.
    pub fn fragmentation_ratio(&self) -> f64 {
        if self.free_bytes == 0 {
            return 0.0;
        }
        let largest = self.largest_free_block.min(self.free_bytes) as f64;
        (1.0 - largest / self.free_bytes as f64).clamp(0.0, 1.0)
    }

    /// Whether free space exceeds the largest gap, so some request no larger
    /// than `free_bytes` would still fail.
    pub fn is_fragmented(&self) -> bool {
        self.free_fragment_count > 1
    }
}

impl fmt::Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "allocations:        {}", self.allocation_count)?;
        writeln!(f, "allocated bytes:    {}", self.allocated_bytes)?;
        writeln!(f, "free bytes:         {}", self.free_bytes)?;
        writeln!(f, "largest free block: {}", self.largest_free_block)?;
        writeln!(f, "free fragments:     {}", self.free_fragment_count)?;
        write!(f, "utilization:        {:.2}%", self.utilization_percent)
    }
}
