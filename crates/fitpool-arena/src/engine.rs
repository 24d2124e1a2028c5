//! The first-fit allocator engine.
//!
//! [`FirstFitPool`] ties the backing [`Pool`] to the ordered [`RecordSet`].
//! The lifecycle is:
//! 1. `init()` / `with_config()` — reserve the pool, start with no records
//! 2. `alloc()` / `free()` — mutate the record set
//! 3. `stats()` / `enumerate()` — read-only queries, valid at any time
//! 4. `cleanup()` — release records then the pool (also done by `Drop`)

use tracing::{debug, trace};

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::gaps::{Gap, Gaps};
use crate::offset::Offset;
use crate::pool::Pool;
use crate::record::{AllocationRecord, Allocations, RecordSet};
use crate::stats::UsageReport;

/// What [`FirstFitPool::cleanup`] released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CleanupSummary {
    /// Records that were still live at teardown.
    pub released_records: usize,
    /// Bytes those records covered.
    pub released_bytes: usize,
    /// Size of the pool that was returned.
    pub pool_bytes: usize,
}

/// Fixed-size byte pool with first-fit placement.
///
/// Each instance is independent; there is no process-wide state. Mutation
/// requires `&mut self`, so one caller at a time is enforced by the borrow
/// checker. Wrap in a mutex to share across threads.
///
/// # Example
///
/// ```
/// use fitpool_arena::{FirstFitPool, Offset};
///
/// let mut pool = FirstFitPool::init(100).unwrap();
/// assert_eq!(pool.alloc(30).unwrap(), Offset(0));
/// assert_eq!(pool.alloc(30).unwrap(), Offset(30));
/// pool.free(Offset(0));
/// assert_eq!(pool.alloc(10).unwrap(), Offset(0));
/// assert_eq!(pool.stats().allocated_bytes, 40);
/// ```
pub struct FirstFitPool {
    pool: Pool,
    records: RecordSet,
    config: PoolConfig,
}

impl FirstFitPool {
    /// Create a pool of `total_size` bytes with default settings.
    ///
    /// Fails with [`PoolError::InvalidSize`] for a zero-byte pool and with
    /// [`PoolError::OutOfMemory`] if the backing storage cannot be reserved.
    pub fn init(total_size: usize) -> Result<Self, PoolError> {
        Self::with_config(PoolConfig::new(total_size))
    }

    /// Create a pool from an explicit configuration.
    ///
    /// Either everything is reserved or nothing is: a failure leaves no
    /// partially constructed instance behind.
    pub fn with_config(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let records = RecordSet::with_capacity(config.record_capacity)?;
        let pool = Pool::reserve(config.total_size)?;
        debug!(total_size = config.total_size, "pool initialised");
        Ok(Self {
            pool,
            records,
            config,
        })
    }

    /// Allocate `requested_size` bytes at the lowest-offset gap that fits.
    ///
    /// Returns the offset of the new allocation. The pool's bytes are not
    /// touched. On failure the record set is unchanged.
    pub fn alloc(&mut self, requested_size: usize) -> Result<Offset, PoolError> {
        if requested_size == 0 {
            debug!("rejected zero-size allocation");
            return Err(PoolError::InvalidSize { requested: 0 });
        }

        let gap = match self.first_fit(requested_size) {
            Some(gap) => gap,
            None => {
                let largest_free = self.gaps().map(|g| g.len).max().unwrap_or(0);
                debug!(
                    requested = requested_size,
                    largest_free, "no gap large enough"
                );
                return Err(PoolError::OutOfMemory {
                    requested: requested_size,
                    largest_free,
                });
            }
        };

        let record = AllocationRecord::new(gap.start, requested_size);
        self.records.insert_at(gap.insert_index, record)?;
        trace!(offset = gap.start.0, size = requested_size, gap = gap.len, "alloc");
        Ok(gap.start)
    }

    /// Release the allocation starting at `offset`.
    ///
    /// Unknown offsets (never allocated, already freed, or pointing inside
    /// an allocation rather than at its start) are ignored. Returns the
    /// released record, if any.
    pub fn free(&mut self, offset: Offset) -> Option<AllocationRecord> {
        match self.records.remove(offset) {
            Some(record) => {
                trace!(offset = offset.0, size = record.size, "free");
                Some(record)
            }
            None => {
                trace!(offset = offset.0, "free of untracked offset ignored");
                None
            }
        }
    }

    /// Usage and fragmentation figures for the current state.
    pub fn stats(&self) -> UsageReport {
        UsageReport::collect(self.records.as_slice(), self.total_size())
    }

    /// Live allocations in address order.
    pub fn enumerate(&self) -> Allocations<'_> {
        Allocations::new(self.records.as_slice())
    }

    /// Free ranges in address order.
    pub fn gaps(&self) -> Gaps<'_> {
        Gaps::new(self.records.as_slice(), self.total_size())
    }

    /// Release every record, then the pool.
    ///
    /// Consumes the engine, so a second cleanup cannot be expressed.
    /// Dropping the engine releases the same resources without a summary.
    pub fn cleanup(mut self) -> CleanupSummary {
        let released_bytes = self.records.allocated_bytes();
        let released_records = self.records.clear();
        let summary = CleanupSummary {
            released_records,
            released_bytes,
            pool_bytes: self.pool.capacity(),
        };
        debug!(
            released_records,
            released_bytes,
            pool_bytes = summary.pool_bytes,
            "pool released"
        );
        summary
    }

    /// Bytes of the live allocation starting at `offset`.
    pub fn bytes(&self, offset: Offset) -> Option<&[u8]> {
        let record = *self.records.get(offset)?;
        Some(self.pool.slice(record.start.0, record.size))
    }

    /// Mutable bytes of the live allocation starting at `offset`.
    pub fn bytes_mut(&mut self, offset: Offset) -> Option<&mut [u8]> {
        let record = *self.records.get(offset)?;
        Some(self.pool.slice_mut(record.start.0, record.size))
    }

    /// The live record starting at `offset`.
    pub fn record(&self, offset: Offset) -> Option<AllocationRecord> {
        self.records.get(offset).copied()
    }

    /// Whether an allocation starts at `offset`.
    pub fn contains(&self, offset: Offset) -> bool {
        self.records.position(offset).is_some()
    }

    /// Pool size in bytes.
    pub fn total_size(&self) -> usize {
        self.pool.capacity()
    }

    /// Number of live allocations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no allocations are live.
    pub fn is_empty(&self) -> bool {
        self.records.len() == 0
    }

    /// The configuration this pool was created with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    fn first_fit(&self, size: usize) -> Option<Gap> {
        self.gaps().find(|gap| gap.fits(size))
    }
}

impl std::fmt::Debug for FirstFitPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstFitPool")
            .field("total_size", &self.total_size())
            .field("records", &self.records.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(pool: &FirstFitPool) -> Vec<(usize, usize)> {
        pool.enumerate().map(|r| (r.start.0, r.size)).collect()
    }

    #[test]
    fn init_zero_is_invalid_size() {
        let result = FirstFitPool::init(0);
        assert!(matches!(result, Err(PoolError::InvalidSize { requested: 0 })));
    }

    #[test]
    fn init_unreservable_is_out_of_memory() {
        let result = FirstFitPool::init(usize::MAX);
        assert!(matches!(result, Err(PoolError::OutOfMemory { .. })));
    }

    #[test]
    fn first_alloc_lands_at_zero() {
        let mut pool = FirstFitPool::init(64).unwrap();
        assert_eq!(pool.alloc(8).unwrap(), Offset(0));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn sequential_allocs_are_packed() {
        let mut pool = FirstFitPool::init(100).unwrap();
        assert_eq!(pool.alloc(30).unwrap(), Offset(0));
        assert_eq!(pool.alloc(30).unwrap(), Offset(30));
        assert_eq!(pool.alloc(30).unwrap(), Offset(60));
        assert_eq!(offsets(&pool), vec![(0, 30), (30, 30), (60, 30)]);
    }

    #[test]
    fn zero_size_alloc_leaves_state_unchanged() {
        let mut pool = FirstFitPool::init(50).unwrap();
        pool.alloc(10).unwrap();
        let before = pool.stats();
        assert_eq!(pool.alloc(0), Err(PoolError::InvalidSize { requested: 0 }));
        assert_eq!(pool.stats(), before);
    }

    #[test]
    fn oversize_alloc_reports_largest_free() {
        let mut pool = FirstFitPool::init(100).unwrap();
        pool.alloc(60).unwrap();
        assert_eq!(
            pool.alloc(50),
            Err(PoolError::OutOfMemory {
                requested: 50,
                largest_free: 40,
            })
        );
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn freed_hole_is_reused_first() {
        let mut pool = FirstFitPool::init(100).unwrap();
        pool.alloc(30).unwrap();
        pool.alloc(30).unwrap();
        pool.alloc(30).unwrap();
        pool.free(Offset(30));
        assert_eq!(pool.alloc(20).unwrap(), Offset(30));
        assert_eq!(pool.alloc(10).unwrap(), Offset(50));
        assert_eq!(pool.alloc(10).unwrap(), Offset(90));
        assert_eq!(pool.stats().free_bytes, 0);
    }

    #[test]
    fn allocation_before_existing_head_is_ordered() {
        let mut pool = FirstFitPool::init(40).unwrap();
        pool.alloc(10).unwrap();
        pool.alloc(10).unwrap();
        pool.free(Offset(0));
        assert_eq!(pool.alloc(5).unwrap(), Offset(0));
        assert_eq!(offsets(&pool), vec![(0, 5), (10, 10)]);
    }

    #[test]
    fn neighbouring_frees_merge_into_one_gap() {
        let mut pool = FirstFitPool::init(30).unwrap();
        pool.alloc(10).unwrap();
        pool.alloc(10).unwrap();
        pool.alloc(10).unwrap();
        pool.free(Offset(0));
        pool.free(Offset(10));
        assert_eq!(pool.alloc(20).unwrap(), Offset(0));
    }

    #[test]
    fn free_unknown_offset_is_ignored() {
        let mut pool = FirstFitPool::init(50).unwrap();
        pool.alloc(10).unwrap();
        let before = pool.stats();
        assert!(pool.free(Offset(9999)).is_none());
        assert!(pool.free(Offset(5)).is_none());
        assert_eq!(pool.stats(), before);
    }

    #[test]
    fn double_free_is_ignored() {
        let mut pool = FirstFitPool::init(50).unwrap();
        let off = pool.alloc(10).unwrap();
        assert_eq!(pool.free(off), Some(AllocationRecord::new(off, 10)));
        assert!(pool.free(off).is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn bytes_are_scoped_to_allocation() {
        let mut pool = FirstFitPool::init(32).unwrap();
        let a = pool.alloc(4).unwrap();
        let b = pool.alloc(4).unwrap();
        pool.bytes_mut(a).unwrap().copy_from_slice(b"abcd");
        pool.bytes_mut(b).unwrap().fill(7);
        assert_eq!(pool.bytes(a).unwrap(), b"abcd");
        assert_eq!(pool.bytes(b).unwrap(), &[7, 7, 7, 7]);
        assert!(pool.bytes(Offset(1)).is_none());
    }

    #[test]
    fn alloc_does_not_clear_previous_contents() {
        let mut pool = FirstFitPool::init(8).unwrap();
        let a = pool.alloc(8).unwrap();
        pool.bytes_mut(a).unwrap().fill(0xAB);
        pool.free(a);
        let b = pool.alloc(8).unwrap();
        assert_eq!(a, b);
        assert!(pool.bytes(b).unwrap().iter().all(|&x| x == 0xAB));
    }

    #[test]
    fn cleanup_reports_leftover_records() {
        let mut pool = FirstFitPool::init(100).unwrap();
        pool.alloc(10).unwrap();
        pool.alloc(25).unwrap();
        let summary = pool.cleanup();
        assert_eq!(
            summary,
            CleanupSummary {
                released_records: 2,
                released_bytes: 35,
                pool_bytes: 100,
            }
        );
    }

    #[test]
    fn independent_instances_do_not_share_state() {
        let mut a = FirstFitPool::init(10).unwrap();
        let mut b = FirstFitPool::init(10).unwrap();
        a.alloc(10).unwrap();
        assert_eq!(b.alloc(10).unwrap(), Offset(0));
        assert!(a.alloc(1).is_err());
    }

    #[test]
    fn record_lookup_and_contains() {
        let mut pool = FirstFitPool::init(10).unwrap();
        let off = pool.alloc(3).unwrap();
        assert!(pool.contains(off));
        assert_eq!(pool.record(off), Some(AllocationRecord::new(off, 3)));
        assert!(!pool.contains(Offset(3)));
    }

    #[test]
    fn config_is_retained() {
        let pool = FirstFitPool::with_config(PoolConfig::new(16).with_record_capacity(2)).unwrap();
        assert_eq!(pool.config().record_capacity, 2);
        assert_eq!(pool.total_size(), 16);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Alloc(usize),
            Free(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (1usize..64).prop_map(Op::Alloc),
                (0usize..16).prop_map(Op::Free),
            ]
        }

        proptest! {
            #[test]
            fn records_stay_ordered_and_disjoint(
                ops in proptest::collection::vec(op(), 1..80),
            ) {
                let mut pool = FirstFitPool::init(256).unwrap();
                let mut live: Vec<Offset> = Vec::new();
                for op in ops {
                    match op {
                        Op::Alloc(size) => {
                            if let Ok(off) = pool.alloc(size) {
                                live.push(off);
                            }
                        }
                        Op::Free(i) if !live.is_empty() => {
                            let off = live.swap_remove(i % live.len());
                            prop_assert!(pool.free(off).is_some());
                        }
                        Op::Free(_) => {}
                    }
                    let records: Vec<AllocationRecord> = pool.enumerate().collect();
                    for pair in records.windows(2) {
                        prop_assert!(pair[0].end() <= pair[1].start.0);
                    }
                    let report = pool.stats();
                    prop_assert_eq!(report.allocated_bytes + report.free_bytes, 256);
                    prop_assert_eq!(report.allocation_count, live.len());
                }
            }

            #[test]
            fn failure_means_no_gap_fits(
                sizes in proptest::collection::vec(1usize..100, 1..40),
            ) {
                let mut pool = FirstFitPool::init(512).unwrap();
                for (i, size) in sizes.into_iter().enumerate() {
                    match pool.alloc(size) {
                        Ok(_) => {}
                        Err(PoolError::OutOfMemory { largest_free, .. }) => {
                            prop_assert!(largest_free < size);
                            prop_assert!(pool.gaps().all(|g| g.len < size));
                        }
                        Err(e) => prop_assert!(false, "unexpected error {e}"),
                    }
                    if i % 3 == 0 {
                        if let Some(first) = pool.enumerate().next() {
                            pool.free(first.start);
                        }
                    }
                }
            }

            #[test]
            fn placement_is_lowest_fitting_gap(
                sizes in proptest::collection::vec(1usize..40, 2..30),
                frees in proptest::collection::vec(0usize..30, 0..10),
                request in 1usize..40,
            ) {
                let mut pool = FirstFitPool::init(400).unwrap();
                let mut live: Vec<Offset> = sizes.iter().filter_map(|&s| pool.alloc(s).ok()).collect();
                for i in frees {
                    if !live.is_empty() {
                        let off = live.remove(i % live.len());
                        pool.free(off);
                    }
                }
                let expected = pool.gaps().find(|g| g.len >= request).map(|g| g.start);
                prop_assert_eq!(pool.alloc(request).ok(), expected);
            }
        }
    }
}
