//! Free-space discovery by walking the record set.
//!
//! Free ranges are never stored. [`Gaps`] derives them on demand from the
//! address-ordered records: a cursor starts at offset 0, jumps past every
//! record that begins exactly at the cursor, and otherwise reports the range
//! up to the next record (or the pool end) as a gap. `alloc()` stops at the
//! first gap that fits; `stats()` drains the whole walk.

use std::iter::FusedIterator;

use crate::offset::Offset;
use crate::record::AllocationRecord;

/// A contiguous range of the pool not covered by any live record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gap {
    /// First free byte.
    pub start: Offset,
    /// Number of free bytes. Always at least 1.
    pub len: usize,
    /// Index of the first record after this gap, i.e. where a record placed
    /// inside the gap belongs in the ordered set.
    pub(crate) insert_index: usize,
}

impl Gap {
    /// One past the last free byte.
    pub fn end(&self) -> usize {
        self.start.0 + self.len
    }

    /// Whether a request of `size` bytes fits at the start of this gap.
    pub fn fits(&self, size: usize) -> bool {
        self.len >= size
    }
}

/// Iterator over the gaps of a pool, lowest offset first.
#[derive(Clone, Debug)]
pub struct Gaps<'a> {
    records: &'a [AllocationRecord],
    total_size: usize,
    cursor: usize,
    next_record: usize,
}

impl<'a> Gaps<'a> {
    pub(crate) fn new(records: &'a [AllocationRecord], total_size: usize) -> Self {
        Self {
            records,
            total_size,
            cursor: 0,
            next_record: 0,
        }
    }
}

impl Iterator for Gaps<'_> {
    type Item = Gap;

    fn next(&mut self) -> Option<Gap> {
        while self.cursor < self.total_size {
            let boundary = match self.records.get(self.next_record) {
                Some(record) if record.start.0 == self.cursor => {
                    self.cursor = record.end();
                    self.next_record += 1;
                    continue;
                }
                Some(record) => record.start.0,
                None => self.total_size,
            };
            let gap = Gap {
                start: Offset(self.cursor),
                len: boundary - self.cursor,
                insert_index: self.next_record,
            };
            self.cursor = boundary;
            return Some(gap);
        }
        None
    }
}

impl FusedIterator for Gaps<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(start: usize, size: usize) -> AllocationRecord {
        AllocationRecord::new(Offset(start), size)
    }

    fn spans(records: &[AllocationRecord], total: usize) -> Vec<(usize, usize)> {
        Gaps::new(records, total).map(|g| (g.start.0, g.len)).collect()
    }

    #[test]
    fn empty_pool_is_one_gap() {
        assert_eq!(spans(&[], 100), vec![(0, 100)]);
    }

    #[test]
    fn full_pool_has_no_gaps() {
        assert!(spans(&[rec(0, 100)], 100).is_empty());
        assert!(spans(&[rec(0, 40), rec(40, 60)], 100).is_empty());
    }

    #[test]
    fn gaps_between_and_after_records() {
        let records = [rec(0, 30), rec(60, 30)];
        assert_eq!(spans(&records, 100), vec![(30, 30), (90, 10)]);
    }

    #[test]
    fn leading_gap_reported_first() {
        let records = [rec(10, 10)];
        assert_eq!(spans(&records, 30), vec![(0, 10), (20, 10)]);
    }

    #[test]
    fn adjacent_free_ranges_form_one_gap() {
        // Two neighbouring records were freed from [0,10)[10,20)[20,30).
        let records = [rec(20, 10)];
        assert_eq!(spans(&records, 40), vec![(0, 20), (30, 10)]);
    }

    #[test]
    fn insert_index_points_after_preceding_records() {
        let records = [rec(0, 10), rec(20, 10), rec(40, 10)];
        let indices: Vec<usize> = Gaps::new(&records, 60).map(|g| g.insert_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn fits_is_inclusive() {
        let gap = Gap {
            start: Offset(30),
            len: 10,
            insert_index: 1,
        };
        assert!(gap.fits(10));
        assert!(!gap.fits(11));
        assert_eq!(gap.end(), 40);
    }

    #[test]
    fn exhausted_iterator_stays_exhausted() {
        let records = [rec(0, 5)];
        let mut gaps = Gaps::new(&records, 10);
        assert!(gaps.next().is_some());
        assert!(gaps.next().is_none());
        assert!(gaps.next().is_none());
    }
}
