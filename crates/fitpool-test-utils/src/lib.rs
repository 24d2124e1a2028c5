//! Test utilities for fitpool development.
//!
//! Provides an invariant checker for [`FirstFitPool`] state, a replayable
//! [`Op`] script type, and proptest strategies that generate alloc/free
//! workloads.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod ops;

use fitpool_arena::{AllocationRecord, FirstFitPool};

pub use ops::{apply, op_strategy, ops_strategy, Op, OpResult, OpRunner};

/// Check every structural invariant of a pool, returning the first violation.
///
/// - records are sorted by start and pairwise disjoint
/// - every record has non-zero size and lies inside the pool
/// - `allocated_bytes + free_bytes == total_size`
/// - gap count, largest gap and record count agree with the report
pub fn check_invariants(pool: &FirstFitPool) -> Result<(), String> {
    let total = pool.total_size();
    let records: Vec<AllocationRecord> = pool.enumerate().collect();

    for record in &records {
        if record.size == 0 {
            return Err(format!("zero-size record at {}", record.start));
        }
        if record.end() > total {
            return Err(format!("record {record} extends past pool end {total}"));
        }
    }
    for pair in records.windows(2) {
        if pair[0].end() > pair[1].start.0 {
            return Err(format!("records {} and {} overlap or are unordered", pair[0], pair[1]));
        }
    }

    let report = pool.stats();
    if report.allocated_bytes + report.free_bytes != total {
        return Err(format!(
            "conservation violated: {} allocated + {} free != {total}",
            report.allocated_bytes, report.free_bytes
        ));
    }
    if report.allocation_count != records.len() {
        return Err(format!(
            "report counts {} allocations, enumerate yields {}",
            report.allocation_count,
            records.len()
        ));
    }

    let gap_bytes: usize = pool.gaps().map(|g| g.len).sum();
    if gap_bytes != report.free_bytes {
        return Err(format!(
            "gaps cover {gap_bytes} bytes, report says {} free",
            report.free_bytes
        ));
    }
    let largest = pool.gaps().map(|g| g.len).max().unwrap_or(0);
    if largest != report.largest_free_block {
        return Err(format!(
            "largest gap {largest}, report says {}",
            report.largest_free_block
        ));
    }
    if pool.gaps().count() != report.free_fragment_count {
        return Err("fragment count disagrees with gap walk".to_string());
    }
    Ok(())
}

/// Panic with a descriptive message if any pool invariant is violated.
#[track_caller]
pub fn assert_invariants(pool: &FirstFitPool) {
    if let Err(violation) = check_invariants(pool) {
        panic!("pool invariant violated: {violation}\nstate: {pool:?}");
    }
}
