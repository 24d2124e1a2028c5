//! Replayable alloc/free workloads.
//!
//! An [`Op`] sequence can be applied to any pool with [`apply`], which keeps
//! its own list of live offsets so `Free` ops can refer to earlier
//! allocations by index. Applying the same sequence to two fresh pools of the
//! same size must produce identical results.

use fitpool_arena::{AllocationRecord, FirstFitPool, Offset, PoolError};
use proptest::prelude::*;

/// One step of a workload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    /// Request this many bytes (may be zero).
    Alloc(usize),
    /// Free the live allocation at `index % live_count`; no-op when none.
    Free(usize),
    /// Free an arbitrary offset, tracked or not.
    FreeOffset(usize),
}

/// Observable outcome of one [`Op`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpResult {
    Alloc(Result<Offset, PoolError>),
    Free(Option<AllocationRecord>),
}

/// Applies ops one at a time, remembering live offsets between steps.
#[derive(Debug, Default)]
pub struct OpRunner {
    live: Vec<Offset>,
}

impl OpRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one op to `pool`.
    pub fn step(&mut self, pool: &mut FirstFitPool, op: &Op) -> OpResult {
        match *op {
            Op::Alloc(size) => {
                let result = pool.alloc(size);
                if let Ok(offset) = result {
                    self.live.push(offset);
                }
                OpResult::Alloc(result)
            }
            Op::Free(index) => {
                if self.live.is_empty() {
                    return OpResult::Free(None);
                }
                let offset = self.live.swap_remove(index % self.live.len());
                OpResult::Free(pool.free(offset))
            }
            Op::FreeOffset(raw) => {
                let offset = Offset(raw);
                self.live.retain(|&o| o != offset);
                OpResult::Free(pool.free(offset))
            }
        }
    }

    /// Offsets this runner believes are live.
    pub fn live(&self) -> &[Offset] {
        &self.live
    }
}

/// Apply `ops` in order, returning one result per op.
pub fn apply(pool: &mut FirstFitPool, ops: &[Op]) -> Vec<OpResult> {
    let mut runner = OpRunner::new();
    ops.iter().map(|op| runner.step(pool, op)).collect()
}

/// A single op with request sizes in `0..=max_size`.
pub fn op_strategy(max_size: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..=max_size).prop_map(Op::Alloc),
        3 => any::<usize>().prop_map(Op::Free),
        1 => (0..=max_size * 4).prop_map(Op::FreeOffset),
    ]
}

/// A workload of up to `max_len` ops.
pub fn ops_strategy(max_size: usize, max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op_strategy(max_size), 0..max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_by_index_targets_live_allocation() {
        let mut pool = FirstFitPool::init(100).unwrap();
        let results = apply(&mut pool, &[Op::Alloc(10), Op::Alloc(10), Op::Free(0)]);
        assert_eq!(
            results[2],
            OpResult::Free(Some(AllocationRecord::new(Offset(0), 10)))
        );
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn free_with_nothing_live_is_none() {
        let mut pool = FirstFitPool::init(100).unwrap();
        assert_eq!(apply(&mut pool, &[Op::Free(3)]), vec![OpResult::Free(None)]);
    }

    #[test]
    fn runner_tracks_live_offsets() {
        let mut pool = FirstFitPool::init(100).unwrap();
        let mut runner = OpRunner::new();
        runner.step(&mut pool, &Op::Alloc(10));
        runner.step(&mut pool, &Op::Alloc(0));
        runner.step(&mut pool, &Op::Alloc(20));
        assert_eq!(runner.live(), &[Offset(0), Offset(10)]);
    }

    #[test]
    fn free_offset_untracks_allocation() {
        let mut pool = FirstFitPool::init(100).unwrap();
        let results = apply(
            &mut pool,
            &[Op::Alloc(10), Op::FreeOffset(0), Op::Free(0)],
        );
        assert!(matches!(results[1], OpResult::Free(Some(_))));
        assert_eq!(results[2], OpResult::Free(None));
    }
}
