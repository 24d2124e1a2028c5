//! Recorded runs against a single pool.
//!
//! A [`Session`] wraps one [`FirstFitPool`] and logs every alloc/free as an
//! [`Event`], plus named [`Phase`] checkpoints carrying a stats report and
//! the allocation layout at that moment. [`Session::finish`] tears the pool
//! down and returns everything as a [`ScenarioReport`] for rendering or
//! assertions.

use fitpool_arena::{
    AllocationRecord, CleanupSummary, FirstFitPool, Offset, PoolError, UsageReport,
};
use tracing::{debug, info};

/// One observable step of a run.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// `size` bytes were placed at `offset`.
    Allocated {
        /// Requested size.
        size: usize,
        /// Where first-fit placed it.
        offset: Offset,
    },
    /// A request was rejected.
    AllocFailed {
        /// Requested size.
        size: usize,
        /// Why it failed.
        error: PoolError,
    },
    /// A live allocation was released.
    Freed {
        /// The released record.
        record: AllocationRecord,
    },
    /// A free targeted an offset the pool does not track.
    FreeIgnored {
        /// The untracked offset.
        offset: Offset,
    },
    /// A checkpoint was taken; index into [`ScenarioReport::phases`].
    Checkpoint {
        /// Position in the phase list.
        phase: usize,
    },
}

/// Stats and layout captured at a named point of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Phase {
    /// Human-readable checkpoint name.
    pub label: String,
    /// Usage at the checkpoint.
    pub stats: UsageReport,
    /// Live allocations at the checkpoint, in address order.
    pub layout: Vec<AllocationRecord>,
}

/// Everything a finished run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Pool size the scenario ran with.
    pub pool_size: usize,
    /// Every step, in order.
    pub events: Vec<Event>,
    /// Checkpoints, in order.
    pub phases: Vec<Phase>,
    /// Usage right before teardown.
    pub final_stats: UsageReport,
    /// What teardown released.
    pub cleanup: CleanupSummary,
}

impl ScenarioReport {
    /// Number of successful allocations.
    pub fn allocations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Allocated { .. }))
            .count()
    }

    /// Number of rejected allocations.
    pub fn failures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::AllocFailed { .. }))
            .count()
    }

    /// Offsets of successful allocations, in request order.
    pub fn offsets(&self) -> Vec<Offset> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Allocated { offset, .. } => Some(*offset),
                _ => None,
            })
            .collect()
    }

    /// The checkpoint with the given label.
    pub fn phase(&self, label: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.label == label)
    }
}

/// A pool plus the event log of everything done to it.
pub struct Session {
    name: String,
    pool: FirstFitPool,
    events: Vec<Event>,
    phases: Vec<Phase>,
}

impl Session {
    /// Start a run on a fresh pool of `pool_size` bytes.
    pub fn new(name: impl Into<String>, pool_size: usize) -> Result<Self, PoolError> {
        let name = name.into();
        let pool = FirstFitPool::init(pool_size)?;
        info!(scenario = %name, pool_size, "session started");
        Ok(Self {
            name,
            pool,
            events: Vec::new(),
            phases: Vec::new(),
        })
    }

    /// Request `size` bytes, recording the outcome.
    pub fn alloc(&mut self, size: usize) -> Option<Offset> {
        match self.pool.alloc(size) {
            Ok(offset) => {
                debug!(scenario = %self.name, size, offset = offset.0, "allocated");
                self.events.push(Event::Allocated { size, offset });
                Some(offset)
            }
            Err(error) => {
                debug!(scenario = %self.name, size, %error, "allocation failed");
                self.events.push(Event::AllocFailed { size, error });
                None
            }
        }
    }

    /// Free `offset`, recording whether anything was released.
    pub fn free(&mut self, offset: Offset) -> bool {
        match self.pool.free(offset) {
            Some(record) => {
                self.events.push(Event::Freed { record });
                true
            }
            None => {
                self.events.push(Event::FreeIgnored { offset });
                false
            }
        }
    }

    /// Capture stats and layout under `label`.
    pub fn checkpoint(&mut self, label: impl Into<String>) {
        let phase = Phase {
            label: label.into(),
            stats: self.pool.stats(),
            layout: self.pool.enumerate().collect(),
        };
        info!(
            scenario = %self.name,
            phase = %phase.label,
            allocations = phase.stats.allocation_count,
            utilization = phase.stats.utilization_percent,
            "checkpoint"
        );
        self.events.push(Event::Checkpoint {
            phase: self.phases.len(),
        });
        self.phases.push(phase);
    }

    /// Read-only access to the underlying pool.
    pub fn pool(&self) -> &FirstFitPool {
        &self.pool
    }

    /// Tear the pool down and return the report.
    pub fn finish(self) -> ScenarioReport {
        let final_stats = self.pool.stats();
        let pool_size = self.pool.total_size();
        let cleanup = self.pool.cleanup();
        info!(
            scenario = %self.name,
            released_records = cleanup.released_records,
            "session finished"
        );
        ScenarioReport {
            name: self.name,
            pool_size,
            events: self.events,
            phases: self.phases,
            final_stats,
            cleanup,
        }
    }
}
