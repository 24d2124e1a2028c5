//! Built-in demonstration workloads.
//!
//! - [`basic`] — mixed sizes, free every third, refill, free all (10 KiB)
//! - [`fragmentation`] — equal blocks with alternating holes (5000 B)
//! - [`stress`] — 100 seeded random alloc/free operations (50 000 B)
//! - [`edge_cases`] — zero-size, oversize, bogus free, full pool (1000 B)

use fitpool_arena::Offset;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::DemoError;
use crate::session::{ScenarioReport, Session};

/// Sizes requested by the first phase of [`basic`].
pub const BASIC_SIZES: [usize; 28] = [
    10, 25, 50, 100, 250, 500, 1000, 15, 35, 75, 125, 300, 600, 1200, 20, 40, 60, 150, 350, 700,
    800, 45, 85, 175, 275, 400, 550, 900,
];

/// Sizes requested after fragmentation in [`basic`].
pub const BASIC_REFILL_SIZES: [usize; 8] = [30, 80, 200, 450, 900, 100, 50, 25];

/// Upper bound on allocations tracked by the driver in one scenario.
const MAX_TRACKED: usize = 100;

/// Mixed-size workload over a 10 KiB pool.
///
/// Phases: initial allocations, free every third one, refill with new
/// sizes (first-fit reuses the earliest holes), free everything.
pub fn basic() -> Result<ScenarioReport, DemoError> {
    let mut session = Session::new("basic", 10_240)?;
    let mut tracked: Vec<Option<Offset>> = Vec::with_capacity(MAX_TRACKED);

    for &size in &BASIC_SIZES {
        if let Some(offset) = session.alloc(size) {
            tracked.push(Some(offset));
        }
    }
    session.checkpoint("initial allocations");

    for slot in tracked.iter_mut().step_by(3) {
        if let Some(offset) = slot.take() {
            session.free(offset);
        }
    }
    session.checkpoint("every third freed");

    for &size in &BASIC_REFILL_SIZES {
        if let Some(offset) = session.alloc(size) {
            if tracked.len() < MAX_TRACKED {
                tracked.push(Some(offset));
            }
        }
    }
    session.checkpoint("refilled");

    for offset in tracked.into_iter().flatten() {
        session.free(offset);
    }
    session.checkpoint("all freed");

    Ok(session.finish())
}

/// Ten 400-byte blocks with every odd one freed, then large and
/// hole-sized requests.
pub fn fragmentation() -> Result<ScenarioReport, DemoError> {
    let mut session = Session::new("fragmentation", 5000)?;

    let blocks: Vec<Option<Offset>> = (0..10).map(|_| session.alloc(400)).collect();
    session.checkpoint("ten blocks");

    for offset in blocks.iter().skip(1).step_by(2).flatten() {
        session.free(*offset);
    }
    session.checkpoint("odd blocks freed");

    session.alloc(1000);
    for _ in 0..5 {
        session.alloc(350);
    }
    session.checkpoint("holes refilled");

    Ok(session.finish())
}

/// 100 random operations over a 50 000-byte pool.
///
/// Each step allocates 10..=509 bytes, or (with equal probability, when
/// anything is tracked) frees a random tracked allocation. The same `seed`
/// always yields the same report.
pub fn stress(seed: u64) -> Result<ScenarioReport, DemoError> {
    let mut session = Session::new("stress", 50_000)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tracked: Vec<Offset> = Vec::with_capacity(MAX_TRACKED);

    for _ in 0..100 {
        let allocate = rng.random_bool(0.5) || tracked.is_empty();
        if allocate {
            let size = rng.random_range(10..510);
            if let Some(offset) = session.alloc(size) {
                if tracked.len() < MAX_TRACKED {
                    tracked.push(offset);
                }
            }
        } else {
            let idx = rng.random_range(0..tracked.len());
            let offset = tracked.swap_remove(idx);
            session.free(offset);
        }
    }
    session.checkpoint("after 100 operations");

    for offset in tracked {
        session.free(offset);
    }
    session.checkpoint("tracked freed");

    Ok(session.finish())
}

/// Boundary inputs against a 1000-byte pool.
pub fn edge_cases() -> Result<ScenarioReport, DemoError> {
    let mut session = Session::new("edge cases", 1000)?;

    session.alloc(0);
    session.alloc(2000);
    session.free(Offset(usize::MAX));
    session.free(Offset(42));

    if let Some(whole) = session.alloc(1000) {
        session.checkpoint("whole pool allocated");
        session.alloc(10);
        session.free(whole);
    }
    session.checkpoint("after edge cases");

    Ok(session.finish())
}

/// Run every built-in scenario in order.
pub fn all(seed: u64) -> Result<Vec<ScenarioReport>, DemoError> {
    Ok(vec![basic()?, fragmentation()?, stress(seed)?, edge_cases()?])
}
