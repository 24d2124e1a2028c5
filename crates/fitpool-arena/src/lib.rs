//! First-fit allocation over a single fixed-size byte pool.
//!
//! A [`FirstFitPool`] reserves one contiguous region up front and hands out
//! [`Offset`]s into it. Live allocations are tracked as an address-ordered
//! set of [`AllocationRecord`]s; free space is never stored explicitly but
//! recomputed as the gaps between neighbouring records.
//!
//! # Architecture
//!
//! ```text
//! FirstFitPool (engine)
//! ├── Pool           (Box<[u8]>, reserved once, never resized)
//! ├── RecordSet      (Vec<AllocationRecord>, sorted by start offset)
//! └── Gaps           (walk shared by alloc() and stats())
//! ```
//!
//! # Placement
//!
//! `alloc()` scans gaps from offset 0 upward and takes the first one that is
//! large enough, placing the allocation at the gap's start. Freeing a record
//! removes it immediately; adjacent free ranges show up as one gap on the
//! next scan, so no explicit coalescing pass exists.
//!
//! # Safety
//!
//! No `unsafe`. Allocations are logical offsets; the backing bytes are only
//! reachable through [`FirstFitPool::bytes`] and [`FirstFitPool::bytes_mut`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod gaps;
pub mod offset;
mod pool;
pub mod record;
pub mod stats;

// Public re-exports for the primary API surface.
pub use config::PoolConfig;
pub use engine::{CleanupSummary, FirstFitPool};
pub use error::PoolError;
pub use gaps::{Gap, Gaps};
pub use offset::Offset;
pub use record::{AllocationRecord, Allocations};
pub use stats::UsageReport;
