//! Driver error types.

use std::io;
use std::path::PathBuf;

use fitpool_arena::PoolError;
use thiserror::Error;

/// Errors from loading or running a workload.
///
/// Allocation failures inside a workload are expected outcomes and are
/// recorded as events, not returned here. Only pool construction failures
/// and malformed scripts surface as errors.
#[derive(Debug, Error)]
pub enum DemoError {
    /// The pool for a workload could not be created.
    #[error("pool initialisation failed: {0}")]
    Pool(#[from] PoolError),
    /// A script file could not be read.
    #[error("cannot read script {path}: {source}")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A script is not valid TOML or does not match the script schema.
    #[error("malformed script: {0}")]
    Parse(#[from] toml::de::Error),
    /// A `free` op names a label no earlier `alloc` op declared.
    #[error("op {index}: unknown label {label:?}")]
    UnknownLabel {
        /// Zero-based position of the offending op.
        index: usize,
        /// The undeclared label.
        label: String,
    },
}
