//! Scripted workloads loaded from TOML.
//!
//! ```toml
//! pool_size = 100
//!
//! [[ops]]
//! op = "alloc"
//! size = 30
//! label = "a"
//!
//! [[ops]]
//! op = "free"
//! label = "a"
//!
//! [[ops]]
//! op = "free_offset"
//! offset = 9999
//!
//! [[ops]]
//! op = "stats"
//! label = "after free"
//! ```
//!
//! Labels name allocations so later ops can free them without knowing the
//! offset first-fit chose. Re-using a label rebinds it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use fitpool_arena::Offset;
use serde::Deserialize;

use crate::error::DemoError;
use crate::session::{ScenarioReport, Session};

/// One scripted operation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptOp {
    /// Request `size` bytes, optionally binding the result to `label`.
    Alloc {
        /// Requested size in bytes.
        size: usize,
        /// Name for later `free` ops.
        #[serde(default)]
        label: Option<String>,
    },
    /// Free the allocation bound to `label`.
    Free {
        /// A label bound by an earlier `alloc`.
        label: String,
    },
    /// Free a raw offset, tracked or not.
    FreeOffset {
        /// Byte offset within the pool.
        offset: usize,
    },
    /// Record a checkpoint.
    Stats {
        /// Checkpoint name; defaults to `op N`.
        #[serde(default)]
        label: Option<String>,
    },
}

/// A pool size plus the ops to run against it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Pool size in bytes.
    pub pool_size: usize,
    /// Operations, in order.
    #[serde(default)]
    pub ops: Vec<ScriptOp>,
}

impl Script {
    /// Parse a script from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, DemoError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a script file.
    pub fn load(path: &Path) -> Result<Self, DemoError> {
        let text = fs::read_to_string(path).map_err(|source| DemoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Run the script on a fresh pool.
    ///
    /// A final `"end of script"` checkpoint is always recorded.
    pub fn run(&self, name: &str) -> Result<ScenarioReport, DemoError> {
        let mut session = Session::new(name, self.pool_size)?;
        // `None` marks a label whose allocation failed; freeing it is a no-op.
        let mut labels: HashMap<&str, Option<Offset>> = HashMap::new();

        for (index, op) in self.ops.iter().enumerate() {
            match op {
                ScriptOp::Alloc { size, label } => {
                    let offset = session.alloc(*size);
                    if let Some(label) = label {
                        labels.insert(label.as_str(), offset);
                    }
                }
                ScriptOp::Free { label } => match labels.get(label.as_str()) {
                    Some(Some(offset)) => {
                        session.free(*offset);
                    }
                    Some(None) => {}
                    None => {
                        return Err(DemoError::UnknownLabel {
                            index,
                            label: label.clone(),
                        })
                    }
                },
                ScriptOp::FreeOffset { offset } => {
                    session.free(Offset(*offset));
                }
                ScriptOp::Stats { label } => {
                    let label = label.clone().unwrap_or_else(|| format!("op {index}"));
                    session.checkpoint(label);
                }
            }
        }
        session.checkpoint("end of script");
        Ok(session.finish())
    }
}
