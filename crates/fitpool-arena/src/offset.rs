//! Logical positions inside a pool.

use std::fmt;

/// Byte position of an allocation within its owning pool.
///
/// Offsets are relative to the start of the pool, never raw addresses, so
/// two pools hand out overlapping offset ranges independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset(pub usize);

impl Offset {
    /// The first byte of every pool.
    pub const ZERO: Offset = Offset(0);

    /// The raw byte position.
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

impl From<usize> for Offset {
    fn from(v: usize) -> Self {
        Self(v)
    }
}
