//! Strongly-typed identifiers and the [`MultiIndex`] / [`Position`] aliases.

use smallvec::SmallVec;
use std::fmt;

/// Identifies a cell within a cell manager.
///
/// Cell ids are dense: `CellId(n)` is the n-th cell in the manager's
/// container, and equals the row-major ravel of the cell's multi-index
/// on the grid. Assigned once at bulk construction, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    /// The id as a container index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CellId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an agent within an agent manager.
///
/// Agent ids are allocated from a per-manager monotonic counter and are
/// never reused, even across `add_agent` / `remove_agent` cycles. They
/// are *not* container indices: after removals the container compacts
/// while ids stay stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AgentId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A grid multi-index: one lattice coordinate per axis, axis 0 first.
///
/// Inline capacity of 3 covers every supported dimensionality without
/// heap allocation.
pub type MultiIndex = SmallVec<[usize; 3]>;

/// A continuous position in the space, one coordinate per axis.
pub type Position = SmallVec<[f64; 3]>;
