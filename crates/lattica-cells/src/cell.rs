//! The [`Cell`] entity.

use lattica_core::{CellId, Entity};

/// A grid cell holding a user-defined state.
///
/// The id equals the cell's position in its manager's container and
/// the row-major ravel of its multi-index; it is assigned at bulk
/// construction and never mutated. Cells are never destroyed during a
/// run.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell<S> {
    id: CellId,
    state: S,
}

impl<S> Cell<S> {
    /// Create a cell. Only managers construct cells; the invariantly
    /// dense id assignment lives there.
    pub(crate) fn new(id: CellId, state: S) -> Self {
        Self { id, state }
    }

    /// The cell's id.
    pub fn id(&self) -> CellId {
        self.id
    }
}

impl<S> Entity for Cell<S> {
    type State = S;

    fn state(&self) -> &S {
        &self.state
    }

    fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }
}
