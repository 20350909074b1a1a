//! The [`Entity`] trait: the seam between entity managers and the rule engine.

/// An entity that carries user-defined state.
///
/// Cells and agents both implement this; the rule engine is generic
/// over it and never needs to know whether it is iterating a cell
/// container or an agent container.
pub trait Entity {
    /// The user-defined state type.
    type State;

    /// Immutable access to the state.
    fn state(&self) -> &Self::State;

    /// Mutable access to the state.
    ///
    /// The engine uses this to commit synchronous buffers and to apply
    /// asynchronous write-through updates; models use it inside void
    /// rules.
    fn state_mut(&mut self) -> &mut Self::State;
}
