//! The [`Agent`] entity.

use lattica_core::{AgentId, Entity, Position};

/// A free-moving entity with a continuous position and a user state.
///
/// Ids come from the manager's monotonic counter and are globally
/// unique within the manager for the lifetime of the run, across any
/// number of add/remove cycles. The position always lies inside the
/// space, modulo periodic mapping; only the manager moves agents.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent<S> {
    id: AgentId,
    state: S,
    pos: Position,
}

impl<S> Agent<S> {
    pub(crate) fn new(id: AgentId, state: S, pos: Position) -> Self {
        Self { id, state, pos }
    }

    /// The agent's id.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The agent's current (observable) position.
    pub fn pos(&self) -> &[f64] {
        &self.pos
    }

    pub(crate) fn set_pos(&mut self, pos: Position) {
        self.pos = pos;
    }
}

impl<S> Entity for Agent<S> {
    type State = S;

    fn state(&self) -> &S {
        &self.state
    }

    fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }
}
