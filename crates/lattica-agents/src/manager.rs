//! The [`AgentManager`]: owner of the agent population.

use crate::agent::Agent;
use lattica_core::{AgentId, CoreError, Position, SimRng};
use lattica_space::Space;
use std::sync::Arc;

/// The update discipline of an agent manager, chosen at construction.
///
/// Under `Sync`, movement is staged into a manager-owned side buffer
/// and commits atomically on [`AgentManager::update_agents`]; under
/// `Async`, movement takes effect immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// Staged movement, committed per step.
    Sync,
    /// Write-through movement.
    Async,
}

/// Owns the agent container of a [`Space`] and provides movement
/// primitives respecting its periodicity.
///
/// Ids are handed out by a monotonic per-manager counter and never
/// reused. The container compacts on removal (O(n)), preserving the
/// relative order of the survivors.
#[derive(Clone, Debug)]
pub struct AgentManager<S> {
    space: Arc<Space>,
    mode: UpdateMode,
    agents: Vec<Agent<S>>,
    /// Staged positions, parallel to `agents`. Only populated in sync
    /// mode between a `move_*` and the next `update_agents`.
    staged: Vec<Option<Position>>,
    next_id: u64,
}

impl<S> AgentManager<S> {
    /// Build the manager with `initial` agents.
    ///
    /// Initial agents receive ids `0..initial` and positions sampled
    /// uniformly from the space; `init` constructs each state from the
    /// id and the shared RNG.
    pub fn new(
        space: Arc<Space>,
        mode: UpdateMode,
        initial: usize,
        rng: &mut SimRng,
        mut init: impl FnMut(AgentId, &mut SimRng) -> S,
    ) -> Self {
        let mut agents = Vec::with_capacity(initial);
        for i in 0..initial as u64 {
            let id = AgentId(i);
            let pos = space.sample_position(rng);
            agents.push(Agent::new(id, init(id, rng), pos));
        }
        Self {
            space,
            mode,
            staged: vec![None; agents.len()],
            next_id: initial as u64,
            agents,
        }
    }

    /// Build the manager with `initial` default-constructed states.
    pub fn with_default(
        space: Arc<Space>,
        mode: UpdateMode,
        initial: usize,
        rng: &mut SimRng,
    ) -> Self
    where
        S: Default,
    {
        Self::new(space, mode, initial, rng, |_, _| S::default())
    }

    /// The underlying space.
    pub fn space(&self) -> &Arc<Space> {
        &self.space
    }

    /// The configured update discipline.
    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    /// Non-mutable view of all agents, in container order.
    pub fn agents(&self) -> &[Agent<S>] {
        &self.agents
    }

    /// Mutable view of all agents. The rule engine iterates this slice.
    pub fn agents_mut(&mut self) -> &mut [Agent<S>] {
        &mut self.agents
    }

    /// Number of live agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// The agent with the given id, if alive.
    pub fn agent(&self, id: AgentId) -> Option<&Agent<S>> {
        self.index_of(id).map(|i| &self.agents[i])
    }

    /// Add an agent with the given state.
    ///
    /// With `pos == None` the position is sampled uniformly from the
    /// space; an explicit position is mapped into the space (periodic)
    /// or validated against it (non-periodic, closed boundary).
    /// Returns the new agent's id.
    pub fn add_agent(
        &mut self,
        state: S,
        pos: Option<&[f64]>,
        rng: &mut SimRng,
    ) -> Result<AgentId, CoreError> {
        let pos = match pos {
            Some(p) => self.space.resolve_position(p)?,
            None => self.space.sample_position(rng),
        };
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.agents.push(Agent::new(id, state, pos));
        self.staged.push(None);
        Ok(id)
    }

    /// Remove an agent by id, returning it. O(n); the id is retired.
    pub fn remove_agent(&mut self, id: AgentId) -> Result<Agent<S>, CoreError> {
        let i = self.index_of(id).ok_or_else(|| CoreError::InvalidValue {
            value: id.to_string(),
            domain: "id of a live agent".into(),
        })?;
        self.staged.remove(i);
        Ok(self.agents.remove(i))
    }

    /// Remove all agents for which the predicate holds; returns the
    /// number removed.
    pub fn erase_agent_if(&mut self, mut pred: impl FnMut(&Agent<S>) -> bool) -> usize {
        let before = self.agents.len();
        let mut kept_staged = Vec::with_capacity(before);
        let mut kept = Vec::with_capacity(before);
        for (agent, staged) in self.agents.drain(..).zip(self.staged.drain(..)) {
            if !pred(&agent) {
                kept.push(agent);
                kept_staged.push(staged);
            }
        }
        self.agents = kept;
        self.staged = kept_staged;
        before - self.agents.len()
    }

    /// Move an agent to an absolute position.
    ///
    /// Async mode commits immediately; sync mode stages the resolved
    /// position until [`update_agents`](Self::update_agents). Periodic
    /// spaces map the target into the box; non-periodic spaces reject
    /// outside targets with [`CoreError::OutOfSpace`].
    pub fn move_to(&mut self, id: AgentId, pos: &[f64]) -> Result<(), CoreError> {
        let i = self.index_of(id).ok_or_else(|| CoreError::InvalidValue {
            value: id.to_string(),
            domain: "id of a live agent".into(),
        })?;
        let resolved = self.space.resolve_position(pos)?;
        match self.mode {
            UpdateMode::Async => self.agents[i].set_pos(resolved),
            UpdateMode::Sync => self.staged[i] = Some(resolved),
        }
        Ok(())
    }

    /// Move an agent by a displacement: `move_to(id, pos + delta)`.
    ///
    /// In sync mode the displacement applies to the observable
    /// position, not to an earlier staged move in the same step.
    pub fn move_by(&mut self, id: AgentId, delta: &[f64]) -> Result<(), CoreError> {
        let i = self.index_of(id).ok_or_else(|| CoreError::InvalidValue {
            value: id.to_string(),
            domain: "id of a live agent".into(),
        })?;
        if delta.len() != self.space.dim() {
            return Err(CoreError::InvalidConfig {
                key: "move_by.delta".into(),
                reason: format!(
                    "expected {}D displacement, got {}D",
                    self.space.dim(),
                    delta.len()
                ),
            });
        }
        let target: Position = self.agents[i]
            .pos()
            .iter()
            .zip(delta)
            .map(|(&p, &d)| p + d)
            .collect();
        self.move_to(id, &target)
    }

    /// Commit every staged position to its agent (sync mode); a no-op
    /// in async mode.
    pub fn update_agents(&mut self) {
        if self.mode == UpdateMode::Async {
            return;
        }
        for (agent, staged) in self.agents.iter_mut().zip(self.staged.iter_mut()) {
            if let Some(pos) = staged.take() {
                agent.set_pos(pos);
            }
        }
    }

    fn index_of(&self, id: AgentId) -> Option<usize> {
        self.agents.iter().position(|a| a.id() == id)
    }
}
