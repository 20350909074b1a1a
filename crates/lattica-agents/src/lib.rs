//! Free-moving agent container and movement primitives.
//!
//! An [`AgentManager`] owns a population of agents with continuous
//! positions in a [`Space`](lattica_space::Space). Movement respects
//! the space's periodicity, and the manager implements the
//! synchronous-movement discipline: staged positions live in a
//! manager-owned side buffer and commit atomically on
//! [`update_agents`](AgentManager::update_agents).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod agent;
mod manager;

pub use agent::Agent;
pub use manager::{AgentManager, UpdateMode};
