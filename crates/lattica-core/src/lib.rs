//! Core types and traits for the Lattica modeling toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Lattica workspace:
//! typed entity identifiers, index and position aliases, the error
//! taxonomy, the [`Entity`] seam between managers and the rule engine,
//! and the canonical deterministic simulation RNG.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod entity;
mod error;
mod id;
mod rng;

pub use entity::Entity;
pub use error::{CoreError, RuleError};
pub use id::{AgentId, CellId, MultiIndex, Position};
pub use rng::{seeded_rng, SimRng};
