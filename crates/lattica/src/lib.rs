//! Lattica: a lattice-based simulation toolkit for cellular automata
//! and agent-based models.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Lattica sub-crates. For most users, adding `lattica` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use lattica::prelude::*;
//! use std::sync::Arc;
//!
//! // A periodic 5x5 lattice on the unit square, von Neumann
//! // neighborhoods of distance 1.
//! let space = Arc::new(Space::new(&[1.0, 1.0], true).unwrap());
//! let cfg = GridConfig::square(5).with_neighborhood(NbKind::VonNeumann, 1);
//! let grid = Grid::build(&cfg, space).unwrap();
//!
//! // Every cell starts at 1.0.
//! let mut cells = CellManager::with_state(grid, 1.0_f64);
//! cells.cache_neighborhoods();
//!
//! // One synchronous pass of "me plus my neighbors".
//! let table: Vec<Vec<usize>> = (0..cells.num_cells())
//!     .map(|i| {
//!         cells
//!             .neighbors_of(CellId(i as u32))
//!             .into_iter()
//!             .map(|n| n.index())
//!             .collect()
//!     })
//!     .collect();
//! apply_value_rule(Update::Sync, Shuffle::Off, cells.cells_mut(), |c, all| {
//!     let sum: f64 = table[c.id().index()].iter().map(|&n| *all[n].state()).sum();
//!     Ok(c.state() + sum)
//! })
//! .unwrap();
//!
//! // Four unit neighbors each, so every cell lands on 5.
//! assert!(cells.cells().iter().all(|c| *c.state() == 5.0));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `lattica-core` | IDs, errors, the `Entity` trait, seeded RNG |
//! | [`space`] | `lattica-space` | Continuous space, square and hexagonal lattices, neighborhoods |
//! | [`cells`] | `lattica-cells` | Cell storage, neighborhood caching, selection modes |
//! | [`agents`] | `lattica-agents` | Mobile agents with sync or async movement |
//! | [`engine`] | `lattica-engine` | Rule application under update and traversal disciplines |
//! | [`archive`] | `lattica-archive` | Time-major dataset staging and attribute queueing |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, errors, and the RNG (`lattica-core`).
///
/// Contains [`types::CellId`], [`types::AgentId`], [`types::CoreError`],
/// the [`types::Entity`] trait, and [`types::seeded_rng`].
pub use lattica_core as types;

/// Space and lattices (`lattica-space`).
///
/// Provides [`space::Space`], the [`space::Grid`] dispatch enum over
/// [`space::SquareGrid`] and [`space::HexGrid`], and the neighborhood
/// machinery in [`space::nb`].
pub use lattica_space as space;

/// Cell storage and selection (`lattica-cells`).
///
/// [`cells::CellManager`] owns the per-cell states of a lattice and
/// implements the [`cells::SelectMode`] selection modes.
pub use lattica_cells as cells;

/// Mobile agents (`lattica-agents`).
///
/// [`agents::AgentManager`] owns a population of agents in continuous
/// space with synchronous or asynchronous movement commits.
pub use lattica_agents as agents;

/// Rule application (`lattica-engine`).
///
/// The [`engine::apply_value_rule`] family applies local rules under
/// the [`engine::Update`] and [`engine::Shuffle`] disciplines.
pub use lattica_engine as engine;

/// Dataset staging (`lattica-archive`).
///
/// The in-memory [`archive::Archive`] and the [`archive::StepSink`]
/// seam for storage collaborators.
pub use lattica_archive as archive;

/// Common imports for typical Lattica usage.
///
/// ```rust
/// use lattica::prelude::*;
/// ```
pub mod prelude {
    pub use lattica_agents::{Agent, AgentManager, UpdateMode};
    pub use lattica_archive::{Archive, AttrValue, StepSink};
    pub use lattica_cells::{Boundary, Cell, CellManager, SelectMode};
    pub use lattica_core::{
        seeded_rng, AgentId, CellId, CoreError, Entity, MultiIndex, Position, RuleError, SimRng,
    };
    pub use lattica_engine::{
        apply_value_rule, apply_value_rule_zip, apply_void_rule, Shuffle, Update,
    };
    pub use lattica_space::{Grid, GridConfig, GridStructure, NbKind, Neighborhood, Space};
}
