//! Cell container, manager, and selection primitives.
//!
//! A [`CellManager`] owns the dense cell container of a
//! [`Grid`](lattica_space::Grid), keeps the id/index invariant
//! (`cells()[i].id() == CellId(i)`), serves neighborhood queries, and
//! exposes the selection modes models use to pick subsets of cells.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod cell;
mod manager;
mod select;

pub use cell::Cell;
pub use manager::CellManager;
pub use select::{Boundary, SelectMode};
