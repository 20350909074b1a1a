//! Continuous spaces, lattice discretizations, and neighborhood algebra.
//!
//! A [`Space`] is an axis-aligned box in `R^D` with optional periodic
//! boundaries. A [`Grid`] discretizes a space with a concrete
//! tessellation (square or hexagonal row-offset) and owns the shape,
//! index arithmetic, and the neighborhood function family. The
//! [`nb`] module holds the compact neighborhood algebra all grid
//! neighborhoods are built from.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod grid;
mod hex;
pub mod nb;
mod space;
mod square;

pub use grid::{Grid, GridConfig, GridStructure, NeighborhoodConfig};
pub use hex::HexGrid;
pub use nb::{NbKind, Neighborhood};
pub use space::{Space, SpaceConfig};
pub use square::SquareGrid;
