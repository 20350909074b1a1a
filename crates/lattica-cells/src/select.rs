//! Selection modes: named strategies for choosing subsets of cells.

use lattica_core::{CoreError, Position};

/// A named boundary of a 2-D grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// The row with the highest axis-1 index.
    Top,
    /// The row with axis-1 index 0.
    Bottom,
    /// The column with axis-0 index 0.
    Left,
    /// The column with the highest axis-0 index.
    Right,
    /// The union of all four boundaries.
    All,
}

impl Boundary {
    /// Boundary names accepted by [`Boundary::from_name`].
    pub const KNOWN: &'static [&'static str] = &["top", "bottom", "left", "right", "all"];

    /// Resolve a configuration boundary name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "all" => Ok(Self::All),
            _ => Err(CoreError::UnknownMode {
                mode: name.into(),
                known: Self::KNOWN,
            }),
        }
    }
}

/// A selection strategy, as plain configuration data.
///
/// Predicate selection is not data; it lives on
/// [`CellManager::select_cells_where`](crate::CellManager::select_cells_where).
#[derive(Clone, Debug, PartialEq)]
pub enum SelectMode {
    /// Uniform sample without replacement of fixed size.
    Sample {
        /// Number of cells to select; must not exceed the population.
        num_cells: usize,
    },
    /// Independent Bernoulli draw per cell.
    Probability {
        /// Selection probability, in `[0, 1]`.
        p: f64,
    },
    /// The nearest cell to each given position.
    Position {
        /// The query positions.
        positions: Vec<Position>,
    },
    /// All cells on a named boundary (2-D grids).
    Boundary {
        /// Which boundary.
        boundary: Boundary,
    },
    /// Periodic stripes of cells at equal spacing (2-D grids).
    Lanes {
        /// Number of vertical lanes (full columns).
        num_vertical: usize,
        /// Number of horizontal lanes (full rows).
        num_horizontal: usize,
    },
    /// Percolation-style seed-and-grow clusters.
    ClusteredSimple {
        /// Per-cell seed probability, in `[0, 1]`.
        p_seed: f64,
        /// Per-neighbor attachment probability per pass, in `[0, 1]`.
        p_grow: f64,
        /// Number of growth passes over the cluster fringe.
        passes: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_names_resolve() {
        let expected = [
            Boundary::Top,
            Boundary::Bottom,
            Boundary::Left,
            Boundary::Right,
            Boundary::All,
        ];
        for (&name, &boundary) in Boundary::KNOWN.iter().zip(&expected) {
            assert_eq!(Boundary::from_name(name).unwrap(), boundary);
        }
        assert!(matches!(
            Boundary::from_name("Top"),
            Err(CoreError::UnknownMode { .. })
        ));
    }
}
