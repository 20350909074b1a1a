//! The [`Grid`] sum type and its typed configuration.

use crate::hex::HexGrid;
use crate::nb::Neighborhood;
use crate::space::Space;
use crate::square::SquareGrid;
use lattica_core::{CellId, CoreError, MultiIndex, Position};
use std::sync::Arc;

/// The tessellation of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridStructure {
    /// Square (hyper-cubic) cells.
    Square,
    /// Hexagonal row-offset cells (2-D only).
    Hexagonal,
}

impl GridStructure {
    /// Structure names accepted by [`GridStructure::from_name`].
    pub const KNOWN: &'static [&'static str] = &["square", "hexagonal"];

    /// Resolve a configuration structure name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "square" => Ok(Self::Square),
            "hexagonal" => Ok(Self::Hexagonal),
            _ => Err(CoreError::UnknownMode {
                mode: name.into(),
                known: Self::KNOWN,
            }),
        }
    }
}

/// The `neighborhood` configuration block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborhoodConfig {
    /// The neighborhood mode.
    pub kind: crate::nb::NbKind,
    /// The lattice distance; defaults to 1.
    pub distance: u32,
}

impl Default for NeighborhoodConfig {
    fn default() -> Self {
        Self {
            kind: crate::nb::NbKind::Empty,
            distance: 1,
        }
    }
}

/// The `grid` configuration block of a cell manager.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// The tessellation.
    pub structure: GridStructure,
    /// Cells per unit of extent.
    pub resolution: u32,
    /// Optional neighborhood; defaults to the empty neighborhood.
    pub neighborhood: NeighborhoodConfig,
}

impl GridConfig {
    /// A square-grid configuration at the given resolution with the
    /// empty neighborhood.
    pub fn square(resolution: u32) -> Self {
        Self {
            structure: GridStructure::Square,
            resolution,
            neighborhood: NeighborhoodConfig::default(),
        }
    }

    /// A hexagonal-grid configuration at the given resolution with the
    /// empty neighborhood.
    pub fn hexagonal(resolution: u32) -> Self {
        Self {
            structure: GridStructure::Hexagonal,
            resolution,
            neighborhood: NeighborhoodConfig::default(),
        }
    }

    /// Replace the neighborhood block.
    pub fn with_neighborhood(mut self, kind: crate::nb::NbKind, distance: u32) -> Self {
        self.neighborhood = NeighborhoodConfig { kind, distance };
        self
    }
}

/// A tessellation of a [`Space`], immutable after construction.
///
/// Behavior dispatches on the variant; there is no polymorphic grid
/// hierarchy. The neighborhood is part of the grid and set once.
#[derive(Clone, Debug)]
pub enum Grid {
    /// A square lattice.
    Square(SquareGrid),
    /// A hexagonal row-offset lattice.
    Hexagonal(HexGrid),
}

impl Grid {
    /// Build a grid from its configuration block, dispatching on
    /// `structure`.
    pub fn build(cfg: &GridConfig, space: Arc<Space>) -> Result<Self, CoreError> {
        let neighborhood = Neighborhood::new(cfg.neighborhood.kind, cfg.neighborhood.distance)?;
        match cfg.structure {
            GridStructure::Square => Ok(Self::Square(SquareGrid::new(
                space,
                cfg.resolution,
                neighborhood,
            )?)),
            GridStructure::Hexagonal => Ok(Self::Hexagonal(HexGrid::new(
                space,
                cfg.resolution,
                neighborhood,
            )?)),
        }
    }

    /// The underlying space.
    pub fn space(&self) -> &Arc<Space> {
        match self {
            Self::Square(g) => g.space(),
            Self::Hexagonal(g) => g.space(),
        }
    }

    /// Cells per axis.
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Square(g) => g.shape(),
            Self::Hexagonal(g) => g.shape(),
        }
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        match self {
            Self::Square(g) => g.num_cells(),
            Self::Hexagonal(g) => g.num_cells(),
        }
    }

    /// The configured neighborhood.
    pub fn neighborhood(&self) -> Neighborhood {
        match self {
            Self::Square(g) => g.neighborhood(),
            Self::Hexagonal(g) => g.neighborhood(),
        }
    }

    /// Multi-index of a cell id.
    pub fn multi_index(&self, id: CellId) -> MultiIndex {
        match self {
            Self::Square(g) => g.multi_index(id),
            Self::Hexagonal(g) => g.multi_index(id),
        }
    }

    /// Cell id of a multi-index.
    pub fn cell_id(&self, midx: &[usize]) -> CellId {
        match self {
            Self::Square(g) => g.cell_id(midx),
            Self::Hexagonal(g) => g.cell_id(midx),
        }
    }

    /// Barycenter of a cell.
    pub fn barycenter(&self, id: CellId) -> Position {
        match self {
            Self::Square(g) => g.barycenter(id),
            Self::Hexagonal(g) => g.barycenter(id),
        }
    }

    /// Corner positions of a cell (4 or `2^D` for square, 6 for hex).
    pub fn vertices(&self, id: CellId) -> Vec<Position> {
        match self {
            Self::Square(g) => g.vertices(id),
            Self::Hexagonal(g) => g.vertices(id),
        }
    }

    /// The cell whose region contains `pos`.
    pub fn cell_at(&self, pos: &[f64]) -> Result<CellId, CoreError> {
        match self {
            Self::Square(g) => g.cell_at(pos),
            Self::Hexagonal(g) => g.cell_at(pos),
        }
    }

    /// Neighbor ids of a cell under the configured neighborhood.
    pub fn neighbors_of(&self, id: CellId) -> Vec<CellId> {
        match self {
            Self::Square(g) => g.neighbors_of(id),
            Self::Hexagonal(g) => g.neighbors_of(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nb::NbKind;

    fn space(extent: &[f64], periodic: bool) -> Arc<Space> {
        Arc::new(Space::new(extent, periodic).unwrap())
    }

    #[test]
    fn build_dispatches_on_structure() {
        let square = Grid::build(&GridConfig::square(1), space(&[5.0, 5.0], true)).unwrap();
        assert!(matches!(square, Grid::Square(_)));

        let hex = Grid::build(
            &GridConfig::hexagonal(1).with_neighborhood(NbKind::Hexagonal, 1),
            space(&[5.0, 4.0], true),
        )
        .unwrap();
        assert!(matches!(hex, Grid::Hexagonal(_)));
    }

    #[test]
    fn structure_names_resolve() {
        assert_eq!(
            GridStructure::from_name("square").unwrap(),
            GridStructure::Square
        );
        assert_eq!(
            GridStructure::from_name("hexagonal").unwrap(),
            GridStructure::Hexagonal
        );
        assert!(matches!(
            GridStructure::from_name("triangular"),
            Err(CoreError::UnknownMode { .. })
        ));
    }

    #[test]
    fn delegation_reaches_the_variant() {
        let g = Grid::build(
            &GridConfig::square(1).with_neighborhood(NbKind::VonNeumann, 1),
            space(&[5.0, 5.0], true),
        )
        .unwrap();
        assert_eq!(g.num_cells(), 25);
        assert_eq!(g.shape(), &[5, 5]);
        assert_eq!(g.neighbors_of(CellId(13)).len(), 4);
        assert_eq!(g.cell_at(&[0.5, 0.5]).unwrap(), CellId(0));
    }

    #[test]
    fn invalid_neighborhood_distance_caught_at_build() {
        let err = Grid::build(
            &GridConfig::square(1).with_neighborhood(NbKind::Moore, 0),
            space(&[5.0, 5.0], true),
        );
        assert!(matches!(err, Err(CoreError::InvalidConfig { .. })));
    }
}
