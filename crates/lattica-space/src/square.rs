//! Square (hyper-rectangular) lattice discretization of a [`Space`].

use crate::nb::{self, NbKind, Neighborhood};
use crate::space::Space;
use lattica_core::{CellId, CoreError, MultiIndex, Position};
use smallvec::SmallVec;
use std::sync::Arc;

/// Tolerance for the "cells are square" consistency check.
const RESOLUTION_TOL: f64 = 1e-8;

/// A square lattice over a [`Space`], supporting 1 to 3 dimensions.
///
/// The shape per axis is `floor(extent_i * resolution)`; in more than
/// one dimension all effective resolutions `shape_i / extent_i` must
/// agree within `1e-8`, so every cell is a (hyper-)cube. Cells are
/// indexed row-major with axis 0 fastest.
#[derive(Clone, Debug)]
pub struct SquareGrid {
    space: Arc<Space>,
    shape: MultiIndex,
    neighborhood: Neighborhood,
}

impl SquareGrid {
    /// Discretize `space` at the given resolution with the given
    /// neighborhood.
    ///
    /// Fails with [`CoreError::InvalidConfig`] for a zero resolution,
    /// a degenerate shape, or non-square cells; with
    /// [`CoreError::Unsupported`] if the neighborhood kind does not
    /// support the space's dimensionality; and with
    /// [`CoreError::GridTooSmall`] if a periodic grid is below the
    /// `2*distance + 1` minimum for the requested neighborhood.
    pub fn new(
        space: Arc<Space>,
        resolution: u32,
        neighborhood: Neighborhood,
    ) -> Result<Self, CoreError> {
        if resolution == 0 {
            return Err(CoreError::InvalidConfig {
                key: "grid.resolution".into(),
                reason: "resolution must be a positive integer".into(),
            });
        }
        let shape = determine_shape(&space, resolution)?;
        validate_neighborhood(&neighborhood, space.dim())?;
        check_min_shape(&shape, space.periodic(), &neighborhood)?;
        Ok(Self {
            space,
            shape,
            neighborhood,
        })
    }

    /// The underlying space.
    pub fn space(&self) -> &Arc<Space> {
        &self.space
    }

    /// Cells per axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.shape.iter().product()
    }

    /// The configured neighborhood.
    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Multi-index of a cell id.
    pub fn multi_index(&self, id: CellId) -> MultiIndex {
        debug_assert!(id.index() < self.num_cells());
        nb::unravel(id, &self.shape)
    }

    /// Cell id of a multi-index.
    pub fn cell_id(&self, midx: &[usize]) -> CellId {
        nb::ravel(midx, &self.shape)
    }

    /// Barycenter of a cell: `((midx + 0.5) * extent) / shape`.
    pub fn barycenter(&self, id: CellId) -> Position {
        let midx = self.multi_index(id);
        midx.iter()
            .zip(self.space.extent())
            .zip(&self.shape)
            .map(|((&m, &e), &n)| (m as f64 + 0.5) * e / n as f64)
            .collect()
    }

    /// The `2^D` corners of a cell's axis-aligned box, enumerated in
    /// binary counting order with axis 0 fastest.
    pub fn vertices(&self, id: CellId) -> Vec<Position> {
        let midx = self.multi_index(id);
        let dim = self.space.dim();
        let low: Position = midx
            .iter()
            .zip(self.space.extent())
            .zip(&self.shape)
            .map(|((&m, &e), &n)| m as f64 * e / n as f64)
            .collect();
        let size: Position = self
            .space
            .extent()
            .iter()
            .zip(&self.shape)
            .map(|(&e, &n)| e / n as f64)
            .collect();
        (0..1usize << dim)
            .map(|corner| {
                (0..dim)
                    .map(|axis| {
                        let offset = if corner >> axis & 1 == 1 {
                            size[axis]
                        } else {
                            0.0
                        };
                        low[axis] + offset
                    })
                    .collect()
            })
            .collect()
    }

    /// The cell whose axis-aligned region contains `pos`, in O(D).
    ///
    /// Periodic spaces map the position into the box first; for
    /// non-periodic spaces an outside position fails with
    /// [`CoreError::OutOfSpace`]. Positions on the closed upper
    /// boundary resolve to the last cell of the axis.
    pub fn cell_at(&self, pos: &[f64]) -> Result<CellId, CoreError> {
        let pos = self.space.resolve_position(pos)?;
        let midx: MultiIndex = pos
            .iter()
            .zip(self.space.extent())
            .zip(&self.shape)
            .map(|((&p, &e), &n)| (((p / e) * n as f64) as usize).min(n - 1))
            .collect();
        Ok(self.cell_id(&midx))
    }

    /// Neighbor ids of a cell under the configured neighborhood.
    pub fn neighbors_of(&self, id: CellId) -> Vec<CellId> {
        let periodic = self.space.periodic();
        match self.neighborhood.kind() {
            NbKind::Empty => Vec::new(),
            NbKind::VonNeumann => {
                nb::von_neumann(id, self.neighborhood.distance(), periodic, &self.shape)
            }
            NbKind::Moore => nb::moore(id, self.neighborhood.distance(), periodic, &self.shape),
            // Rejected at construction.
            NbKind::Hexagonal => Vec::new(),
        }
    }
}

/// `shape_i = floor(extent_i * resolution)`, with the effective
/// resolutions of all axes required to agree within tolerance.
pub(crate) fn determine_shape(space: &Space, resolution: u32) -> Result<MultiIndex, CoreError> {
    let mut shape: MultiIndex = SmallVec::with_capacity(space.dim());
    for (axis, &e) in space.extent().iter().enumerate() {
        let n = (e * resolution as f64).floor() as usize;
        if n == 0 {
            return Err(CoreError::InvalidConfig {
                key: "grid.resolution".into(),
                reason: format!("axis {axis} with extent {e} yields zero cells"),
            });
        }
        shape.push(n);
    }
    let eff0 = shape[0] as f64 / space.extent()[0];
    for (axis, (&n, &e)) in shape.iter().zip(space.extent()).enumerate().skip(1) {
        let eff = n as f64 / e;
        if (eff - eff0).abs() > RESOLUTION_TOL {
            return Err(CoreError::InvalidConfig {
                key: "grid.resolution".into(),
                reason: format!(
                    "cells are not square: effective resolution {eff} on axis {axis} \
                     differs from {eff0} on axis 0"
                ),
            });
        }
    }
    Ok(shape)
}

/// Kind/dimensionality compatibility for square grids.
fn validate_neighborhood(neighborhood: &Neighborhood, dim: usize) -> Result<(), CoreError> {
    match neighborhood.kind() {
        NbKind::Empty => Ok(()),
        NbKind::VonNeumann if (1..=3).contains(&dim) => Ok(()),
        NbKind::VonNeumann => Err(CoreError::Unsupported {
            what: format!("vonNeumann neighborhood in {dim} dimensions"),
            reason: "supported for 1, 2, and 3 dimensions".into(),
        }),
        NbKind::Moore if dim == 2 => Ok(()),
        NbKind::Moore => Err(CoreError::Unsupported {
            what: format!("Moore neighborhood in {dim} dimensions"),
            reason: "supported for 2 dimensions only".into(),
        }),
        NbKind::Hexagonal => Err(CoreError::Unsupported {
            what: "hexagonal neighborhood on a square grid".into(),
            reason: "use grid structure 'hexagonal'".into(),
        }),
    }
}

/// Periodic grids must not wrap a neighborhood onto itself:
/// `min_i shape[i] >= 2*distance + 1`.
pub(crate) fn check_min_shape(
    shape: &[usize],
    periodic: bool,
    neighborhood: &Neighborhood,
) -> Result<(), CoreError> {
    if !periodic || neighborhood.kind() == NbKind::Empty {
        return Ok(());
    }
    let required = 2 * neighborhood.distance() as usize + 1;
    if shape.iter().any(|&n| n < required) {
        return Err(CoreError::GridTooSmall {
            shape: shape.to_vec(),
            distance: neighborhood.distance(),
            required,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_space(extent: &[f64], periodic: bool) -> Arc<Space> {
        Arc::new(Space::new(extent, periodic).unwrap())
    }

    fn grid_5x5(periodic: bool, kind: NbKind, distance: u32) -> SquareGrid {
        SquareGrid::new(
            unit_space(&[5.0, 5.0], periodic),
            1,
            Neighborhood::new(kind, distance).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn shape_follows_extent_and_resolution() {
        let g = SquareGrid::new(unit_space(&[2.0, 3.0], true), 4, Neighborhood::empty()).unwrap();
        assert_eq!(g.shape(), &[8, 12]);
        assert_eq!(g.num_cells(), 96);
    }

    #[test]
    fn non_square_cells_rejected() {
        // floor(2.7 * 2) = 5 cells over extent 2.7 puts axis 1 at
        // effective resolution 1.85 against 2.0 on axis 0.
        let err = SquareGrid::new(unit_space(&[1.0, 2.7], true), 2, Neighborhood::empty());
        assert!(matches!(err, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn zero_resolution_rejected() {
        assert!(SquareGrid::new(unit_space(&[1.0], true), 0, Neighborhood::empty()).is_err());
    }

    #[test]
    fn periodic_2x2_distance_1_is_too_small() {
        let err = SquareGrid::new(
            unit_space(&[2.0, 2.0], true),
            1,
            Neighborhood::new(NbKind::VonNeumann, 1).unwrap(),
        );
        assert!(matches!(err, Err(CoreError::GridTooSmall { .. })));
    }

    #[test]
    fn empty_neighborhood_on_degenerate_grid_is_fine() {
        let g = SquareGrid::new(unit_space(&[1.0, 1.0], true), 1, Neighborhood::empty()).unwrap();
        assert_eq!(g.num_cells(), 1);
        assert!(g.neighbors_of(CellId(0)).is_empty());
    }

    #[test]
    fn moore_requires_two_dimensions() {
        let err = SquareGrid::new(
            unit_space(&[5.0, 5.0, 5.0], true),
            1,
            Neighborhood::new(NbKind::Moore, 1).unwrap(),
        );
        assert!(matches!(err, Err(CoreError::Unsupported { .. })));
    }

    #[test]
    fn hexagonal_kind_rejected_on_square_grid() {
        let err = SquareGrid::new(
            unit_space(&[5.0, 5.0], true),
            1,
            Neighborhood::new(NbKind::Hexagonal, 1).unwrap(),
        );
        assert!(matches!(err, Err(CoreError::Unsupported { .. })));
    }

    #[test]
    fn barycenter_of_first_and_last_cell() {
        let g = grid_5x5(true, NbKind::Empty, 0);
        assert_eq!(g.barycenter(CellId(0)).as_slice(), &[0.5, 0.5]);
        assert_eq!(g.barycenter(CellId(24)).as_slice(), &[4.5, 4.5]);
    }

    #[test]
    fn vertices_are_the_cell_corners() {
        let g = grid_5x5(true, NbKind::Empty, 0);
        let v = g.vertices(CellId(6)); // midx (1, 1)
        assert_eq!(v.len(), 4);
        assert_eq!(v[0].as_slice(), &[1.0, 1.0]);
        assert_eq!(v[1].as_slice(), &[2.0, 1.0]);
        assert_eq!(v[2].as_slice(), &[1.0, 2.0]);
        assert_eq!(v[3].as_slice(), &[2.0, 2.0]);
    }

    #[test]
    fn cell_at_buckets_positions() {
        let g = grid_5x5(false, NbKind::Empty, 0);
        assert_eq!(g.cell_at(&[0.5, 0.5]).unwrap(), CellId(0));
        assert_eq!(g.cell_at(&[4.9, 0.1]).unwrap(), CellId(4));
        assert_eq!(g.cell_at(&[2.5, 3.5]).unwrap(), g.cell_id(&[2, 3]));
        // Closed upper boundary resolves to the last cell.
        assert_eq!(g.cell_at(&[5.0, 5.0]).unwrap(), CellId(24));
    }

    #[test]
    fn cell_at_periodic_wraps() {
        let g = grid_5x5(true, NbKind::Empty, 0);
        assert_eq!(g.cell_at(&[5.5, -0.5]).unwrap(), g.cell_id(&[0, 4]));
    }

    #[test]
    fn cell_at_non_periodic_outside_fails() {
        let g = grid_5x5(false, NbKind::Empty, 0);
        assert!(matches!(
            g.cell_at(&[5.5, 1.0]),
            Err(CoreError::OutOfSpace { .. })
        ));
    }

    #[test]
    fn neighbors_dispatch_on_kind() {
        let vn = grid_5x5(true, NbKind::VonNeumann, 1);
        let mut n = vn.neighbors_of(CellId(0));
        n.sort();
        assert_eq!(n, vec![CellId(1), CellId(4), CellId(5), CellId(20)]);

        let moore = grid_5x5(true, NbKind::Moore, 1);
        assert_eq!(moore.neighbors_of(CellId(0)).len(), 8);
    }

    proptest! {
        #[test]
        fn multi_index_round_trip(id in 0u32..96) {
            let g = SquareGrid::new(
                unit_space(&[2.0, 3.0], true),
                4,
                Neighborhood::empty(),
            ).unwrap();
            let midx = g.multi_index(CellId(id));
            prop_assert_eq!(g.cell_id(&midx), CellId(id));
        }

        #[test]
        fn barycenter_resolves_to_its_own_cell(id in 0u32..25, periodic in any::<bool>()) {
            let g = grid_5x5(periodic, NbKind::Empty, 0);
            let b = g.barycenter(CellId(id));
            prop_assert_eq!(g.cell_at(&b).unwrap(), CellId(id));
        }
    }
}
