//! Hexagonal (row-offset, pointy-top) lattice discretization of a [`Space`].

use crate::nb::{self, NbKind, Neighborhood};
use crate::space::Space;
use crate::square::{check_min_shape, determine_shape};
use lattica_core::{CellId, CoreError, MultiIndex, Position};
use std::sync::Arc;

/// A 2-D hexagonal lattice over a [`Space`].
///
/// Cells tile the box as a row-offset (brick-pattern) lattice of
/// pointy-top hexagons, indexed on the same uniform `[columns, rows]`
/// frame as the square grid: axis 0 runs along a row, axis 1 counts
/// rows, ids are row-major with axis 0 fastest.
///
/// Row-parity convention, fixed at construction: even-parity rows are
/// offset *right* (their barycenters sit a quarter cell right of the
/// column line, diagonal neighbors at column `+1`), odd rows are
/// offset *left* (diagonals at column `-1`).
///
/// Periodic hexagonal grids require an even number of rows; otherwise
/// the wrap joins two rows of equal parity and the neighbor relation
/// stops being symmetric.
#[derive(Clone, Debug)]
pub struct HexGrid {
    space: Arc<Space>,
    shape: MultiIndex,
    neighborhood: Neighborhood,
}

impl HexGrid {
    /// Discretize `space` at the given resolution with the given
    /// neighborhood.
    ///
    /// The space must be two-dimensional and the neighborhood kind
    /// `empty` or `hexagonal`; periodic grids additionally need an
    /// even row count and `min_i shape[i] >= 2*distance + 1`.
    pub fn new(
        space: Arc<Space>,
        resolution: u32,
        neighborhood: Neighborhood,
    ) -> Result<Self, CoreError> {
        if space.dim() != 2 {
            return Err(CoreError::Unsupported {
                what: format!("hexagonal grid in {} dimensions", space.dim()),
                reason: "hexagonal tessellation is two-dimensional".into(),
            });
        }
        if resolution == 0 {
            return Err(CoreError::InvalidConfig {
                key: "grid.resolution".into(),
                reason: "resolution must be a positive integer".into(),
            });
        }
        match neighborhood.kind() {
            NbKind::Empty | NbKind::Hexagonal => {}
            kind => {
                return Err(CoreError::Unsupported {
                    what: format!("{} neighborhood on a hexagonal grid", kind.name()),
                    reason: "use grid structure 'square'".into(),
                })
            }
        }
        let shape = determine_shape(&space, resolution)?;
        if space.periodic() && shape[1] % 2 != 0 {
            return Err(CoreError::InvalidConfig {
                key: "grid.resolution".into(),
                reason: format!(
                    "periodic hexagonal grid needs an even number of rows, got {}",
                    shape[1]
                ),
            });
        }
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

    /// Cells per axis: `[columns, rows]`.
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

    /// Cell width and height in space units.
    fn cell_size(&self) -> (f64, f64) {
        let e = self.space.extent();
        (e[0] / self.shape[0] as f64, e[1] / self.shape[1] as f64)
    }

    /// Horizontal parity offset of a row, in space units.
    fn row_offset(&self, row: usize, width: f64) -> f64 {
        if row % 2 == 0 {
            0.25 * width
        } else {
            -0.25 * width
        }
    }

    /// Barycenter of a cell: the square-frame center shifted a quarter
    /// cell right (even rows) or left (odd rows).
    pub fn barycenter(&self, id: CellId) -> Position {
        let midx = self.multi_index(id);
        let (w, h) = self.cell_size();
        let cx = (midx[0] as f64 + 0.5) * w + self.row_offset(midx[1], w);
        let cy = (midx[1] as f64 + 0.5) * h;
        Position::from_slice(&[cx, cy])
    }

    /// The six corners of the pointy-top hexagon, counter-clockwise
    /// from the bottom vertex.
    pub fn vertices(&self, id: CellId) -> Vec<Position> {
        let center = self.barycenter(id);
        let (cx, cy) = (center[0], center[1]);
        let (w, h) = self.cell_size();
        let (hw, qh, hh) = (0.5 * w, 0.25 * h, 0.5 * h);
        vec![
            Position::from_slice(&[cx, cy - hh]),
            Position::from_slice(&[cx + hw, cy - qh]),
            Position::from_slice(&[cx + hw, cy + qh]),
            Position::from_slice(&[cx, cy + hh]),
            Position::from_slice(&[cx - hw, cy + qh]),
            Position::from_slice(&[cx - hw, cy - qh]),
        ]
    }

    /// The cell whose row-offset region contains `pos`, in O(D).
    ///
    /// Rows are resolved by plain bucket arithmetic; the column is
    /// resolved against the row's parity offset, wrapping (periodic)
    /// or clamping (non-periodic) the quarter-cell overhang at the
    /// row's ends.
    pub fn cell_at(&self, pos: &[f64]) -> Result<CellId, CoreError> {
        let pos = self.space.resolve_position(pos)?;
        let (w, h) = self.cell_size();
        let (cols, rows) = (self.shape[0], self.shape[1]);
        let y = ((pos[1] / h) as usize).min(rows - 1);
        let x = ((pos[0] - self.row_offset(y, w)) / w).floor() as i64;
        let x = if self.space.periodic() {
            x.rem_euclid(cols as i64) as usize
        } else {
            x.clamp(0, cols as i64 - 1) as usize
        };
        Ok(self.cell_id(&[x, y]))
    }

    /// Neighbor ids of a cell under the configured neighborhood.
    pub fn neighbors_of(&self, id: CellId) -> Vec<CellId> {
        match self.neighborhood.kind() {
            NbKind::Empty => Vec::new(),
            _ => nb::hexagonal(
                id,
                self.neighborhood.distance(),
                self.space.periodic(),
                &self.shape,
            ),
        }
    }
}
