//! The [`CellManager`]: owner of the dense cell container.

use crate::cell::Cell;
use crate::select::{Boundary, SelectMode};
use lattica_core::{CellId, CoreError, Entity, Position, SimRng};
use lattica_space::Grid;
use rand::seq::index::sample;
use rand::Rng;

/// Owns the cells of a [`Grid`] and enforces the id/index invariant.
///
/// Cells are built in bulk at construction, one per grid cell, with
/// `cells()[i].id() == CellId(i)` for all `i`; they are never
/// destroyed. Neighborhood queries go through the grid, optionally
/// served from a cache built once per manager.
#[derive(Clone, Debug)]
pub struct CellManager<S> {
    grid: Grid,
    cells: Vec<Cell<S>>,
    nb_cache: Option<Vec<Vec<CellId>>>,
}

impl<S> CellManager<S> {
    /// Build the manager, constructing one state per cell.
    ///
    /// `init` receives the cell id and the shared RNG; closures that
    /// ignore either argument cover construction from configuration
    /// alone. See [`with_default`](Self::with_default) and
    /// [`with_state`](Self::with_state) for the remaining state
    /// construction capabilities.
    pub fn new(grid: Grid, rng: &mut SimRng, mut init: impl FnMut(CellId, &mut SimRng) -> S) -> Self {
        let num_cells = grid.num_cells();
        let cells = (0..num_cells)
            .map(|i| {
                let id = CellId(i as u32);
                Cell::new(id, init(id, rng))
            })
            .collect();
        Self {
            grid,
            cells,
            nb_cache: None,
        }
    }

    /// Build the manager with default-constructed states.
    pub fn with_default(grid: Grid) -> Self
    where
        S: Default,
    {
        let num_cells = grid.num_cells();
        let cells = (0..num_cells)
            .map(|i| Cell::new(CellId(i as u32), S::default()))
            .collect();
        Self {
            grid,
            cells,
            nb_cache: None,
        }
    }

    /// Build the manager with one explicit state cloned into every cell.
    pub fn with_state(grid: Grid, state: S) -> Self
    where
        S: Clone,
    {
        let num_cells = grid.num_cells();
        let cells = (0..num_cells)
            .map(|i| Cell::new(CellId(i as u32), state.clone()))
            .collect();
        Self {
            grid,
            cells,
            nb_cache: None,
        }
    }

    /// The grid this manager discretizes.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Non-mutable view of all cells, in id order.
    pub fn cells(&self) -> &[Cell<S>] {
        &self.cells
    }

    /// Mutable view of all cells, in id order. The rule engine iterates
    /// this slice.
    pub fn cells_mut(&mut self) -> &mut [Cell<S>] {
        &mut self.cells
    }

    /// Number of cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// The cell with the given id.
    pub fn cell(&self, id: CellId) -> &Cell<S> {
        &self.cells[id.index()]
    }

    /// The cell whose region contains `pos`.
    pub fn cell_at(&self, pos: &[f64]) -> Result<CellId, CoreError> {
        self.grid.cell_at(pos)
    }

    /// Precompute the neighbor lists of all cells.
    ///
    /// [`neighbors_of`](Self::neighbors_of) computes on the fly until
    /// this has been called once.
    pub fn cache_neighborhoods(&mut self) {
        if self.nb_cache.is_none() {
            let cache = (0..self.cells.len())
                .map(|i| self.grid.neighbors_of(CellId(i as u32)))
                .collect();
            self.nb_cache = Some(cache);
        }
    }

    /// Neighbor ids of a cell under the grid's neighborhood.
    pub fn neighbors_of(&self, id: CellId) -> Vec<CellId> {
        match &self.nb_cache {
            Some(cache) => cache[id.index()].clone(),
            None => self.grid.neighbors_of(id),
        }
    }

    /// Select a subset of cells under a named strategy.
    ///
    /// Returned ids are in ascending order for the deterministic modes
    /// (`Boundary`, `Lanes`, `ClusteredSimple`, `Probability`,
    /// `Sample`); `Position` yields one id per query position, in
    /// query order.
    pub fn select_cells(&self, mode: &SelectMode, rng: &mut SimRng) -> Result<Vec<CellId>, CoreError> {
        match mode {
            SelectMode::Sample { num_cells } => self.select_sample(*num_cells, rng),
            SelectMode::Probability { p } => self.select_probability(*p, rng),
            SelectMode::Position { positions } => self.select_positions(positions),
            SelectMode::Boundary { boundary } => self.select_boundary(*boundary),
            SelectMode::Lanes {
                num_vertical,
                num_horizontal,
            } => self.select_lanes(*num_vertical, *num_horizontal),
            SelectMode::ClusteredSimple {
                p_seed,
                p_grow,
                passes,
            } => self.select_clustered(*p_seed, *p_grow, *passes, rng),
        }
    }

    /// Select all cells satisfying a predicate, in id order.
    pub fn select_cells_where(&self, pred: impl Fn(&Cell<S>) -> bool) -> Vec<CellId> {
        self.cells.iter().filter(|c| pred(c)).map(Cell::id).collect()
    }

    /// Select under `mode` and mutate each selected cell's state.
    ///
    /// The usual way to seed a kind into part of the lattice, for
    /// example marking infection sources or blocking out inert
    /// regions. Returns the selection size.
    pub fn for_selected(
        &mut self,
        mode: &SelectMode,
        rng: &mut SimRng,
        mut f: impl FnMut(&mut S),
    ) -> Result<usize, CoreError> {
        let selected = self.select_cells(mode, rng)?;
        for id in &selected {
            f(self.cells[id.index()].state_mut());
        }
        Ok(selected.len())
    }

    /// Bulk-initialize cell states from a tabular column.
    ///
    /// `values` must hold exactly one entry per cell, in id order
    /// ([`CoreError::LengthMismatch`] otherwise). The mapper is applied
    /// to every value before any state is written, so an
    /// out-of-domain value ([`CoreError::InvalidValue`]) leaves the
    /// manager untouched.
    pub fn set_cell_states<T>(
        &mut self,
        values: &[T],
        mut mapper: impl FnMut(&T) -> Result<S, CoreError>,
    ) -> Result<(), CoreError> {
        if values.len() != self.cells.len() {
            return Err(CoreError::LengthMismatch {
                expected: self.cells.len(),
                got: values.len(),
            });
        }
        let states: Vec<S> = values.iter().map(&mut mapper).collect::<Result<_, _>>()?;
        for (cell, state) in self.cells.iter_mut().zip(states) {
            *cell.state_mut() = state;
        }
        Ok(())
    }

    fn select_sample(&self, num_cells: usize, rng: &mut SimRng) -> Result<Vec<CellId>, CoreError> {
        if num_cells > self.cells.len() {
            return Err(CoreError::InvalidConfig {
                key: "select.num_cells".into(),
                reason: format!(
                    "cannot sample {num_cells} cells from a population of {}",
                    self.cells.len()
                ),
            });
        }
        let mut ids: Vec<CellId> = sample(rng, self.cells.len(), num_cells)
            .into_iter()
            .map(|i| CellId(i as u32))
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn select_probability(&self, p: f64, rng: &mut SimRng) -> Result<Vec<CellId>, CoreError> {
        check_probability(p, "select.p")?;
        Ok(self
            .cells
            .iter()
            .filter(|_| rng.gen_bool(p))
            .map(Cell::id)
            .collect())
    }

    fn select_positions(&self, positions: &[Position]) -> Result<Vec<CellId>, CoreError> {
        positions.iter().map(|p| self.grid.cell_at(p)).collect()
    }

    fn select_boundary(&self, boundary: Boundary) -> Result<Vec<CellId>, CoreError> {
        let shape = self.grid.shape();
        if shape.len() != 2 {
            return Err(CoreError::Unsupported {
                what: "boundary selection".into(),
                reason: format!("requires a 2-D grid, got {} dimensions", shape.len()),
            });
        }
        let (nx, ny) = (shape[0], shape[1]);
        let on_boundary = |x: usize, y: usize| match boundary {
            Boundary::Bottom => y == 0,
            Boundary::Top => y == ny - 1,
            Boundary::Left => x == 0,
            Boundary::Right => x == nx - 1,
            Boundary::All => x == 0 || x == nx - 1 || y == 0 || y == ny - 1,
        };
        Ok(self
            .cells
            .iter()
            .filter(|c| {
                let m = self.grid.multi_index(c.id());
                on_boundary(m[0], m[1])
            })
            .map(Cell::id)
            .collect())
    }

    fn select_lanes(
        &self,
        num_vertical: usize,
        num_horizontal: usize,
    ) -> Result<Vec<CellId>, CoreError> {
        let shape = self.grid.shape();
        if shape.len() != 2 {
            return Err(CoreError::Unsupported {
                what: "lane selection".into(),
                reason: format!("requires a 2-D grid, got {} dimensions", shape.len()),
            });
        }
        let (nx, ny) = (shape[0], shape[1]);
        if num_vertical > nx || num_horizontal > ny {
            return Err(CoreError::InvalidConfig {
                key: "select.lanes".into(),
                reason: format!(
                    "requested {num_vertical} vertical / {num_horizontal} horizontal lanes \
                     on a {nx}x{ny} grid"
                ),
            });
        }
        let mut mask = vec![false; self.cells.len()];
        for j in 0..num_vertical {
            let x = j * nx / num_vertical;
            for y in 0..ny {
                mask[self.grid.cell_id(&[x, y]).index()] = true;
            }
        }
        for j in 0..num_horizontal {
            let y = j * ny / num_horizontal;
            for x in 0..nx {
                mask[self.grid.cell_id(&[x, y]).index()] = true;
            }
        }
        Ok(mask
            .iter()
            .enumerate()
            .filter(|(_, &m)| m)
            .map(|(i, _)| CellId(i as u32))
            .collect())
    }

    fn select_clustered(
        &self,
        p_seed: f64,
        p_grow: f64,
        passes: u32,
        rng: &mut SimRng,
    ) -> Result<Vec<CellId>, CoreError> {
        check_probability(p_seed, "select.p_seed")?;
        check_probability(p_grow, "select.p_grow")?;
        let mut selected = vec![false; self.cells.len()];
        for flag in selected.iter_mut() {
            *flag = rng.gen_bool(p_seed);
        }
        for _ in 0..passes {
            let snapshot: Vec<usize> = selected
                .iter()
                .enumerate()
                .filter(|(_, &s)| s)
                .map(|(i, _)| i)
                .collect();
            for i in snapshot {
                for nb in self.neighbors_of(CellId(i as u32)) {
                    if !selected[nb.index()] && rng.gen_bool(p_grow) {
                        selected[nb.index()] = true;
                    }
                }
            }
        }
        Ok(selected
            .iter()
            .enumerate()
            .filter(|(_, &s)| s)
            .map(|(i, _)| CellId(i as u32))
            .collect())
    }
}

fn check_probability(p: f64, key: &str) -> Result<(), CoreError> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(CoreError::InvalidValue {
            value: p.to_string(),
            domain: format!("{key} must lie in [0, 1]"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattica_core::seeded_rng;
    use lattica_space::{GridConfig, NbKind, Space};
    use smallvec::smallvec;
    use std::sync::Arc;

    fn grid_5x5(periodic: bool, kind: NbKind) -> Grid {
        let space = Arc::new(Space::new(&[5.0, 5.0], periodic).unwrap());
        Grid::build(&GridConfig::square(1).with_neighborhood(kind, 1), space).unwrap()
    }

    fn manager_5x5(periodic: bool) -> CellManager<u32> {
        CellManager::with_default(grid_5x5(periodic, NbKind::VonNeumann))
    }

    #[test]
    fn ids_are_dense_and_match_indices() {
        let cm = manager_5x5(true);
        for (i, cell) in cm.cells().iter().enumerate() {
            assert_eq!(cell.id().index(), i);
            let midx = cm.grid().multi_index(cell.id());
            assert_eq!(cm.grid().cell_id(&midx), cell.id());
        }
    }

    #[test]
    fn init_closure_sees_ids_and_rng() {
        let mut rng = seeded_rng(3);
        let cm = CellManager::new(grid_5x5(true, NbKind::Empty), &mut rng, |id, rng| {
            id.0 + rng.gen_range(0..2)
        });
        assert_eq!(cm.num_cells(), 25);
        for cell in cm.cells() {
            let v = *cell.state();
            assert!(v == cell.id().0 || v == cell.id().0 + 1);
        }
    }

    #[test]
    fn cached_and_uncached_neighbors_agree() {
        let mut cm = manager_5x5(true);
        let plain: Vec<_> = (0..25).map(|i| cm.neighbors_of(CellId(i))).collect();
        cm.cache_neighborhoods();
        for (i, expected) in plain.iter().enumerate() {
            assert_eq!(&cm.neighbors_of(CellId(i as u32)), expected);
        }
    }

    #[test]
    fn sample_respects_size_and_population() {
        let cm = manager_5x5(true);
        let mut rng = seeded_rng(1);
        let s = cm
            .select_cells(&SelectMode::Sample { num_cells: 10 }, &mut rng)
            .unwrap();
        assert_eq!(s.len(), 10);
        assert!(s.windows(2).all(|w| w[0] < w[1]), "sorted, no duplicates");

        assert!(cm
            .select_cells(&SelectMode::Sample { num_cells: 26 }, &mut rng)
            .is_err());
    }

    #[test]
    fn probability_edges() {
        let cm = manager_5x5(true);
        let mut rng = seeded_rng(1);
        let none = cm
            .select_cells(&SelectMode::Probability { p: 0.0 }, &mut rng)
            .unwrap();
        assert!(none.is_empty());
        let all = cm
            .select_cells(&SelectMode::Probability { p: 1.0 }, &mut rng)
            .unwrap();
        assert_eq!(all.len(), 25);
        assert!(cm
            .select_cells(&SelectMode::Probability { p: 1.5 }, &mut rng)
            .is_err());
    }

    #[test]
    fn position_selection_resolves_each_query() {
        let cm = manager_5x5(false);
        let mut rng = seeded_rng(1);
        let s = cm
            .select_cells(
                &SelectMode::Position {
                    positions: vec![smallvec![0.5, 0.5], smallvec![4.5, 4.5]],
                },
                &mut rng,
            )
            .unwrap();
        assert_eq!(s, vec![CellId(0), CellId(24)]);
    }

    #[test]
    fn boundary_selection_5x5() {
        let cm = manager_5x5(false);
        let mut rng = seeded_rng(1);
        let bottom = cm
            .select_cells(
                &SelectMode::Boundary {
                    boundary: Boundary::Bottom,
                },
                &mut rng,
            )
            .unwrap();
        assert_eq!(bottom, (0..5).map(CellId).collect::<Vec<_>>());

        let all = cm
            .select_cells(
                &SelectMode::Boundary {
                    boundary: Boundary::All,
                },
                &mut rng,
            )
            .unwrap();
        assert_eq!(all.len(), 16); // 25 - 9 interior
    }

    #[test]
    fn lanes_are_evenly_spaced() {
        let cm = manager_5x5(true);
        let mut rng = seeded_rng(1);
        let s = cm
            .select_cells(
                &SelectMode::Lanes {
                    num_vertical: 1,
                    num_horizontal: 1,
                },
                &mut rng,
            )
            .unwrap();
        // Column 0 plus row 0, overlapping at cell 0.
        assert_eq!(s.len(), 9);
        assert!(s.contains(&CellId(0)));
        assert!(s.contains(&CellId(20))); // column 0, top row
        assert!(s.contains(&CellId(4))); // row 0, right edge

        assert!(cm
            .select_cells(
                &SelectMode::Lanes {
                    num_vertical: 6,
                    num_horizontal: 0,
                },
                &mut rng,
            )
            .is_err());
    }

    #[test]
    fn clustered_simple_grows_from_seeds() {
        let cm = manager_5x5(true);
        let mode = SelectMode::ClusteredSimple {
            p_seed: 0.2,
            p_grow: 0.8,
            passes: 2,
        };
        let seeds_only = SelectMode::ClusteredSimple {
            p_seed: 0.2,
            p_grow: 0.0,
            passes: 2,
        };
        let grown = cm.select_cells(&mode, &mut seeded_rng(9)).unwrap();
        let seeds = cm.select_cells(&seeds_only, &mut seeded_rng(9)).unwrap();
        assert!(grown.len() >= seeds.len());

        // Deterministic under a fixed seed.
        let again = cm.select_cells(&mode, &mut seeded_rng(9)).unwrap();
        assert_eq!(grown, again);
    }

    #[test]
    fn condition_selection_is_a_predicate() {
        let mut cm = manager_5x5(true);
        for cell in cm.cells_mut() {
            *cell.state_mut() = cell.id().0 % 3;
        }
        let s = cm.select_cells_where(|c| *c.state() == 0);
        assert_eq!(s.len(), 9);
        assert!(s.iter().all(|id| id.0 % 3 == 0));
    }

    #[test]
    fn for_selected_writes_kinds() {
        let mut cm = manager_5x5(true);
        let mut rng = seeded_rng(4);
        let n = cm
            .for_selected(&SelectMode::Sample { num_cells: 5 }, &mut rng, |s| *s = 7)
            .unwrap();
        assert_eq!(n, 5);
        assert_eq!(cm.cells().iter().filter(|c| *c.state() == 7).count(), 5);
    }

    #[test]
    fn set_cell_states_checks_length_and_domain() {
        let mut cm = manager_5x5(true);
        let short = vec![1.0; 24];
        assert!(matches!(
            cm.set_cell_states(&short, |&v| Ok(v as u32)),
            Err(CoreError::LengthMismatch { .. })
        ));

        // Out-of-domain value must leave every state untouched.
        let mut values = vec![1.0; 25];
        values[13] = -1.0;
        let err = cm.set_cell_states(&values, |&v| {
            if v < 0.0 {
                Err(CoreError::InvalidValue {
                    value: v.to_string(),
                    domain: "non-negative".into(),
                })
            } else {
                Ok(v as u32)
            }
        });
        assert!(matches!(err, Err(CoreError::InvalidValue { .. })));
        assert!(cm.cells().iter().all(|c| *c.state() == 0));

        values[13] = 2.0;
        cm.set_cell_states(&values, |&v| Ok(v as u32)).unwrap();
        assert_eq!(*cm.cell(CellId(13)).state(), 2);
    }
}
