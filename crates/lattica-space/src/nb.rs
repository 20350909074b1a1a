//! Neighborhood algebra: the axis-shift primitive and the compound
//! neighborhood enumerations built on top of it.
//!
//! Everything here works on flat cell ids plus a grid shape; the
//! [`Grid`](crate::Grid) wraps these free functions with the
//! tessellation- and configuration-aware dispatch. All enumerations
//! are deterministic: the returned order is part of the contract and
//! stable across calls.
//!
//! Index convention: row-major with axis 0 fastest, i.e.
//! `id = sum_i midx[i] * stride[i]` with `stride[0] = 1` and
//! `stride[k] = stride[k-1] * shape[k-1]`.

use lattica_core::{CellId, CoreError, MultiIndex};
use smallvec::SmallVec;

/// The neighborhood kinds supported by the grid family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NbKind {
    /// No neighbors, ever. Valid on any grid, at any distance.
    Empty,
    /// Manhattan ball on the multi-index. Supported for `D` in 1..=3.
    VonNeumann,
    /// Chebyshev ball on the multi-index. Supported for `D == 2`.
    Moore,
    /// Six-neighbor row-offset lattice. Supported for `D == 2` on
    /// hexagonal grids only.
    Hexagonal,
}

impl NbKind {
    /// Mode names accepted by [`NbKind::from_name`].
    pub const KNOWN: &'static [&'static str] = &["empty", "vonNeumann", "Moore", "hexagonal"];

    /// Resolve a configuration mode name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "empty" => Ok(Self::Empty),
            "vonNeumann" => Ok(Self::VonNeumann),
            "Moore" => Ok(Self::Moore),
            "hexagonal" => Ok(Self::Hexagonal),
            _ => Err(CoreError::UnknownMode {
                mode: name.into(),
                known: Self::KNOWN,
            }),
        }
    }

    /// The configuration name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::VonNeumann => "vonNeumann",
            Self::Moore => "Moore",
            Self::Hexagonal => "hexagonal",
        }
    }
}

/// A neighborhood descriptor: a kind plus a lattice distance.
///
/// The descriptor is plain data; validation against a concrete grid
/// (dimensionality, tessellation, minimum shape) happens at grid
/// construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Neighborhood {
    kind: NbKind,
    distance: u32,
}

impl Neighborhood {
    /// Create a descriptor. Non-empty kinds require `distance >= 1`;
    /// [`NbKind::Empty`] forbids no argument combination.
    pub fn new(kind: NbKind, distance: u32) -> Result<Self, CoreError> {
        if kind != NbKind::Empty && distance == 0 {
            return Err(CoreError::InvalidConfig {
                key: "neighborhood.distance".into(),
                reason: format!("distance must be >= 1 for mode '{}'", kind.name()),
            });
        }
        Ok(Self { kind, distance })
    }

    /// The empty neighborhood.
    pub fn empty() -> Self {
        Self {
            kind: NbKind::Empty,
            distance: 0,
        }
    }

    /// The neighborhood kind.
    pub fn kind(&self) -> NbKind {
        self.kind
    }

    /// The lattice distance (0 for the empty kind).
    pub fn distance(&self) -> u32 {
        self.distance
    }
}

impl Default for Neighborhood {
    fn default() -> Self {
        Self::empty()
    }
}

/// Flatten a multi-index into a cell id (axis 0 fastest).
///
/// Callers must pass an in-shape multi-index; this is the inverse of
/// [`unravel`] on valid input.
pub fn ravel(midx: &[usize], shape: &[usize]) -> CellId {
    debug_assert_eq!(midx.len(), shape.len());
    let mut id = 0usize;
    let mut stride = 1usize;
    for (m, n) in midx.iter().zip(shape) {
        debug_assert!(m < n);
        id += m * stride;
        stride *= n;
    }
    CellId(id as u32)
}

/// Expand a cell id into its multi-index (axis 0 fastest).
pub fn unravel(id: CellId, shape: &[usize]) -> MultiIndex {
    let mut rest = id.index();
    let mut midx: MultiIndex = SmallVec::with_capacity(shape.len());
    for &n in shape {
        midx.push(rest % n);
        rest /= n;
    }
    midx
}

/// Apply an integer offset to a multi-index, resolving each axis
/// against the grid shape.
///
/// Out-of-range components wrap under periodic boundaries and abort
/// the candidate (`None`) otherwise.
fn apply_offset(
    midx: &[usize],
    offset: &[i64],
    periodic: bool,
    shape: &[usize],
) -> Option<MultiIndex> {
    let mut out: MultiIndex = SmallVec::with_capacity(midx.len());
    for ((&m, &o), &n) in midx.iter().zip(offset).zip(shape) {
        let v = m as i64 + o;
        let n = n as i64;
        if (0..n).contains(&v) {
            out.push(v as usize);
        } else if periodic {
            out.push(v.rem_euclid(n) as usize);
        } else {
            return None;
        }
    }
    Some(out)
}

/// The shift generator underlying all grid neighborhoods.
///
/// Emits the cells reached from `root` by shifting a single axis by
/// `delta` for `delta` in `-distance..=-1` followed by `1..=distance`.
/// Shifts crossing the boundary wrap under periodic boundaries and are
/// skipped otherwise.
pub fn neighbors_in_axis(
    root: CellId,
    axis: usize,
    distance: u32,
    periodic: bool,
    shape: &[usize],
) -> Vec<CellId> {
    let midx = unravel(root, shape);
    let d = distance as i64;
    let mut out = Vec::with_capacity(2 * distance as usize);
    let mut offset = vec![0i64; shape.len()];
    for delta in (-d..0).chain(1..=d) {
        offset[axis] = delta;
        if let Some(nb) = apply_offset(&midx, &offset, periodic, shape) {
            out.push(ravel(&nb, shape));
        }
    }
    out
}

/// Enumerate the integer offsets with L1 norm exactly `dist`.
///
/// Deterministic order: axis-major, with larger magnitudes on earlier
/// axes first and `+` before `-` per axis. The last axis absorbs the
/// remaining budget.
fn manhattan_shell(dim: usize, dist: i64) -> Vec<Vec<i64>> {
    let mut out = Vec::new();
    let mut cur = vec![0i64; dim];
    shell_rec(0, dist, &mut cur, &mut out);
    out
}

fn shell_rec(axis: usize, remaining: i64, cur: &mut Vec<i64>, out: &mut Vec<Vec<i64>>) {
    if axis == cur.len() - 1 {
        if remaining == 0 {
            out.push(cur.clone());
        } else {
            cur[axis] = remaining;
            out.push(cur.clone());
            cur[axis] = -remaining;
            out.push(cur.clone());
            cur[axis] = 0;
        }
        return;
    }
    for k in (0..=remaining).rev() {
        if k == 0 {
            cur[axis] = 0;
            shell_rec(axis + 1, remaining, cur, out);
        } else {
            cur[axis] = k;
            shell_rec(axis + 1, remaining - k, cur, out);
            cur[axis] = -k;
            shell_rec(axis + 1, remaining - k, cur, out);
            cur[axis] = 0;
        }
    }
}

/// von-Neumann neighbors of `root`: the Manhattan ball of radius
/// `distance`, root excluded.
///
/// Enumerated in shells of increasing Manhattan distance; within a
/// shell the order of [`manhattan_shell`] applies. Under periodic
/// boundaries the caller must have checked `min_i shape[i] >=
/// 2*distance + 1`, which rules out duplicate wrap images; without
/// periodicity out-of-range candidates are skipped.
pub fn von_neumann(root: CellId, distance: u32, periodic: bool, shape: &[usize]) -> Vec<CellId> {
    let midx = unravel(root, shape);
    let mut out = Vec::with_capacity(von_neumann_count(shape.len(), distance));
    for dist in 1..=distance as i64 {
        for offset in manhattan_shell(shape.len(), dist) {
            if let Some(nb) = apply_offset(&midx, &offset, periodic, shape) {
                out.push(ravel(&nb, shape));
            }
        }
    }
    out
}

/// Moore neighbors of `root` on a 2-D grid: the Chebyshev ball of
/// radius `distance`, root excluded.
///
/// Enumeration order (a contract): the `2*distance` axis-1 shifts of
/// the root, then for each of those its `2*distance` axis-0 shifts,
/// then the root's own axis-0 shifts. Boundary handling follows
/// [`neighbors_in_axis`].
pub fn moore(root: CellId, distance: u32, periodic: bool, shape: &[usize]) -> Vec<CellId> {
    debug_assert_eq!(shape.len(), 2);
    let mut out = neighbors_in_axis(root, 1, distance, periodic, shape);
    let along_axis1 = out.clone();
    for nb in along_axis1 {
        out.extend(neighbors_in_axis(nb, 0, distance, periodic, shape));
    }
    out.extend(neighbors_in_axis(root, 0, distance, periodic, shape));
    out
}

/// Hexagonal distance-1 offsets for a cell in row `y` of the
/// row-offset lattice.
///
/// Convention, fixed once: even-parity rows are offset right, so their
/// diagonal pair sits at column `+1`; odd rows carry it at column `-1`.
/// Order: E, W, N, S, then the two diagonals (upper, lower).
fn hex_offsets(y: usize) -> [[i64; 2]; 6] {
    let dx = if y % 2 == 0 { 1 } else { -1 };
    [[1, 0], [-1, 0], [0, 1], [0, -1], [dx, 1], [dx, -1]]
}

/// Hexagonal neighbors of `root` up to lattice distance `distance`.
///
/// Distance 1 yields the six parity-resolved offsets (fewer at a
/// truncated boundary). Larger distances grow the hex ball by
/// breadth-first expansion over distance-1 neighbors; discovery order
/// is the deterministic result order, root excluded.
pub fn hexagonal(root: CellId, distance: u32, periodic: bool, shape: &[usize]) -> Vec<CellId> {
    debug_assert_eq!(shape.len(), 2);
    let num_cells = shape.iter().product::<usize>();
    let mut visited = vec![false; num_cells];
    visited[root.index()] = true;
    let mut out = Vec::new();
    let mut frontier = vec![root];
    for _ in 0..distance {
        let mut next = Vec::new();
        for id in frontier {
            let midx = unravel(id, shape);
            for offset in hex_offsets(midx[1]) {
                if let Some(nb) = apply_offset(&midx, &offset, periodic, shape) {
                    let nb_id = ravel(&nb, shape);
                    if !visited[nb_id.index()] {
                        visited[nb_id.index()] = true;
                        out.push(nb_id);
                        next.push(nb_id);
                    }
                }
            }
        }
        frontier = next;
    }
    out
}

/// Expected von-Neumann neighbor count on an unbounded (or
/// sufficiently large periodic) grid.
///
/// Closed forms per dimensionality; `D` outside 1..=3 is rejected at
/// grid construction, so this is total for all reachable inputs.
pub fn von_neumann_count(dim: usize, distance: u32) -> usize {
    let d = distance as usize;
    match dim {
        1 => 2 * d,
        2 => 2 * d * (d + 1),
        3 => 2 * d * (d + 1) * (2 * d + 1) / 3 + 2 * d,
        _ => 0,
    }
}

/// Expected Moore neighbor count on an unbounded (or sufficiently
/// large periodic) 2-D grid: `(2d+1)^2 - 1`.
pub fn moore_count(distance: u32) -> usize {
    let d = distance as usize;
    (2 * d + 1) * (2 * d + 1) - 1
}
