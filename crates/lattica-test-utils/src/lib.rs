//! Shared test fixtures for Lattica development.
//!
//! Standard small lattices used across the crate test suites, plus a
//! deterministic RNG helper so scenarios can name the seed they run
//! under.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use lattica_core::{seeded_rng, SimRng};
use lattica_space::{Grid, GridConfig, NbKind, Space};

/// The seed used by fixtures unless a test needs a different one.
pub const FIXTURE_SEED: u64 = 7;

/// A fresh deterministic RNG under the fixture seed.
pub fn fixture_rng() -> SimRng {
    seeded_rng(FIXTURE_SEED)
}

fn unit_square(periodic: bool) -> Arc<Space> {
    match Space::new(&[1.0, 1.0], periodic) {
        Ok(space) => Arc::new(space),
        Err(e) => panic!("fixture space rejected: {e}"),
    }
}

fn build(cfg: GridConfig, space: Arc<Space>) -> Grid {
    match Grid::build(&cfg, space) {
        Ok(grid) => grid,
        Err(e) => panic!("fixture grid rejected: {e}"),
    }
}

/// A periodic 5x5 square lattice with a von Neumann neighborhood of
/// the given distance.
pub fn periodic_square_5x5(distance: u32) -> Grid {
    build(
        GridConfig::square(5).with_neighborhood(NbKind::VonNeumann, distance),
        unit_square(true),
    )
}

/// A non-periodic 5x5 square lattice with a von Neumann neighborhood
/// of the given distance.
pub fn bounded_square_5x5(distance: u32) -> Grid {
    build(
        GridConfig::square(5).with_neighborhood(NbKind::VonNeumann, distance),
        unit_square(false),
    )
}

/// A periodic 5x5 square lattice with a Moore neighborhood of the
/// given distance.
pub fn periodic_square_5x5_moore(distance: u32) -> Grid {
    build(
        GridConfig::square(5).with_neighborhood(NbKind::Moore, distance),
        unit_square(true),
    )
}

/// A periodic hexagonal lattice with 5 columns and 4 rows.
pub fn periodic_hex_5x4() -> Grid {
    let space = match Space::new(&[1.0, 0.8], true) {
        Ok(space) => Arc::new(space),
        Err(e) => panic!("fixture space rejected: {e}"),
    };
    build(
        GridConfig::hexagonal(5).with_neighborhood(NbKind::Hexagonal, 1),
        space,
    )
}

/// A non-periodic hexagonal lattice with 5 columns and 4 rows.
pub fn bounded_hex_5x4() -> Grid {
    let space = match Space::new(&[1.0, 0.8], false) {
        Ok(space) => Arc::new(space),
        Err(e) => panic!("fixture space rejected: {e}"),
    };
    build(
        GridConfig::hexagonal(5).with_neighborhood(NbKind::Hexagonal, 1),
        space,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_shapes_are_as_advertised() {
        assert_eq!(periodic_square_5x5(1).shape(), &[5, 5]);
        assert_eq!(periodic_hex_5x4().shape(), &[5, 4]);
        assert_eq!(bounded_hex_5x4().num_cells(), 20);
    }

    #[test]
    fn fixture_rng_is_deterministic() {
        use rand::Rng;
        let a: u64 = fixture_rng().gen();
        let b: u64 = fixture_rng().gen();
        assert_eq!(a, b);
    }
}
