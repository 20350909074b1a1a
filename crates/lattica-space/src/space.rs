//! The continuous [`Space`]: an axis-aligned box with optional periodicity.

use lattica_core::{CoreError, Position, SimRng};
use rand::Rng;
use smallvec::SmallVec;

/// Typed configuration for a [`Space`].
///
/// Mirrors the `space` configuration block; a YAML loader is a
/// collaborator that fills this struct.
#[derive(Clone, Debug, PartialEq)]
pub struct SpaceConfig {
    /// Physical extent per axis. All components must be positive.
    pub extent: Vec<f64>,
    /// Whether opposite boundaries are identified (torus topology).
    pub periodic: bool,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            extent: vec![1.0, 1.0],
            periodic: true,
        }
    }
}

/// A continuous axis-aligned box in `R^D`, immutable after construction.
///
/// Positions are resolved against the *low* corner at the origin: the
/// box covers `[0, extent_i]` per axis. Under periodic boundaries the
/// low boundary is canonical: the upper boundary maps to `0`, so the
/// canonical image of every position is unique.
#[derive(Clone, Debug, PartialEq)]
pub struct Space {
    extent: Position,
    periodic: bool,
}

impl Space {
    /// Create a space from an extent and periodicity flag.
    ///
    /// Fails with [`CoreError::InvalidConfig`] if the extent is empty
    /// or any component is non-positive or non-finite.
    pub fn new(extent: &[f64], periodic: bool) -> Result<Self, CoreError> {
        if extent.is_empty() {
            return Err(CoreError::InvalidConfig {
                key: "space.extent".into(),
                reason: "dimensionality must be at least 1".into(),
            });
        }
        for (axis, &e) in extent.iter().enumerate() {
            if !e.is_finite() || e <= 0.0 {
                return Err(CoreError::InvalidConfig {
                    key: "space.extent".into(),
                    reason: format!("component {axis} is {e}, need a positive finite value"),
                });
            }
        }
        Ok(Self {
            extent: SmallVec::from_slice(extent),
            periodic,
        })
    }

    /// Create a space from a [`SpaceConfig`].
    pub fn from_config(cfg: &SpaceConfig) -> Result<Self, CoreError> {
        Self::new(&cfg.extent, cfg.periodic)
    }

    /// Number of spatial dimensions.
    pub fn dim(&self) -> usize {
        self.extent.len()
    }

    /// Physical extent per axis.
    pub fn extent(&self) -> &[f64] {
        &self.extent
    }

    /// Whether opposite boundaries are identified.
    pub fn periodic(&self) -> bool {
        self.periodic
    }

    /// Element-wise containment check.
    ///
    /// With `closed == true` the check is `0 <= pos_i/extent_i <= 1`;
    /// with `closed == false` the upper boundary is excluded.
    /// Positions of the wrong dimensionality are never contained.
    pub fn contains(&self, pos: &[f64], closed: bool) -> bool {
        if pos.len() != self.dim() {
            return false;
        }
        pos.iter().zip(&self.extent).all(|(&p, &e)| {
            let r = p / e;
            if closed {
                (0.0..=1.0).contains(&r)
            } else {
                (0.0..1.0).contains(&r)
            }
        })
    }

    /// Canonical image of `pos` under periodic identification.
    ///
    /// Positions already inside the half-open box are returned
    /// unchanged. Otherwise each component is reduced to its Euclidean
    /// remainder modulo the extent, which maps the upper-extent
    /// boundary to `0`. Idempotent. The remainder is taken on the raw
    /// coordinate, not on the normalized ratio, so exact multiples of
    /// the extent reduce exactly.
    ///
    /// For a non-periodic space there is no identification to apply;
    /// the position is returned as-is.
    pub fn map_into_space(&self, pos: &[f64]) -> Position {
        if !self.periodic || self.contains(pos, false) {
            return SmallVec::from_slice(pos);
        }
        pos.iter()
            .zip(&self.extent)
            .map(|(&p, &e)| {
                let v = p.rem_euclid(e);
                // rem_euclid of a tiny negative coordinate can round up
                // to exactly e; the canonical image must stay in [0, e).
                if v >= e {
                    0.0
                } else {
                    v
                }
            })
            .collect()
    }

    /// Resolve a caller-supplied position against the space.
    ///
    /// Periodic spaces map the position to its canonical image;
    /// non-periodic spaces accept positions inside the closed box and
    /// reject the rest with [`CoreError::OutOfSpace`]. The single
    /// containment policy shared by grid lookups and agent movement.
    pub fn resolve_position(&self, pos: &[f64]) -> Result<Position, CoreError> {
        if pos.len() != self.dim() {
            return Err(CoreError::InvalidConfig {
                key: "position".into(),
                reason: format!("expected {}D position, got {}D", self.dim(), pos.len()),
            });
        }
        if self.periodic {
            Ok(self.map_into_space(pos))
        } else if self.contains(pos, true) {
            Ok(SmallVec::from_slice(pos))
        } else {
            Err(CoreError::OutOfSpace {
                pos: SmallVec::from_slice(pos),
                extent: self.extent.clone(),
            })
        }
    }

    /// Sample a position uniformly from `[0, extent)` per axis.
    pub fn sample_position(&self, rng: &mut SimRng) -> Position {
        self.extent.iter().map(|&e| rng.gen_range(0.0..e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattica_core::seeded_rng;
    use proptest::prelude::*;

    #[test]
    fn new_rejects_empty_extent() {
        assert!(matches!(
            Space::new(&[], true),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn new_rejects_nonpositive_extent() {
        assert!(Space::new(&[1.0, 0.0], true).is_err());
        assert!(Space::new(&[1.0, -2.0], false).is_err());
        assert!(Space::new(&[f64::NAN, 1.0], true).is_err());
    }

    #[test]
    fn from_config_matches_new() {
        let default = Space::from_config(&SpaceConfig::default()).unwrap();
        assert_eq!(default, Space::new(&[1.0, 1.0], true).unwrap());

        let cfg = SpaceConfig {
            extent: vec![2.0, 3.0],
            periodic: false,
        };
        assert_eq!(
            Space::from_config(&cfg).unwrap(),
            Space::new(&[2.0, 3.0], false).unwrap()
        );
        assert!(Space::from_config(&SpaceConfig {
            extent: vec![],
            periodic: true,
        })
        .is_err());
    }

    #[test]
    fn resolve_position_maps_or_rejects() {
        let periodic = Space::new(&[2.0, 3.0], true).unwrap();
        assert_eq!(
            periodic.resolve_position(&[3.0, 4.0]).unwrap().as_slice(),
            &[1.0, 1.0]
        );
        assert!(matches!(
            periodic.resolve_position(&[1.0]),
            Err(CoreError::InvalidConfig { .. })
        ));

        let bounded = Space::new(&[2.0, 3.0], false).unwrap();
        // Closed boundary: the upper corner is in.
        assert_eq!(
            bounded.resolve_position(&[2.0, 3.0]).unwrap().as_slice(),
            &[2.0, 3.0]
        );
        assert!(matches!(
            bounded.resolve_position(&[2.1, 1.0]),
            Err(CoreError::OutOfSpace { .. })
        ));
    }

    #[test]
    fn contains_closed_vs_half_open() {
        let s = Space::new(&[2.0, 3.0], false).unwrap();
        assert!(s.contains(&[2.0, 3.0], true));
        assert!(!s.contains(&[2.0, 3.0], false));
        assert!(s.contains(&[0.0, 0.0], false));
        assert!(!s.contains(&[-0.1, 1.0], true));
        assert!(!s.contains(&[1.0], true)); // wrong dimensionality
    }

    #[test]
    fn map_into_space_reference_values() {
        // Scenario: extent [2, 3], periodic.
        let s = Space::new(&[2.0, 3.0], true).unwrap();
        assert_eq!(s.map_into_space(&[3.0, 4.0]).as_slice(), &[1.0, 1.0]);
        assert_eq!(s.map_into_space(&[-1.0, -1.0]).as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn upper_boundary_maps_to_zero() {
        let s = Space::new(&[2.0, 3.0], true).unwrap();
        assert_eq!(s.map_into_space(&[2.0, 3.0]).as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn non_periodic_mapping_is_identity() {
        let s = Space::new(&[2.0, 3.0], false).unwrap();
        assert_eq!(s.map_into_space(&[5.0, -1.0]).as_slice(), &[5.0, -1.0]);
    }

    #[test]
    fn sample_position_is_inside() {
        let s = Space::new(&[2.0, 3.0], true).unwrap();
        let mut rng = seeded_rng(7);
        for _ in 0..100 {
            let p = s.sample_position(&mut rng);
            assert!(s.contains(&p, false), "{p:?} escaped the box");
        }
    }

    proptest! {
        #[test]
        fn map_into_space_is_idempotent(
            x in -100.0f64..100.0,
            y in -100.0f64..100.0,
            ex in 0.1f64..10.0,
            ey in 0.1f64..10.0,
        ) {
            let s = Space::new(&[ex, ey], true).unwrap();
            let once = s.map_into_space(&[x, y]);
            let twice = s.map_into_space(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn mapped_positions_are_half_open_contained(
            x in -100.0f64..100.0,
            y in -100.0f64..100.0,
            ex in 0.1f64..10.0,
            ey in 0.1f64..10.0,
        ) {
            let s = Space::new(&[ex, ey], true).unwrap();
            let p = s.map_into_space(&[x, y]);
            prop_assert!(s.contains(&p, false), "{:?} not in [0, extent)", p);
        }
    }
}
