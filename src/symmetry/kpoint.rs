//! Crystal momenta in the reciprocal-lattice basis.

use std::fmt;

use fraction;
use itertools::Itertools;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "kpoint_tests.rs"]
mod kpoint_tests;

type F = fraction::Fraction;

/// The largest denominator tried when rationalising fractional coordinates for display.
const MAX_DENOMINATOR: i64 = 24;

/// A structure representing a crystal momentum $`\mathbf{k}`$ given in fractional coordinates of
/// the reciprocal-lattice basis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KPoint {
    /// The fractional coordinates of the k-point.
    pub coordinates: Vector3<f64>,
}

impl KPoint {
    /// Constructs a k-point from its three fractional coordinates.
    pub fn new(k1: f64, k2: f64, k3: f64) -> Self {
        Self {
            coordinates: Vector3::new(k1, k2, k3),
        }
    }

    /// Checks if this k-point differs from `other` by a reciprocal-lattice vector.
    pub fn is_equivalent(&self, other: &Self, thresh: f64) -> bool {
        integer_offset(&(self.coordinates - other.coordinates), thresh).is_some()
    }

    /// Checks if this k-point is equivalent to $`\Gamma`$.
    pub fn is_gamma(&self, thresh: f64) -> bool {
        integer_offset(&self.coordinates, thresh).is_some()
    }

    /// Checks if this k-point is invariant under time reversal, *i.e.* if $`\mathbf{k} \equiv
    /// -\mathbf{k}`$.
    pub fn is_time_reversal_invariant(&self, thresh: f64) -> bool {
        integer_offset(&(2.0 * self.coordinates), thresh).is_some()
    }

    /// Returns a short human-readable label for this k-point: `Γ` for the zone centre, or the
    /// rationalised fractional coordinates otherwise.
    pub fn label(&self, thresh: f64) -> String {
        if self.is_gamma(thresh) {
            "Γ".to_string()
        } else {
            format!(
                "({})",
                self.coordinates
                    .iter()
                    .map(|x| format_fractional(*x, thresh))
                    .join(", ")
            )
        }
    }
}

impl fmt::Display for KPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "k = ({})",
            self.coordinates.iter().map(|x| format!("{x:+.6}")).join(", ")
        )
    }
}

/// Returns the nearest integer vector to `v` if every component of `v` lies within `thresh` of an
/// integer, and `None` otherwise.
pub(crate) fn integer_offset(v: &Vector3<f64>, thresh: f64) -> Option<Vector3<i32>> {
    let rounded = v.map(f64::round);
    if (v - rounded).amax() <= thresh {
        Some(rounded.map(|x| x as i32))
    } else {
        None
    }
}

/// Formats a real number as a small-denominator fraction if it is one to within `thresh`, or as
/// a decimal otherwise.
pub(crate) fn format_fractional(x: f64, thresh: f64) -> String {
    (1..=MAX_DENOMINATOR)
        .find_map(|den| {
            let num = (x * den as f64).round();
            if (x * den as f64 - num).abs() <= thresh * den as f64 {
                let frac = if num < 0.0 {
                    F::new_neg((-num) as u64, den as u64)
                } else {
                    F::new(num as u64, den as u64)
                };
                Some(frac.to_string())
            } else {
                None
            }
        })
        .unwrap_or_else(|| format!("{x:.6}"))
}
