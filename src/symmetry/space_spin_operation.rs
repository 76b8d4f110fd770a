//! Space and spin-space group operations acting on Bloch spinors.

use std::fmt;
use std::str::FromStr;

use anyhow::{self, bail, format_err};
use derive_builder::Builder;
use itertools::Itertools;
use lazy_static::lazy_static;
use nalgebra::{Matrix2, Matrix3, Rotation3, UnitQuaternion, Vector3};
use num_complex::Complex;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::symmetry::kpoint::{format_fractional, integer_offset};

#[cfg(test)]
#[path = "space_spin_operation_tests.rs"]
mod space_spin_operation_tests;

type C128 = Complex<f64>;

/// Threshold for checking the unitarity and orthogonality of spin-rotation matrices read in from
/// text, which typically carry only a handful of significant digits.
pub const SPIN_MATRIX_THRESHOLD: f64 = 1e-5;

lazy_static! {
    static ref FRACTION_RE: Regex =
        Regex::new(r"^([+-]?\d+)/(\d+)$").expect("Invalid fraction regular expression.");
}

// ================
// Enum definitions
// ================

/// An enumerated type describing how a spin rotation acts on the two collinear spin channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpinChannelRelation {
    /// The spin rotation is diagonal: up stays up and down stays down.
    Preserving,

    /// The spin rotation is anti-diagonal: up and down are swapped.
    Reversing,

    /// The spin rotation mixes the two channels.
    Mixing,
}

impl fmt::Display for SpinChannelRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinChannelRelation::Preserving => write!(f, "preserving"),
            SpinChannelRelation::Reversing => write!(f, "reversing"),
            SpinChannelRelation::Mixing => write!(f, "mixing"),
        }
    }
}

// ==================
// Struct definitions
// ==================

/// A structure for a space or spin-space group operation $`\{R|\boldsymbol{\tau}\}`$ accompanied
/// by a spin rotation and an optional complex conjugation.
///
/// The spatial rotation $`R`$ is an integer matrix over the direct-lattice basis, so that a point
/// with fractional coordinates $`\mathbf{r}`$ is mapped to $`R\mathbf{r} + \boldsymbol{\tau}`$.
/// The spin rotation is carried both as an $`SU(2)`$ matrix acting on spinor components and as
/// the corresponding $`SO(3)`$ matrix acting on spin vectors. In ordinary space groups with
/// spin-orbit coupling, the latter is simply the proper part of $`R`$ in Cartesian coordinates;
/// in spin-space groups it is independent of $`R`$.
#[derive(Builder, Clone, Debug, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct SpaceSpinOperation {
    /// The spatial rotation in the direct-lattice basis.
    pub rotation: Matrix3<i32>,

    /// The fractional translation in the direct-lattice basis.
    #[builder(default = "Vector3::zeros()")]
    pub translation: Vector3<f64>,

    /// The $`SU(2)`$ spin rotation, with spin-up as the first component.
    #[builder(default = "Matrix2::identity()")]
    pub su2: Matrix2<C128>,

    /// The $`SO(3)`$ spin-space rotation.
    #[builder(default = "Matrix3::identity()")]
    pub so3: Matrix3<f64>,

    /// Boolean indicating if this operation is composed with time reversal.
    #[builder(default = "false")]
    pub antiunitary: bool,
}

impl SpaceSpinOperationBuilder {
    fn validate(&self) -> Result<(), String> {
        let rot = self
            .rotation
            .as_ref()
            .ok_or_else(|| "No spatial rotation found.".to_string())?;
        let det = rot.map(f64::from).determinant();
        if (det.abs() - 1.0).abs() > 1e-8 {
            return Err(format!(
                "The spatial rotation has determinant {det:.3}, not ±1."
            ));
        }

        if let Some(su2) = self.su2.as_ref() {
            let unitarity = (su2.adjoint() * su2 - Matrix2::<C128>::identity())
                .iter()
                .map(|x| x.norm())
                .fold(0.0, f64::max);
            if unitarity > SPIN_MATRIX_THRESHOLD
                || (su2.determinant() - C128::new(1.0, 0.0)).norm() > SPIN_MATRIX_THRESHOLD
            {
                return Err("The spin rotation is not an SU(2) matrix.".to_string());
            }
        }

        if let Some(so3) = self.so3.as_ref() {
            let orthogonality = (so3.transpose() * so3 - Matrix3::identity()).amax();
            if orthogonality > SPIN_MATRIX_THRESHOLD
                || (so3.determinant() - 1.0).abs() > SPIN_MATRIX_THRESHOLD
            {
                return Err("The spin-space rotation is not an SO(3) matrix.".to_string());
            }
        }
        Ok(())
    }
}

impl SpaceSpinOperation {
    /// Returns a builder to construct a new space-spin operation.
    pub fn builder() -> SpaceSpinOperationBuilder {
        SpaceSpinOperationBuilder::default()
    }

    /// Returns the identity operation.
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
            su2: Matrix2::identity(),
            so3: Matrix3::identity(),
            antiunitary: false,
        }
    }

    /// Checks if this operation is the identity: unit rotations in space and spin, a lattice
    /// translation, and no time reversal. The spinor sign must be $`+1`$.
    pub fn is_identity(&self, thresh: f64) -> bool {
        !self.antiunitary
            && self.rotation == Matrix3::identity()
            && integer_offset(&self.translation, thresh).is_some()
            && (self.so3 - Matrix3::identity()).amax() <= thresh
            && max_norm_2(&(self.su2 - Matrix2::identity())) <= thresh
    }

    /// Returns the product `self · rhs`, *i.e.* `rhs` is applied first.
    ///
    /// The spin part follows $`S_1 K^{a_1} S_2 K^{a_2} = S_1 K^{a_1}(S_2) K^{a_1 + a_2}`$.
    pub fn compose(&self, rhs: &Self) -> Self {
        let rhs_su2 = if self.antiunitary {
            rhs.su2.conjugate()
        } else {
            rhs.su2
        };
        Self {
            rotation: self.rotation * rhs.rotation,
            translation: self.rotation.map(f64::from) * rhs.translation + self.translation,
            su2: self.su2 * rhs_su2,
            so3: self.so3 * rhs.so3,
            antiunitary: self.antiunitary ^ rhs.antiunitary,
        }
    }

    /// Compares this operation against a reference operation modulo lattice translations and
    /// the sign of the spinor rotation.
    ///
    /// # Returns
    ///
    /// `Some((t, s))` if `self` $`= s \cdot \{E|\mathbf{t}\}`$ `reference` with integer
    /// $`\mathbf{t}`$ and $`s = \pm 1`$, or `None` if the two operations are different.
    pub fn match_modulo_lattice(
        &self,
        reference: &Self,
        thresh: f64,
    ) -> Option<(Vector3<i32>, i8)> {
        if self.antiunitary != reference.antiunitary
            || self.rotation != reference.rotation
            || (self.so3 - reference.so3).amax() > thresh
        {
            return None;
        }
        let t = integer_offset(&(self.translation - reference.translation), thresh)?;
        let sign = if max_norm_2(&(self.su2 - reference.su2)) <= thresh {
            1
        } else if max_norm_2(&(self.su2 + reference.su2)) <= thresh {
            -1
        } else {
            return None;
        };
        Some((t, sign))
    }

    /// Returns a copy of this operation with its fractional translation reduced into $`[0, 1)`$.
    pub fn with_reduced_translation(&self, thresh: f64) -> Self {
        let mut reduced = self.clone();
        reduced.translation = self.translation.map(|x| {
            let r = x.rem_euclid(1.0);
            if r > 1.0 - thresh {
                0.0
            } else {
                r
            }
        });
        reduced
    }

    /// Returns the image $`R^{\mathsf{T}}\mathbf{v}`$ of an integer reciprocal-lattice vector.
    pub fn reciprocal_image(&self, v: &Vector3<i32>) -> Vector3<i32> {
        self.rotation.transpose() * v
    }

    /// Returns the Bloch phase $`e^{-2\pi i \mathbf{q} \cdot \boldsymbol{\tau}}`$ acquired by a plane
    /// wave of wavevector $`\mathbf{q}`$ under this operation.
    pub fn bloch_phase(&self, q: &Vector3<f64>) -> C128 {
        C128::from_polar(1.0, -2.0 * std::f64::consts::PI * q.dot(&self.translation))
    }

    /// Determines how the spin rotation acts on the two collinear spin channels.
    pub fn spin_channel_relation(&self, thresh: f64) -> SpinChannelRelation {
        let diag = self.su2[(0, 0)].norm().max(self.su2[(1, 1)].norm());
        let offdiag = self.su2[(0, 1)].norm().max(self.su2[(1, 0)].norm());
        if offdiag <= thresh {
            SpinChannelRelation::Preserving
        } else if diag <= thresh {
            SpinChannelRelation::Reversing
        } else {
            SpinChannelRelation::Mixing
        }
    }
}

impl fmt::Display for SpaceSpinOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rot_str = self
            .rotation
            .row_iter()
            .map(|row| row.iter().map(|x| format!("{x:>2}")).join(" "))
            .join("; ");
        let tau_str = self
            .translation
            .iter()
            .map(|x| format_fractional(*x, 1e-6))
            .join(", ");
        write!(
            f,
            "{{[{rot_str}] | ({tau_str})}}{}",
            if self.antiunitary { "·θ" } else { "" }
        )
    }
}

/// Parses a whitespace-separated operation line.
///
/// The accepted layouts have 13, 22 or 30 fields:
///
/// * 9 integers for the spatial rotation (row-major),
/// * 3 numbers for the translation (decimals or fractions such as `1/2`),
/// * optionally 9 numbers for the $`SO(3)`$ spin-space rotation (row-major),
/// * optionally 8 numbers for the $`SU(2)`$ spin rotation as real/imaginary pairs (row-major),
/// * a final `0` or `1` flag for time reversal.
///
/// When the $`SU(2)`$ matrix is absent it is lifted from the $`SO(3)`$ matrix.
impl FromStr for SpaceSpinOperation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split_whitespace().collect_vec();
        if !matches!(fields.len(), 13 | 22 | 30) {
            bail!(
                "Expected 13, 22 or 30 fields in operation line `{s}`, found {}.",
                fields.len()
            );
        }
        let rot_vals = fields[0..9]
            .iter()
            .map(|x| {
                x.parse::<i32>()
                    .map_err(|err| format_err!("Invalid rotation entry `{x}`: {err}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let rotation = Matrix3::from_row_slice(&rot_vals);
        let tau_vals = fields[9..12]
            .iter()
            .map(|x| parse_real(x))
            .collect::<Result<Vec<_>, _>>()?;
        let translation = Vector3::from_row_slice(&tau_vals);

        let so3 = if fields.len() >= 22 {
            let vals = fields[12..21]
                .iter()
                .map(|x| parse_real(x))
                .collect::<Result<Vec<_>, _>>()?;
            Matrix3::from_row_slice(&vals)
        } else {
            Matrix3::identity()
        };
        let su2 = if fields.len() == 30 {
            let vals = fields[21..29]
                .iter()
                .map(|x| parse_real(x))
                .collect::<Result<Vec<_>, _>>()?;
            Matrix2::new(
                C128::new(vals[0], vals[1]),
                C128::new(vals[2], vals[3]),
                C128::new(vals[4], vals[5]),
                C128::new(vals[6], vals[7]),
            )
        } else {
            lift_so3_to_su2(&so3)
        };
        let antiunitary = match fields[fields.len() - 1] {
            "0" => false,
            "1" => true,
            other => bail!("Invalid time-reversal flag `{other}`; expected `0` or `1`."),
        };

        SpaceSpinOperation::builder()
            .rotation(rotation)
            .translation(translation)
            .so3(so3)
            .su2(su2)
            .antiunitary(antiunitary)
            .build()
            .map_err(|err| format_err!("Invalid operation line `{s}`: {err}"))
    }
}

// =========
// Functions
// =========

/// Lifts an $`SO(3)`$ rotation to one of its two $`SU(2)`$ preimages,
/// $`U = \exp(-\tfrac{i}{2}\phi\,\hat{\mathbf{n}}\cdot\boldsymbol{\sigma})`$.
pub fn lift_so3_to_su2(so3: &Matrix3<f64>) -> Matrix2<C128> {
    let q = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*so3));
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    Matrix2::new(
        C128::new(w, -z),
        C128::new(-y, -x),
        C128::new(y, -x),
        C128::new(w, z),
    )
}

fn parse_real(x: &str) -> Result<f64, anyhow::Error> {
    if let Some(caps) = FRACTION_RE.captures(x) {
        let num = caps[1]
            .parse::<f64>()
            .map_err(|err| format_err!("Invalid numerator in `{x}`: {err}"))?;
        let den = caps[2]
            .parse::<f64>()
            .map_err(|err| format_err!("Invalid denominator in `{x}`: {err}"))?;
        if den == 0.0 {
            bail!("Zero denominator in `{x}`.");
        }
        Ok(num / den)
    } else {
        x.parse::<f64>()
            .map_err(|err| format_err!("Invalid real number `{x}`: {err}"))
    }
}

fn max_norm_2(m: &Matrix2<C128>) -> f64 {
    m.iter().map(|x| x.norm()).fold(0.0, f64::max)
}
