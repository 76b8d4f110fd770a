//! Action of little-group operations on plane-wave expansions.

use itertools::Itertools;
use log;
use nalgebra::Vector3;
use ndarray::{Array2, Array3, ArrayView3};
use num_complex::Complex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::IrrepError;
use crate::group::little_group::LittleGroup;
use crate::symmetry::kpoint::KPoint;
use crate::symmetry::space_spin_operation::SpaceSpinOperation;
use crate::target::bloch::PlaneWaveBasis;

#[cfg(test)]
#[path = "bloch_transformation_tests.rs"]
mod bloch_transformation_tests;

type C128 = Complex<f64>;

/// The number of plane waves checked per operation when validating supplied tables.
const VERIFICATION_SAMPLE_SIZE: usize = 64;

// ==================
// Struct definitions
// ==================

/// A structure for the action of one operation $`g = \{R|\boldsymbol{\tau}\}K^{a}`$ on the plane
/// waves of a Bloch state at $`\mathbf{k}`$.
///
/// With $`\Delta\mathbf{k} = R^{\mathsf{T}}\mathbf{k} - (-1)^{a}\mathbf{k}`$, the transformed
/// state has coefficients
/// ```math
/// (\hat{g}c)(\mathbf{G}) = e^{-2\pi i (\mathbf{k} + \mathbf{G})\cdot\boldsymbol{\tau}}\,
///     S\,K^{a}\big[c(\pi_g(\mathbf{G}))\big],
/// \qquad
/// \pi_g(\mathbf{G}) = (-1)^{a}\left(R^{\mathsf{T}}\mathbf{G} + \Delta\mathbf{k}\right).
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneWaveAction {
    /// $`\pi_g(i)`$ for every plane wave $`i`$.
    permutation: Vec<usize>,

    /// $`e^{-2\pi i (\mathbf{k} + \mathbf{G}_i)\cdot\boldsymbol{\tau}}`$ for every plane wave
    /// $`i`$.
    gphases: Vec<C128>,
}

impl PlaneWaveAction {
    /// Computes the plane-wave action of an operation.
    ///
    /// # Errors
    ///
    /// Errors with [`crate::analysis::IrrepErrorKind::IncompletePlaneWaveBasis`] if the image of
    /// a kept plane wave is not in the basis.
    pub fn new(
        op: &SpaceSpinOperation,
        k_offset: &Vector3<i32>,
        kpoint: &KPoint,
        basis: &PlaneWaveBasis,
    ) -> Result<Self, IrrepError> {
        let sign = if op.antiunitary { -1 } else { 1 };
        let permutation = basis
            .gvectors()
            .iter()
            .enumerate()
            .map(|(i, g)| {
                let image = (op.reciprocal_image(g) + k_offset) * sign;
                basis.position(&image).ok_or_else(|| {
                    IrrepError::incomplete_basis(format!(
                        "operation {op} maps plane wave {i} at G = ({}) onto ({}), which is not \
                         in the basis",
                        g.iter().join(", "),
                        image.iter().join(", ")
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let gphases = basis
            .gvectors()
            .iter()
            .map(|g| op.bloch_phase(&(kpoint.coordinates + g.map(f64::from))))
            .collect_vec();
        Ok(Self {
            permutation,
            gphases,
        })
    }

    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    pub fn gphases(&self) -> &[C128] {
        &self.gphases
    }

    /// Applies this action to the coefficients of a set of states with shape
    /// `(m, ncomps, npw)`. The spin rotation of `op` is applied only to spinors.
    pub fn transform(
        &self,
        op: &SpaceSpinOperation,
        coefficients: &ArrayView3<C128>,
    ) -> Array3<C128> {
        let (nstates, ncomps, npw) = coefficients.dim();
        let cc = |z: C128| if op.antiunitary { z.conj() } else { z };
        Array3::from_shape_fn((nstates, ncomps, npw), |(n, s, i)| {
            let j = self.permutation[i];
            let rotated = if ncomps == 2 {
                op.su2[(s, 0)] * cc(coefficients[(n, 0, j)])
                    + op.su2[(s, 1)] * cc(coefficients[(n, 1, j)])
            } else {
                cc(coefficients[(n, s, j)])
            };
            self.gphases[i] * rotated
        })
    }
}

/// A structure for the plane-wave actions of all operations of a little group.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaneWaveActions {
    actions: Vec<PlaneWaveAction>,
}

impl PlaneWaveActions {
    /// Computes the plane-wave actions of all operations of `little_group` on `basis`.
    pub fn new(little_group: &LittleGroup, basis: &PlaneWaveBasis) -> Result<Self, IrrepError> {
        let actions = little_group
            .operations()
            .par_iter()
            .zip(little_group.k_offsets().par_iter())
            .map(|(op, offset)| PlaneWaveAction::new(op, offset, little_group.kpoint(), basis))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "Plane-wave permutations of {} operations computed over {} plane waves.",
            actions.len(),
            basis.len()
        );
        Ok(Self { actions })
    }

    /// Adopts externally precomputed plane-wave tables without recomputing them. Only the shapes
    /// and the permutation ranges are checked.
    pub fn from_supplied(
        supplied: &SuppliedPlaneWaveTables,
        little_group: &LittleGroup,
        basis: &PlaneWaveBasis,
    ) -> Result<Self, IrrepError> {
        let shape = (little_group.order(), basis.len());
        if supplied.gphases.dim() != shape || supplied.permutations.dim() != shape {
            return Err(IrrepError::input_shape(format!(
                "supplied plane-wave tables have shapes {:?} and {:?}, expected {shape:?}",
                supplied.gphases.dim(),
                supplied.permutations.dim()
            )));
        }
        let actions = supplied
            .permutations
            .outer_iter()
            .zip(supplied.gphases.outer_iter())
            .enumerate()
            .map(|(g, (perm, phases))| {
                if let Some(&j) = perm.iter().find(|&&j| j >= shape.1) {
                    Err(IrrepError::input_shape(format!(
                        "supplied permutation of operation {g} refers to plane wave {j} of {}",
                        shape.1
                    )))
                } else {
                    Ok(PlaneWaveAction {
                        permutation: perm.to_vec(),
                        gphases: phases.to_vec(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { actions })
    }

    pub fn actions(&self) -> &[PlaneWaveAction] {
        &self.actions
    }

    /// Checks externally precomputed plane-wave tables against the computed ones on a
    /// deterministic sample of plane waves.
    ///
    /// # Errors
    ///
    /// Errors with [`crate::analysis::IrrepErrorKind::InputShape`] if the supplied tables have
    /// the wrong shape or disagree with the computed ones beyond `thresh`.
    pub fn verify_supplied(
        &self,
        supplied: &SuppliedPlaneWaveTables,
        little_group: &LittleGroup,
        thresh: f64,
    ) -> Result<(), IrrepError> {
        let nops = self.actions.len();
        let npw = self.actions.first().map(|a| a.permutation.len()).unwrap_or(0);
        if supplied.gphases.dim() != (nops, npw) || supplied.permutations.dim() != (nops, npw) {
            return Err(IrrepError::input_shape(format!(
                "supplied plane-wave tables have shapes {:?} and {:?}, expected ({nops}, {npw})",
                supplied.gphases.dim(),
                supplied.permutations.dim()
            )));
        }
        if let Some(phase_factors) = supplied.phase_factors.as_ref() {
            if phase_factors.len() != nops {
                return Err(IrrepError::input_shape(format!(
                    "{} phase factors supplied for {nops} operations",
                    phase_factors.len()
                )));
            }
            for (g, op) in little_group.operations().iter().enumerate() {
                let expected = op.bloch_phase(&little_group.kpoint().coordinates);
                if (phase_factors[g] - expected).norm() > thresh {
                    return Err(IrrepError::input_shape(format!(
                        "supplied phase factor of operation {g} ({op}) is {:.6}, expected {expected:.6}",
                        phase_factors[g]
                    )));
                }
            }
        }

        let stride = (npw / VERIFICATION_SAMPLE_SIZE).max(1);
        for (g, action) in self.actions.iter().enumerate() {
            for i in (0..npw).step_by(stride) {
                if supplied.permutations[(g, i)] != action.permutation[i] {
                    return Err(IrrepError::input_shape(format!(
                        "supplied permutation of operation {g} sends plane wave {i} to {}, \
                         expected {}",
                        supplied.permutations[(g, i)],
                        action.permutation[i]
                    )));
                }
                if (supplied.gphases[(g, i)] - action.gphases[i]).norm() > thresh {
                    return Err(IrrepError::input_shape(format!(
                        "supplied G-phase of operation {g} at plane wave {i} is {:.6}, expected {:.6}",
                        supplied.gphases[(g, i)],
                        action.gphases[i]
                    )));
                }
            }
        }
        log::debug!(
            "Supplied plane-wave tables agree with the computed ones on every {stride}-th plane wave."
        );
        Ok(())
    }
}

/// A structure for plane-wave tables precomputed outside this crate, one row per little-group
/// operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuppliedPlaneWaveTables {
    /// Optional per-operation phases $`e^{-2\pi i \mathbf{k}\cdot\boldsymbol{\tau}}`$.
    pub phase_factors: Option<Vec<C128>>,

    /// G-phases with shape $`|L| \times n_{\mathrm{pw}}`$.
    pub gphases: Array2<C128>,

    /// Zero-based plane-wave permutations with shape $`|L| \times n_{\mathrm{pw}}`$.
    pub permutations: Array2<usize>,
}
