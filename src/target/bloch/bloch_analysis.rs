//! Representation matrices and characters of band blocks.

use std::fmt;

use itertools::Itertools;
use log;
use ndarray::{Array1, Array2, Axis};
use num_complex::Complex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::IrrepError;
use crate::group::little_group::LittleGroup;
use crate::target::bloch::bloch_transformation::PlaneWaveActions;
use crate::target::bloch::BandBlock;

#[cfg(test)]
#[path = "bloch_analysis_tests.rs"]
mod bloch_analysis_tests;

type C128 = Complex<f64>;

/// The number of products summed per task in parallel reductions.
const REDUCTION_CHUNK_SIZE: usize = 8192;

/// The vector length above which reductions are split into parallel chunks.
const PARALLEL_REDUCTION_THRESHOLD: usize = 1 << 16;

/// A structure for the matrices $`D_{nm}(g) = \langle\psi_n|\hat{g}\psi_m\rangle`$ of all
/// little-group operations on a band block, together with their traces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BandRepresentation {
    matrices: Vec<Array2<C128>>,
    characters: Array1<C128>,
    overlap: Array2<C128>,
}

impl BandRepresentation {
    /// Evaluates the representation matrices of a band block.
    ///
    /// # Arguments
    ///
    /// * `block` - The band block.
    /// * `little_group` - The little group of the k-point of the block.
    /// * `actions` - The plane-wave actions of the little-group operations.
    /// * `thresh` - The threshold above which non-unitarity of a representation matrix is
    /// reported.
    pub fn compute(
        block: &BandBlock,
        little_group: &LittleGroup,
        actions: &PlaneWaveActions,
        thresh: f64,
    ) -> Result<Self, IrrepError> {
        let states = block.states();
        if !states
            .kpoint()
            .is_equivalent(little_group.kpoint(), little_group.threshold())
        {
            return Err(IrrepError::input_shape(format!(
                "band states at {} cannot be analysed with the little group of {}",
                states.kpoint(),
                little_group.kpoint()
            )));
        }
        if actions.actions().len() != little_group.order() {
            return Err(IrrepError::input_shape(format!(
                "{} plane-wave actions given for {} little-group operations",
                actions.actions().len(),
                little_group.order()
            )));
        }

        let coefficients = block.coefficients();
        let bras = coefficients
            .axis_iter(Axis(0))
            .map(|state| state.iter().copied().collect_vec())
            .collect_vec();
        let m = bras.len();
        let overlap = Array2::from_shape_fn((m, m), |(n, mm)| inner(&bras[n], &bras[mm]));

        let matrices = little_group
            .operations()
            .par_iter()
            .zip(actions.actions().par_iter())
            .map(|(op, action)| {
                let transformed = action.transform(op, &coefficients);
                let kets = transformed
                    .axis_iter(Axis(0))
                    .map(|state| state.iter().copied().collect_vec())
                    .collect_vec();
                Array2::from_shape_fn((m, m), |(n, mm)| inner(&bras[n], &kets[mm]))
            })
            .collect::<Vec<_>>();

        for (g, dmat) in matrices.iter().enumerate() {
            let deviation = (dmat.t().mapv(|z| z.conj()).dot(dmat) - &overlap)
                .iter()
                .map(|z| z.norm())
                .fold(0.0, f64::max);
            if deviation > thresh {
                log::warn!(
                    "Representation matrix of operation {} ({}) on bands {}..{} deviates from \
                     unitarity by {deviation:.3e}; the block may not be invariant.",
                    g + 1,
                    little_group.operations()[g],
                    block.bands().start + 1,
                    block.bands().end
                );
            }
        }

        let characters = matrices.iter().map(|dmat| dmat.diag().sum()).collect();
        Ok(Self {
            matrices,
            characters,
            overlap,
        })
    }

    /// The representation matrices in little-group order.
    pub fn matrices(&self) -> &[Array2<C128>] {
        &self.matrices
    }

    /// The band characters $`\chi(g) = \mathrm{Tr}\,D(g)`$ in little-group order. Characters of
    /// antiunitary operations depend on the phases of the states and are informational only.
    pub fn characters(&self) -> &Array1<C128> {
        &self.characters
    }

    /// The overlap matrix $`\langle\psi_n|\psi_m\rangle`$ of the block.
    pub fn overlap(&self) -> &Array2<C128> {
        &self.overlap
    }
}

impl fmt::Display for BandRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.characters
                .iter()
                .map(|c| format!("{c:+.4}"))
                .join(", ")
        )
    }
}

/// Computes $`\sum_i a_i^* b_i`$ with compensated summation. Long vectors are reduced in
/// fixed-size chunks in parallel, and the chunk sums are combined in chunk order so that the
/// result does not depend on scheduling.
pub(crate) fn inner(a: &[C128], b: &[C128]) -> C128 {
    if a.len() > PARALLEL_REDUCTION_THRESHOLD {
        let partials = a
            .par_chunks(REDUCTION_CHUNK_SIZE)
            .zip(b.par_chunks(REDUCTION_CHUNK_SIZE))
            .map(|(x, y)| kahan_sum(x.iter().zip(y.iter()).map(|(u, v)| u.conj() * v)))
            .collect::<Vec<_>>();
        kahan_sum(partials.into_iter())
    } else {
        kahan_sum(a.iter().zip(b.iter()).map(|(u, v)| u.conj() * v))
    }
}

/// Kahan summation of complex numbers.
pub(crate) fn kahan_sum<I: Iterator<Item = C128>>(values: I) -> C128 {
    let mut sum = C128::new(0.0, 0.0);
    let mut compensation = C128::new(0.0, 0.0);
    for value in values {
        let y = value - compensation;
        let t = sum + y;
        compensation = (t - sum) - y;
        sum = t;
    }
    sum
}
