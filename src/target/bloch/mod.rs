//! Bloch states expanded in plane waves.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use derive_builder::Builder;
use itertools::Itertools;
use log;
use nalgebra::Vector3;
use ndarray::{s, Array1, Array2, Array3, ArrayView3};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::analysis::IrrepError;
use crate::symmetry::kpoint::KPoint;

pub mod bloch_analysis;
pub mod bloch_transformation;


#[cfg(test)]
pub(crate) mod template_states;

type C128 = Complex<f64>;

// ==================
// Struct definitions
// ==================

/// A structure for the list of reciprocal-lattice vectors kept in a plane-wave expansion,
/// together with a lookup from vector to position.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vector3<i32>>", into = "Vec<Vector3<i32>>")]
pub struct PlaneWaveBasis {
    gvectors: Vec<Vector3<i32>>,
    positions: HashMap<[i32; 3], usize>,
}

impl PlaneWaveBasis {
    /// Constructs a plane-wave basis from integer reciprocal-lattice vectors.
    ///
    /// # Errors
    ///
    /// Errors if the list is empty or contains a vector twice.
    pub fn new(gvectors: Vec<Vector3<i32>>) -> Result<Self, IrrepError> {
        if gvectors.is_empty() {
            return Err(IrrepError::input_shape("the plane-wave basis is empty"));
        }
        let mut positions = HashMap::with_capacity(gvectors.len());
        for (i, g) in gvectors.iter().enumerate() {
            if let Some(j) = positions.insert([g[0], g[1], g[2]], i) {
                return Err(IrrepError::input_shape(format!(
                    "plane waves {j} and {i} share the G-vector ({})",
                    g.iter().join(", ")
                )));
            }
        }
        Ok(Self {
            gvectors,
            positions,
        })
    }

    /// The number of plane waves.
    pub fn len(&self) -> usize {
        self.gvectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gvectors.is_empty()
    }

    pub fn gvectors(&self) -> &[Vector3<i32>] {
        &self.gvectors
    }

    /// The position of a G-vector in this basis, if present.
    pub fn position(&self, g: &Vector3<i32>) -> Option<usize> {
        self.positions.get(&[g[0], g[1], g[2]]).copied()
    }
}

impl TryFrom<Vec<Vector3<i32>>> for PlaneWaveBasis {
    type Error = IrrepError;

    fn try_from(gvectors: Vec<Vector3<i32>>) -> Result<Self, Self::Error> {
        Self::new(gvectors)
    }
}

impl From<PlaneWaveBasis> for Vec<Vector3<i32>> {
    fn from(basis: PlaneWaveBasis) -> Self {
        basis.gvectors
    }
}

/// A structure to manage the Bloch states of a set of bands at one k-point.
///
/// The coefficient array has shape `(nbands, ncomps, npw)`, where `ncomps` is `2` for spinors
/// (spin-up first) and `1` for scalar wavefunctions.
#[derive(Builder, Clone, Debug, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct BlochStates {
    /// The k-point of these states.
    kpoint: KPoint,

    /// The plane waves of the expansion.
    basis: PlaneWaveBasis,

    /// The band energies.
    energies: Array1<f64>,

    /// The plane-wave coefficients.
    coefficients: Array3<C128>,
}

impl BlochStatesBuilder {
    fn validate(&self) -> Result<(), String> {
        let basis = self
            .basis
            .as_ref()
            .ok_or("No plane-wave basis found.".to_string())?;
        let energies = self
            .energies
            .as_ref()
            .ok_or("No band energies found.".to_string())?;
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or("No plane-wave coefficients found.".to_string())?;
        check_shapes(basis, energies, coefficients)
    }
}

fn check_shapes(
    basis: &PlaneWaveBasis,
    energies: &Array1<f64>,
    coefficients: &Array3<C128>,
) -> Result<(), String> {
    let (nbands, ncomps, npw) = coefficients.dim();
    if nbands != energies.len() {
        return Err(format!(
            "{nbands} bands of coefficients but {} band energies.",
            energies.len()
        ));
    }
    if ncomps != 1 && ncomps != 2 {
        return Err(format!(
            "Coefficients have {ncomps} spin components, not 1 or 2."
        ));
    }
    if npw != basis.len() {
        return Err(format!(
            "Coefficients cover {npw} plane waves but the basis has {}.",
            basis.len()
        ));
    }
    if energies.iter().any(|e| !e.is_finite()) {
        return Err("Band energies must be finite.".to_string());
    }
    Ok(())
}

impl BlochStates {
    /// Returns a builder to construct new Bloch states.
    pub fn builder() -> BlochStatesBuilder {
        BlochStatesBuilder::default()
    }

    /// Constructs spinor Bloch states from a coefficient array of shape `(2 * nbands, npw)` whose
    /// first `nbands` rows hold the spin-up components and whose last `nbands` rows hold the
    /// spin-down components.
    pub fn from_spin_blocks(
        kpoint: KPoint,
        basis: PlaneWaveBasis,
        energies: Array1<f64>,
        coefficients: &Array2<C128>,
    ) -> Result<Self, IrrepError> {
        let nbands = energies.len();
        if coefficients.nrows() != 2 * nbands {
            return Err(IrrepError::input_shape(format!(
                "{} coefficient rows given for {nbands} spinor bands; expected {}",
                coefficients.nrows(),
                2 * nbands
            )));
        }
        let npw = coefficients.ncols();
        let mut stacked = Array3::<C128>::zeros((nbands, 2, npw));
        stacked
            .slice_mut(s![.., 0, ..])
            .assign(&coefficients.slice(s![0..nbands, ..]));
        stacked
            .slice_mut(s![.., 1, ..])
            .assign(&coefficients.slice(s![nbands.., ..]));
        Self::from_parts(kpoint, basis, energies, stacked)
    }

    /// Constructs scalar Bloch states from a coefficient array of shape `(nbands, npw)`.
    pub fn scalar(
        kpoint: KPoint,
        basis: PlaneWaveBasis,
        energies: Array1<f64>,
        coefficients: Array2<C128>,
    ) -> Result<Self, IrrepError> {
        let (nbands, npw) = coefficients.dim();
        let stacked = Array3::from_shape_fn((nbands, 1, npw), |(n, _, i)| coefficients[(n, i)]);
        Self::from_parts(kpoint, basis, energies, stacked)
    }

    fn from_parts(
        kpoint: KPoint,
        basis: PlaneWaveBasis,
        energies: Array1<f64>,
        coefficients: Array3<C128>,
    ) -> Result<Self, IrrepError> {
        Self::builder()
            .kpoint(kpoint)
            .basis(basis)
            .energies(energies)
            .coefficients(coefficients)
            .build()
            .map_err(|err| IrrepError::input_shape(err.to_string()))
    }

    /// Extracts one collinear spin channel as scalar states.
    pub fn spin_channel(&self, channel: usize) -> Result<Self, IrrepError> {
        if channel >= self.component_number() {
            return Err(IrrepError::input_shape(format!(
                "spin channel {channel} requested from states with {} components",
                self.component_number()
            )));
        }
        let channel_coefficients = self
            .coefficients
            .slice(s![.., channel..channel + 1, ..])
            .to_owned();
        Self::from_parts(
            self.kpoint.clone(),
            self.basis.clone(),
            self.energies.clone(),
            channel_coefficients,
        )
    }

    /// Checks the consistency of the array shapes, for states obtained by deserialisation.
    pub fn check(&self) -> Result<(), IrrepError> {
        check_shapes(&self.basis, &self.energies, &self.coefficients).map_err(IrrepError::input_shape)
    }

    pub fn kpoint(&self) -> &KPoint {
        &self.kpoint
    }

    pub fn basis(&self) -> &PlaneWaveBasis {
        &self.basis
    }

    pub fn energies(&self) -> &Array1<f64> {
        &self.energies
    }

    pub fn coefficients(&self) -> &Array3<C128> {
        &self.coefficients
    }

    pub fn band_number(&self) -> usize {
        self.energies.len()
    }

    /// The number of spin components per plane wave.
    pub fn component_number(&self) -> usize {
        self.coefficients.dim().1
    }

    pub fn is_spinor(&self) -> bool {
        self.component_number() == 2
    }

    /// Selects the band block `lo..hi` (zero-based, exclusive) for classification.
    ///
    /// # Errors
    ///
    /// Errors with [`crate::analysis::IrrepErrorKind::InputShape`] if the range is empty or out
    /// of bounds, and with [`crate::analysis::IrrepErrorKind::DegeneracyAmbiguity`] if the
    /// energies in the block spread beyond `degeneracy_threshold` or if a band just outside the
    /// block lies within `degeneracy_threshold` of it.
    pub fn block(
        &self,
        lo: usize,
        hi: usize,
        degeneracy_threshold: f64,
    ) -> Result<BandBlock<'_>, IrrepError> {
        if lo >= hi || hi > self.band_number() {
            return Err(IrrepError::input_shape(format!(
                "band block {lo}..{hi} is empty or exceeds the {} available bands",
                self.band_number()
            )));
        }
        let block_energies = self.energies.slice(s![lo..hi]);
        let emin = block_energies.iter().copied().fold(f64::INFINITY, f64::min);
        let emax = block_energies
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if emax - emin > degeneracy_threshold {
            return Err(IrrepError::degeneracy_ambiguity(format!(
                "bands {}..{} span {:.6} in energy, more than the degeneracy threshold {degeneracy_threshold:.3e}",
                lo + 1,
                hi,
                emax - emin
            )));
        }
        if lo > 0 && (self.energies[lo - 1] - emin).abs() <= degeneracy_threshold {
            return Err(IrrepError::degeneracy_ambiguity(format!(
                "band {} is degenerate with band {} just below the block {}..{}",
                lo,
                lo + 1,
                lo + 1,
                hi
            )));
        }
        if hi < self.band_number() && (self.energies[hi] - emax).abs() <= degeneracy_threshold {
            return Err(IrrepError::degeneracy_ambiguity(format!(
                "band {} is degenerate with band {} just above the block {}..{}",
                hi + 1,
                hi,
                lo + 1,
                hi
            )));
        }
        log::debug!(
            "Band block {}..{} at {} has dimension {} around E = {:.6}.",
            lo + 1,
            hi,
            self.kpoint,
            hi - lo,
            emin
        );
        Ok(BandBlock {
            states: self,
            bands: lo..hi,
        })
    }

    /// Splits the bands in `range` into blocks of consecutive bands whose neighbouring energies
    /// differ by at most `degeneracy_threshold`.
    pub fn degenerate_ranges(
        &self,
        range: Range<usize>,
        degeneracy_threshold: f64,
    ) -> Vec<Range<usize>> {
        let end = range.end.min(self.band_number());
        let mut ranges = vec![];
        let mut start = range.start;
        for i in (range.start + 1)..=end {
            if i == end || (self.energies[i] - self.energies[i - 1]).abs() > degeneracy_threshold {
                if start < i {
                    ranges.push(start..i);
                }
                start = i;
            }
        }
        ranges
    }
}

impl fmt::Display for BlochStates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} band(s) at {} in {} plane waves",
            self.band_number(),
            if self.is_spinor() { "spinor" } else { "scalar" },
            self.kpoint,
            self.basis.len()
        )
    }
}

/// A structure for a contiguous block of (nearly) degenerate bands selected from
/// [`BlochStates`].
#[derive(Clone, Debug)]
pub struct BandBlock<'a> {
    states: &'a BlochStates,
    bands: Range<usize>,
}

impl<'a> BandBlock<'a> {
    pub fn states(&self) -> &'a BlochStates {
        self.states
    }

    /// The zero-based band range of this block.
    pub fn bands(&self) -> Range<usize> {
        self.bands.clone()
    }

    /// The dimension $`m`$ of this block.
    pub fn dimension(&self) -> usize {
        self.bands.len()
    }

    /// The mean energy of the bands in this block.
    pub fn energy(&self) -> f64 {
        self.states
            .energies
            .slice(s![self.bands.clone()])
            .mean()
            .unwrap_or(f64::NAN)
    }

    /// The coefficients of the bands in this block with shape `(m, ncomps, npw)`.
    pub fn coefficients(&self) -> ArrayView3<'a, C128> {
        let states = self.states;
        states.coefficients.slice(s![self.bands.clone(), .., ..])
    }
}
