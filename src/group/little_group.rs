//! Little groups of k-points and their Bloch factor systems.

use std::fmt;

use derive_builder::Builder;
use itertools::Itertools;
use log;
use nalgebra::Vector3;
use ndarray::Array2;
use num_complex::Complex;

use crate::analysis::IrrepError;
use crate::group::{MultiplicationTable, SpaceSpinGroup};
use crate::symmetry::kpoint::{integer_offset, KPoint};
use crate::symmetry::space_spin_operation::{SpaceSpinOperation, SpinChannelRelation};

#[cfg(test)]
#[path = "little_group_tests.rs"]
mod little_group_tests;

type C128 = Complex<f64>;

// ======
// Solver
// ======

/// A structure to filter a group down to the little group of a k-point.
#[derive(Builder)]
pub struct LittleGroupSolver<'a> {
    /// The full space or spin-space group.
    group: &'a SpaceSpinGroup,

    /// The k-point in fractional reciprocal coordinates.
    kpoint: &'a KPoint,

    /// The threshold for deciding if a vector is integral.
    #[builder(default = "1e-5")]
    k_threshold: f64,
}

impl<'a> LittleGroupSolver<'a> {
    /// Returns a builder to construct a new little-group solver.
    pub fn builder() -> LittleGroupSolverBuilder<'a> {
        LittleGroupSolverBuilder::default()
    }

    /// Selects the operations $`g`$ with $`(-1)^{a} R^{\mathsf{T}}\mathbf{k} \equiv \mathbf{k}`$,
    /// keeping the ordering of the parent group.
    ///
    /// # Errors
    ///
    /// Errors with an invariant violation if the identity is not accepted.
    pub fn solve(&self) -> Result<LittleGroup, IrrepError> {
        let k = &self.kpoint.coordinates;
        let (group_indices, k_offsets): (Vec<usize>, Vec<Vector3<i32>>) = self
            .group
            .operations()
            .iter()
            .enumerate()
            .filter_map(|(i, op)| {
                k_offset(op, k, self.k_threshold).map(|offset| (i, offset))
            })
            .unzip();
        if group_indices.first() != Some(&0) {
            return Err(IrrepError::invariant_violation(format!(
                "the identity of group `{}` does not fix {}",
                self.group.name(),
                self.kpoint
            )));
        }
        let operations = group_indices
            .iter()
            .map(|&i| self.group.operations()[i].clone())
            .collect_vec();
        log::debug!(
            "Little group of {} in `{}`: {} of {} operations kept.",
            self.kpoint,
            self.group.name(),
            operations.len(),
            self.group.order()
        );
        LittleGroup::assemble(
            self.kpoint.clone(),
            group_indices,
            operations,
            k_offsets,
            self.group.threshold().max(self.k_threshold),
        )
    }
}

/// Computes $`\Delta\mathbf{k} = R^{\mathsf{T}}\mathbf{k} - (-1)^{a}\mathbf{k}`$ if it is
/// integral.
fn k_offset(op: &SpaceSpinOperation, k: &Vector3<f64>, thresh: f64) -> Option<Vector3<i32>> {
    let rtk = op.rotation.transpose().map(f64::from) * k;
    let target = if op.antiunitary { -k } else { *k };
    integer_offset(&(rtk - target), thresh)
}

// ============
// Little group
// ============

/// A structure for the little group $`L`$ of a k-point, partitioned into its unitary half
/// $`L_u`$ and antiunitary coset $`L_a`$.
#[derive(Clone, Debug)]
pub struct LittleGroup {
    kpoint: KPoint,
    group_indices: Vec<usize>,
    operations: Vec<SpaceSpinOperation>,
    k_offsets: Vec<Vector3<i32>>,
    unitary: Vec<usize>,
    antiunitary: Vec<usize>,
    table: MultiplicationTable,
    threshold: f64,
}

impl LittleGroup {
    fn assemble(
        kpoint: KPoint,
        group_indices: Vec<usize>,
        operations: Vec<SpaceSpinOperation>,
        k_offsets: Vec<Vector3<i32>>,
        thresh: f64,
    ) -> Result<Self, IrrepError> {
        let table = MultiplicationTable::new(&operations, thresh)?;
        let (unitary, antiunitary): (Vec<usize>, Vec<usize>) =
            (0..operations.len()).partition(|&i| !operations[i].antiunitary);
        if !antiunitary.is_empty() && antiunitary.len() != unitary.len() {
            return Err(IrrepError::invariant_violation(format!(
                "the unitary half of the little group has {} operations but the antiunitary \
                 coset has {}",
                unitary.len(),
                antiunitary.len()
            )));
        }
        Ok(Self {
            kpoint,
            group_indices,
            operations,
            k_offsets,
            unitary,
            antiunitary,
            table,
            threshold: thresh,
        })
    }

    /// Constructs a little group directly from a list of operations supplied by a caller.
    ///
    /// # Arguments
    ///
    /// * `operations` - The little-group operations with the identity first.
    /// * `unitary_count` - The declared number of unitary operations, which must come before all
    /// antiunitary ones.
    /// * `kpoint` - The k-point.
    /// * `thresh` - The threshold for integrality checks and operation comparisons.
    pub fn from_operations(
        operations: Vec<SpaceSpinOperation>,
        unitary_count: usize,
        kpoint: &KPoint,
        thresh: f64,
    ) -> Result<Self, IrrepError> {
        if unitary_count == 0 || unitary_count > operations.len() {
            return Err(IrrepError::input_shape(format!(
                "declared {unitary_count} unitary operations out of {}",
                operations.len()
            )));
        }
        if let Some(i) = (0..operations.len())
            .find(|&i| operations[i].antiunitary != (i >= unitary_count))
        {
            return Err(IrrepError::input_shape(format!(
                "operation {i} is {} but the first {unitary_count} operations must be exactly \
                 the unitary ones",
                if operations[i].antiunitary {
                    "antiunitary"
                } else {
                    "unitary"
                }
            )));
        }
        if !operations[0].is_identity(thresh) {
            return Err(IrrepError::invariant_violation(format!(
                "operation 0 is {}, not the identity",
                operations[0]
            )));
        }
        let k_offsets = operations
            .iter()
            .enumerate()
            .map(|(i, op)| {
                k_offset(op, &kpoint.coordinates, thresh).ok_or_else(|| {
                    IrrepError::invariant_violation(format!(
                        "operation {i} ({op}) does not leave {kpoint} invariant"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let group_indices = (0..operations.len()).collect_vec();
        Self::assemble(kpoint.clone(), group_indices, operations, k_offsets, thresh)
    }

    /// Returns the subgroup of operations that do not exchange or mix the two collinear spin
    /// channels. This is the symmetry group of a single spin channel in a collinear
    /// spin-polarised calculation.
    pub fn spin_preserving_subgroup(&self) -> Result<Self, IrrepError> {
        let kept = (0..self.order())
            .filter(|&i| {
                self.operations[i].spin_channel_relation(self.threshold)
                    == SpinChannelRelation::Preserving
            })
            .collect_vec();
        if kept.len() < self.order() {
            log::debug!(
                "Dropping {} spin-channel-exchanging operations from the little group of {}.",
                self.order() - kept.len(),
                self.kpoint
            );
        }
        Self::assemble(
            self.kpoint.clone(),
            kept.iter().map(|&i| self.group_indices[i]).collect(),
            kept.iter().map(|&i| self.operations[i].clone()).collect(),
            kept.iter().map(|&i| self.k_offsets[i]).collect(),
            self.threshold,
        )
    }

    pub fn kpoint(&self) -> &KPoint {
        &self.kpoint
    }

    pub fn operations(&self) -> &[SpaceSpinOperation] {
        &self.operations
    }

    /// The indices of the little-group operations in the parent group.
    pub fn group_indices(&self) -> &[usize] {
        &self.group_indices
    }

    /// The reciprocal-lattice offsets $`\Delta\mathbf{k}(g) = R^{\mathsf{T}}\mathbf{k} -
    /// (-1)^{a}\mathbf{k}`$.
    pub fn k_offsets(&self) -> &[Vector3<i32>] {
        &self.k_offsets
    }

    /// The positions in this little group of the unitary operations.
    pub fn unitary_indices(&self) -> &[usize] {
        &self.unitary
    }

    /// The positions in this little group of the antiunitary operations.
    pub fn antiunitary_indices(&self) -> &[usize] {
        &self.antiunitary
    }

    /// The order $`|L|`$.
    pub fn order(&self) -> usize {
        self.operations.len()
    }

    /// The order $`|L_u|`$.
    pub fn unitary_order(&self) -> usize {
        self.unitary.len()
    }

    pub fn is_magnetic(&self) -> bool {
        !self.antiunitary.is_empty()
    }

    pub fn multiplication_table(&self) -> &MultiplicationTable {
        &self.table
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Computes the Bloch factor system
    /// $`\omega(i, j) = s_{ij}^{\sigma} e^{-2\pi i \mathbf{k}\cdot\mathbf{t}_{ij}}`$, where the
    /// spinor sign $`s_{ij}`$ is included only for spinor wavefunctions ($`\sigma = 1`$).
    pub fn factor_system(&self, spinor: bool) -> FactorSystem {
        let n = self.order();
        let k = &self.kpoint.coordinates;
        let omega = Array2::from_shape_fn((n, n), |(i, j)| {
            let entry = self.table.product(i, j);
            let sign = if spinor {
                f64::from(entry.spin_sign)
            } else {
                1.0
            };
            let t = entry.lattice_translation.map(f64::from);
            sign * C128::from_polar(1.0, -2.0 * std::f64::consts::PI * k.dot(&t))
        });
        FactorSystem { omega, spinor }
    }

    /// Builds the multiplication table of $`L_u`$ in its own indexing together with the factor
    /// system restricted to $`L_u`$.
    pub fn unitary_twisted_table(&self, factor_system: &FactorSystem) -> TwistedCayleyTable {
        let n = self.unitary_order();
        let mut position = vec![usize::MAX; self.order()];
        self.unitary
            .iter()
            .enumerate()
            .for_each(|(p, &i)| position[i] = p);
        let products = Array2::from_shape_fn((n, n), |(p, q)| {
            position[self.table.product(self.unitary[p], self.unitary[q]).index]
        });
        let omega = Array2::from_shape_fn((n, n), |(p, q)| {
            factor_system.omega(self.unitary[p], self.unitary[q])
        });
        let inverses = self
            .unitary
            .iter()
            .map(|&i| position[self.table.inverse(i)])
            .collect_vec();
        TwistedCayleyTable {
            products,
            omega,
            inverses,
        }
    }
}

impl fmt::Display for LittleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Little group of {} ({} unitary, {} antiunitary operations):",
            self.kpoint,
            self.unitary_order(),
            self.antiunitary.len()
        )?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(
                f,
                "  {:>3} (#{:>3})  {op}  Δk = ({})",
                i + 1,
                self.group_indices[i] + 1,
                self.k_offsets[i].iter().join(", ")
            )?;
        }
        Ok(())
    }
}

// =============
// Factor system
// =============

/// A structure for the factor system $`\omega`$ of the projective representations carried by
/// Bloch states at a k-point: $`\hat{O}_i K^{a_i}(\hat{O}_j) = \omega(i, j)\hat{O}_{ij}`$.
#[derive(Clone, Debug)]
pub struct FactorSystem {
    omega: Array2<C128>,
    spinor: bool,
}

impl FactorSystem {
    pub fn omega(&self, i: usize, j: usize) -> C128 {
        self.omega[(i, j)]
    }

    /// Boolean indicating if spinor signs are part of this factor system.
    pub fn is_spinor(&self) -> bool {
        self.spinor
    }
}

/// A structure for the multiplication table and factor system of a unitary group in its own
/// indexing.
#[derive(Clone, Debug)]
pub struct TwistedCayleyTable {
    products: Array2<usize>,
    omega: Array2<C128>,
    inverses: Vec<usize>,
}

impl TwistedCayleyTable {
    pub fn order(&self) -> usize {
        self.inverses.len()
    }

    pub fn product(&self, p: usize, q: usize) -> usize {
        self.products[(p, q)]
    }

    pub fn omega(&self, p: usize, q: usize) -> C128 {
        self.omega[(p, q)]
    }

    pub fn inverse(&self, p: usize) -> usize {
        self.inverses[p]
    }

    /// Returns the position of $`hgh^{-1}`$ and the phase $`\phi`$ with
    /// $`\hat{O}_h\hat{O}_g\hat{O}_h^{-1} = \phi\,\hat{O}_{hgh^{-1}}`$, so that any character of the
    /// factor system satisfies $`\chi(hgh^{-1}) = \chi(g)/\phi`$.
    pub fn conjugate(&self, h: usize, g: usize) -> (usize, C128) {
        let h_inv = self.inverses[h];
        let hg = self.products[(h, g)];
        let hgh_inv = self.products[(hg, h_inv)];
        let phase = self.omega[(h, g)] * self.omega[(hg, h_inv)] / self.omega[(h, h_inv)];
        (hgh_inv, phase)
    }
}
