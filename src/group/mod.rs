//! Space and spin-space groups given as ordered operation lists closed modulo lattice
//! translations.

use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
use log;
use nalgebra::{Matrix2, Matrix3, Vector3};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::analysis::IrrepError;
use crate::symmetry::space_spin_operation::SpaceSpinOperation;

pub mod class;
pub mod little_group;

#[cfg(test)]
pub(crate) mod template_groups;


type C128 = Complex<f64>;

/// The largest group order accepted when generating a group from generators.
const MAX_GROUP_ORDER: usize = 4096;

// ==================
// Struct definitions
// ==================

/// A structure for one entry $`g_i g_j = s_{ij}\{E|\mathbf{t}_{ij}\} g_k`$ of a multiplication
/// table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplicationEntry {
    /// The index $`k`$ of the product.
    pub index: usize,

    /// The integer lattice translation $`\mathbf{t}_{ij}`$ left over by the product.
    pub lattice_translation: Vector3<i32>,

    /// The sign $`s_{ij}`$ relating the $`SU(2)`$ part of the product to that of $`g_k`$.
    pub spin_sign: i8,
}

/// A structure for the multiplication table of a list of operations closed modulo lattice
/// translations and spinor signs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultiplicationTable {
    order: usize,
    entries: Vec<MultiplicationEntry>,
    inverses: Vec<usize>,
}

impl MultiplicationTable {
    /// Computes the multiplication table of `operations`.
    ///
    /// # Errors
    ///
    /// Errors with [`crate::analysis::IrrepErrorKind::InvariantViolation`] if some product is not
    /// in the list or some operation has no inverse.
    pub fn new(operations: &[SpaceSpinOperation], thresh: f64) -> Result<Self, IrrepError> {
        let order = operations.len();
        let mut lookup: HashMap<([i32; 9], bool), Vec<usize>> = HashMap::new();
        operations.iter().enumerate().for_each(|(i, op)| {
            lookup
                .entry(rotation_key(op))
                .or_insert_with(Vec::new)
                .push(i);
        });

        let entries = operations
            .iter()
            .enumerate()
            .cartesian_product(operations.iter().enumerate())
            .map(|((i, op_i), (j, op_j))| {
                let prod = op_i.compose(op_j);
                lookup
                    .get(&rotation_key(&prod))
                    .and_then(|candidates| {
                        candidates.iter().find_map(|&k| {
                            prod.match_modulo_lattice(&operations[k], thresh).map(
                                |(lattice_translation, spin_sign)| MultiplicationEntry {
                                    index: k,
                                    lattice_translation,
                                    spin_sign,
                                },
                            )
                        })
                    })
                    .ok_or_else(|| {
                        IrrepError::invariant_violation(format!(
                            "the product of operations {i} and {j} is not in the group"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let identity = operations
            .iter()
            .position(|op| op.is_identity(thresh))
            .ok_or_else(|| IrrepError::invariant_violation("the identity operation is missing"))?;
        let inverses = (0..order)
            .map(|i| {
                (0..order)
                    .find(|&j| entries[i * order + j].index == identity)
                    .ok_or_else(|| {
                        IrrepError::invariant_violation(format!(
                            "operation {i} has no inverse in the group"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            order,
            entries,
            inverses,
        })
    }

    /// The number of operations covered by this table.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns the entry for the product $`g_i g_j`$.
    pub fn product(&self, i: usize, j: usize) -> &MultiplicationEntry {
        &self.entries[i * self.order + j]
    }

    /// Returns the index of the inverse of $`g_i`$.
    pub fn inverse(&self, i: usize) -> usize {
        self.inverses[i]
    }
}

/// A structure for a space or spin-space group given as an ordered list of coset
/// representatives with respect to the lattice translations. The identity is always at index 0.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpaceSpinGroup {
    name: String,
    operations: Vec<SpaceSpinOperation>,
    table: MultiplicationTable,
    threshold: f64,
}

impl SpaceSpinGroup {
    /// Constructs a group from an ordered list of operations.
    ///
    /// # Errors
    ///
    /// Errors with an input-shape error if the list is empty, and with an invariant violation if
    /// index 0 is not the identity or the list is not closed.
    pub fn new(
        name: &str,
        operations: Vec<SpaceSpinOperation>,
        thresh: f64,
    ) -> Result<Self, IrrepError> {
        let first = operations
            .first()
            .ok_or_else(|| IrrepError::input_shape(format!("group `{name}` has no operations")))?;
        if !first.is_identity(thresh) {
            return Err(IrrepError::invariant_violation(format!(
                "operation 0 of group `{name}` is {first}, not the identity"
            )));
        }
        let table = MultiplicationTable::new(&operations, thresh)?;
        log::debug!(
            "Group `{name}` with {} operations is closed modulo lattice translations.",
            operations.len()
        );
        Ok(Self {
            name: name.to_string(),
            operations,
            table,
            threshold: thresh,
        })
    }

    /// Generates a group by closing a set of generators under composition.
    pub fn generate(
        name: &str,
        generators: &[SpaceSpinOperation],
        thresh: f64,
    ) -> Result<Self, IrrepError> {
        let mut operations = vec![SpaceSpinOperation::identity()];
        let mut cursor = 0;
        while cursor < operations.len() {
            for generator in generators.iter() {
                let prod = generator
                    .compose(&operations[cursor])
                    .with_reduced_translation(thresh);
                if !operations
                    .iter()
                    .any(|op| prod.match_modulo_lattice(op, thresh).is_some())
                {
                    operations.push(prod);
                    if operations.len() > MAX_GROUP_ORDER {
                        return Err(IrrepError::invariant_violation(format!(
                            "generators of `{name}` produce more than {MAX_GROUP_ORDER} operations"
                        )));
                    }
                }
            }
            cursor += 1;
        }
        Self::new(name, operations, thresh)
    }

    /// Returns the grey group obtained by adjoining time reversal. For spinor wavefunctions, time
    /// reversal carries the spin rotation $`i\sigma_y`$.
    pub fn with_time_reversal(&self, spinor: bool) -> Result<Self, IrrepError> {
        if self.operations.iter().any(|op| op.antiunitary) {
            return Err(IrrepError::invariant_violation(format!(
                "group `{}` already contains antiunitary operations",
                self.name
            )));
        }
        let su2 = if spinor {
            Matrix2::new(
                C128::new(0.0, 0.0),
                C128::new(1.0, 0.0),
                C128::new(-1.0, 0.0),
                C128::new(0.0, 0.0),
            )
        } else {
            Matrix2::identity()
        };
        let trev = SpaceSpinOperation {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
            su2,
            so3: Matrix3::identity(),
            antiunitary: true,
        };
        let mut operations = self.operations.clone();
        operations.extend(self.operations.iter().map(|op| trev.compose(op)));
        Self::new(&format!("{}1'", self.name), operations, self.threshold)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operations(&self) -> &[SpaceSpinOperation] {
        &self.operations
    }

    /// The number of operations modulo lattice translations.
    pub fn order(&self) -> usize {
        self.operations.len()
    }

    pub fn multiplication_table(&self) -> &MultiplicationTable {
        &self.table
    }

    /// The threshold used for comparing operations in this group.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl fmt::Display for SpaceSpinGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Group `{}` ({} operations modulo lattice translations):",
            self.name,
            self.order()
        )?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "  {:>3}  {op}", i + 1)?;
        }
        Ok(())
    }
}

fn rotation_key(op: &SpaceSpinOperation) -> ([i32; 9], bool) {
    let mut key = [0; 9];
    op.rotation
        .transpose()
        .iter()
        .enumerate()
        .for_each(|(i, x)| key[i] = *x);
    (key, op.antiunitary)
}
