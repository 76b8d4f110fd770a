//! Character tables supplied by the caller or by a group catalogue.

use itertools::Itertools;
use log;
use ndarray::Array2;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::analysis::IrrepError;
use crate::chartab::CorepCharacterTable;

#[cfg(test)]
#[path = "provided_tests.rs"]
mod provided_tests;

type C128 = Complex<f64>;

/// A structure for a named co-representation character table over all little-group operations,
/// as supplied from outside.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProvidedCharacterTable {
    names: Vec<String>,

    /// Characters with shape $`r \times |L|`$, columns in little-group order.
    characters: Array2<C128>,
}

impl ProvidedCharacterTable {
    /// Constructs a supplied table, checking that there is one name per row.
    pub fn new(names: Vec<String>, characters: Array2<C128>) -> Result<Self, IrrepError> {
        if names.len() != characters.nrows() {
            return Err(IrrepError::input_shape(format!(
                "{} irrep names given for {} character rows",
                names.len(),
                characters.nrows()
            )));
        }
        Ok(Self { names, characters })
    }

    /// Constructs a supplied table from row-major flat characters of length
    /// `names.len() * group_order`.
    pub fn from_flat(
        names: Vec<String>,
        group_order: usize,
        characters: Vec<C128>,
    ) -> Result<Self, IrrepError> {
        let nrows = names.len();
        let characters = Array2::from_shape_vec((nrows, group_order), characters)
            .map_err(|err| {
                IrrepError::input_shape(format!(
                    "cannot arrange characters into a {nrows} × {group_order} table: {err}"
                ))
            })?;
        Self::new(names, characters)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn characters(&self) -> &Array2<C128> {
        &self.characters
    }

    /// Reorders and relabels the rows of a computed co-representation table so that they follow
    /// this table. Rows are matched by their characters on the unitary half, which do not
    /// depend on the phase convention of the antiunitary operations. Computed rows absent from
    /// this table are kept after the matched ones with their generic labels.
    ///
    /// # Errors
    ///
    /// Errors if the number of columns differs from $`|L|`$, or if a supplied row matches no
    /// computed row.
    pub fn adopt_into(
        &self,
        table: &mut CorepCharacterTable,
        thresh: f64,
    ) -> Result<(), IrrepError> {
        let order = table.characters().ncols();
        if self.characters.ncols() != order {
            return Err(IrrepError::input_shape(format!(
                "supplied character table has {} columns but the little group has {order} \
                 operations",
                self.characters.ncols()
            )));
        }
        let mut used = vec![false; table.corep_number()];
        let mut row_order = vec![];
        let mut labels = vec![];
        for (r, name) in self.names.iter().enumerate() {
            let matched = (0..table.corep_number())
                .filter(|&row| !used[row])
                .find(|&row| {
                    table.unitary_columns().iter().all(|&col| {
                        (self.characters[(r, col)] - table.characters()[(row, col)]).norm()
                            <= thresh
                    })
                })
                .ok_or_else(|| {
                    IrrepError::numerical_unsoundness(format!(
                        "supplied irrep `{name}` matches no computed co-representation"
                    ))
                })?;
            log::debug!(
                "Supplied irrep `{name}` matches computed row {}.",
                table.rows()[matched].symbol
            );
            used[matched] = true;
            row_order.push(matched);
            labels.push(Some(name.clone()));
        }
        let unmatched = (0..table.corep_number())
            .filter(|&row| !used[row])
            .collect_vec();
        if !unmatched.is_empty() {
            log::warn!(
                "{} computed co-representation(s) are absent from the supplied table and keep \
                 their generic labels.",
                unmatched.len()
            );
        }
        labels.extend(unmatched.iter().map(|_| None));
        row_order.extend(unmatched);
        table.reorder_and_relabel(&row_order, &labels);
        Ok(())
    }
}
