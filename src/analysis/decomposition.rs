//! Reduction of band characters into irreducible co-representations.

use std::fmt;

use derive_builder::Builder;
use itertools::Itertools;
use log;
use ndarray::Array1;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::analysis::IrrepError;
use crate::chartab::chartab_symbols::{
    CorepSymbol, DecomposedSymbol, LinearSpaceSymbol, ReducibleLinearSpaceSymbol,
};
use crate::chartab::{CorepCharacterTable, CorepKind};

#[cfg(test)]
#[path = "decomposition_tests.rs"]
mod decomposition_tests;

type C128 = Complex<f64>;

/// A structure for the decomposition of a band block into irreducible co-representations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Decomposition {
    /// The direct-sum symbol.
    symbol: DecomposedSymbol<CorepSymbol>,

    /// The multiplicity of every row of the co-representation table, in table order.
    multiplicities: Vec<usize>,

    /// The multiplicities of the unitary irreps before pairing, in unitary-table order.
    unitary_multiplicities: Vec<usize>,

    /// Boolean indicating if any constituent is doubled by antiunitary symmetry.
    torsion: bool,
}

impl Decomposition {
    pub fn symbol(&self) -> &DecomposedSymbol<CorepSymbol> {
        &self.symbol
    }

    pub fn multiplicities(&self) -> &[usize] {
        &self.multiplicities
    }

    pub fn unitary_multiplicities(&self) -> &[usize] {
        &self.unitary_multiplicities
    }

    /// Boolean indicating if any constituent co-representation is of type (b) or (c), so that
    /// antiunitary symmetry enforces an extra degeneracy in this block.
    pub fn has_torsion(&self) -> bool {
        self.torsion
    }
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// A structure to reduce band characters over a co-representation table.
///
/// The band characters on the unitary half are first reduced over the unitary irreps,
/// $`\nu_\beta = \frac{1}{|L_u|}\sum_{g \in L_u}\chi_\beta(g)^*\chi(g)`$, and the resulting
/// integers are then assembled into co-representation multiplicities: a type (a) row takes
/// $`\nu_\alpha`$, a type (b) row takes $`\nu_\alpha / 2`$, and a type (c) row takes the common
/// value $`\nu_\alpha = \nu_{\bar\alpha}`$. Characters on the antiunitary coset are not used.
#[derive(Builder)]
pub struct IrrepDecomposer<'a> {
    /// The co-representation table to reduce over.
    table: &'a CorepCharacterTable,

    /// The largest allowed distance of a unitary multiplicity from an integer.
    #[builder(default = "0.05")]
    multiplicity_threshold: f64,
}

impl<'a> IrrepDecomposer<'a> {
    /// Returns a builder to construct a new decomposer.
    pub fn builder() -> IrrepDecomposerBuilder<'a> {
        IrrepDecomposerBuilder::default()
    }

    /// Decomposes a band block of dimension `dimension` with characters `band_characters` given
    /// over all little-group operations.
    ///
    /// # Errors
    ///
    /// * [`crate::analysis::IrrepErrorKind::InputShape`] if the number of characters differs from
    /// the number of little-group operations.
    /// * [`crate::analysis::IrrepErrorKind::DecompositionInconsistent`] if a unitary multiplicity
    /// is not a non-negative integer, or if dimensions do not add up to `dimension`.
    /// * [`crate::analysis::IrrepErrorKind::DegeneracyAmbiguity`] if a doubled or paired
    /// co-representation is only partially contained in the block.
    pub fn decompose(
        &self,
        band_characters: &Array1<C128>,
        dimension: usize,
    ) -> Result<Decomposition, IrrepError> {
        let table = self.table;
        if band_characters.len() != table.characters().ncols() {
            return Err(IrrepError::input_shape(format!(
                "{} band characters given for a little group of order {}",
                band_characters.len(),
                table.characters().ncols()
            )));
        }

        // Stage 1: unitary irreps.
        let unitary = table.unitary_table();
        let nu = unitary.group_order();
        let unitary_multiplicities = unitary
            .irreps()
            .iter()
            .enumerate()
            .map(|(beta, irrep)| {
                let nu_beta = table
                    .unitary_columns()
                    .iter()
                    .enumerate()
                    .map(|(p, &col)| unitary.characters()[(beta, p)].conj() * band_characters[col])
                    .sum::<C128>()
                    / (nu as f64);
                let rounded = nu_beta.re.round();
                log::debug!("Multiplicity of unitary irrep {irrep}: {nu_beta:+.6}");
                if (nu_beta - C128::new(rounded, 0.0)).norm() > self.multiplicity_threshold
                    || rounded < 0.0
                {
                    Err(IrrepError::decomposition_inconsistent(format!(
                        "multiplicity {nu_beta:.6} of unitary irrep {irrep} is not a non-negative \
                         integer"
                    )))
                } else {
                    Ok(rounded as usize)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        let unitary_dimension = unitary
            .irreps()
            .iter()
            .zip(unitary_multiplicities.iter())
            .map(|(irrep, mult)| irrep.dimensionality() * mult)
            .sum::<usize>();
        if unitary_dimension != dimension {
            return Err(IrrepError::decomposition_inconsistent(format!(
                "unitary irreps account for {unitary_dimension} dimensions of a {dimension}-dimensional \
                 block"
            )));
        }

        // Stage 2: co-representations.
        let multiplicities = table
            .rows()
            .iter()
            .map(|row| {
                let alpha = row.inducing_irreps[0];
                let nu_alpha = unitary_multiplicities[alpha];
                match row.kind {
                    CorepKind::A => Ok(nu_alpha),
                    CorepKind::B => {
                        if nu_alpha % 2 == 1 {
                            Err(IrrepError::degeneracy_ambiguity(format!(
                                "unitary irrep {} appears {nu_alpha} times but antiunitary \
                                 symmetry requires it in pairs to form {}",
                                unitary.irreps()[alpha],
                                row.symbol
                            )))
                        } else {
                            Ok(nu_alpha / 2)
                        }
                    }
                    CorepKind::C => {
                        let partner = row.inducing_irreps[1];
                        let nu_partner = unitary_multiplicities[partner];
                        if nu_alpha != nu_partner {
                            Err(IrrepError::degeneracy_ambiguity(format!(
                                "unitary irreps {} and {} appear {nu_alpha} and {nu_partner} \
                                 times but antiunitary symmetry pairs them into {}",
                                unitary.irreps()[alpha],
                                unitary.irreps()[partner],
                                row.symbol
                            )))
                        } else {
                            Ok(nu_alpha)
                        }
                    }
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let subspaces = table
            .rows()
            .iter()
            .zip(multiplicities.iter())
            .map(|(row, mult)| (row.symbol.clone(), *mult))
            .collect_vec();
        let symbol = DecomposedSymbol::from_subspaces(&subspaces);
        if symbol.dimensionality() != dimension {
            return Err(IrrepError::decomposition_inconsistent(format!(
                "{symbol} has dimension {} but the block has dimension {dimension}",
                symbol.dimensionality()
            )));
        }
        let torsion = table
            .rows()
            .iter()
            .zip(multiplicities.iter())
            .any(|(row, mult)| *mult > 0 && row.kind.is_doubled());
        log::debug!("Band block decomposes as {symbol}.");
        Ok(Decomposition {
            symbol,
            multiplicities,
            unitary_multiplicities,
            torsion,
        })
    }
}
