//! Symbols for irreducible representations, co-representations and their direct sums.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "chartab_symbols_tests.rs"]
mod chartab_symbols_tests;

const SUBSCRIPT_DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

// =================
// Trait definitions
// =================

/// A trait for symbols describing linear spaces.
pub trait LinearSpaceSymbol: Clone + fmt::Display {
    /// The printed label of the linear space.
    fn label(&self) -> &str;

    /// The dimensionality of the linear space.
    fn dimensionality(&self) -> usize;
}

/// A trait for symbols describing reducible linear spaces.
pub trait ReducibleLinearSpaceSymbol: fmt::Display
where
    Self::Subspace: LinearSpaceSymbol,
{
    /// The type of the subspace symbols.
    type Subspace;

    /// Constructs [`Self`] from constituting subspace symbols and their multiplicities. Subspaces
    /// with zero multiplicity are dropped.
    fn from_subspaces(subspaces: &[(Self::Subspace, usize)]) -> Self;

    /// Returns the constituting subspace symbols and their multiplicities.
    fn subspaces(&self) -> Vec<(&Self::Subspace, &usize)>;

    /// The total dimensionality of the direct sum.
    fn dimensionality(&self) -> usize {
        self.subspaces()
            .iter()
            .map(|(sym, mult)| sym.dimensionality() * **mult)
            .sum()
    }
}

// ==================
// Struct definitions
// ==================

/// A structure for the symbol of an irreducible representation of a unitary group.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrrepSymbol {
    label: String,
    dimension: usize,
}

impl IrrepSymbol {
    pub fn new(label: &str, dimension: usize) -> Self {
        Self {
            label: label.to_string(),
            dimension,
        }
    }

    /// Constructs the generic symbol $`\Gamma_{i+1}`$ for the irrep at position `index`.
    pub fn generic(index: usize, dimension: usize) -> Self {
        Self::new(&format!("Γ{}", subscript(index + 1)), dimension)
    }
}

impl LinearSpaceSymbol for IrrepSymbol {
    fn label(&self) -> &str {
        &self.label
    }

    fn dimensionality(&self) -> usize {
        self.dimension
    }
}

impl fmt::Display for IrrepSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// A structure for the symbol of an irreducible co-representation, remembering the unitary
/// irreps that induce it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorepSymbol {
    label: String,
    dimension: usize,
    inducing_irreps: Vec<IrrepSymbol>,
}

impl CorepSymbol {
    /// Constructs a co-representation symbol. The generic label concatenates the labels of the
    /// inducing irreps, so that a doubled irrep $`\Gamma_1`$ gives $`\Gamma_1\Gamma_1`$ and a pair
    /// gives $`\Gamma_2\Gamma_3`$.
    pub fn from_inducing_irreps(inducing_irreps: &[IrrepSymbol]) -> Self {
        let label = inducing_irreps.iter().map(|irrep| irrep.label()).join("");
        let dimension = inducing_irreps
            .iter()
            .map(|irrep| irrep.dimensionality())
            .sum();
        Self {
            label,
            dimension,
            inducing_irreps: inducing_irreps.to_vec(),
        }
    }

    /// Returns a copy of this symbol with a different label.
    pub fn relabelled(&self, label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..self.clone()
        }
    }

    pub fn inducing_irreps(&self) -> &[IrrepSymbol] {
        &self.inducing_irreps
    }
}

impl LinearSpaceSymbol for CorepSymbol {
    fn label(&self) -> &str {
        &self.label
    }

    fn dimensionality(&self) -> usize {
        self.dimension
    }
}

impl fmt::Display for CorepSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// A structure for the direct sum $`n_1 \cdot \Gamma_1 \oplus n_2 \cdot \Gamma_2 \oplus \ldots`$.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecomposedSymbol<S> {
    subspaces: Vec<(S, usize)>,
}

impl<S: LinearSpaceSymbol> ReducibleLinearSpaceSymbol for DecomposedSymbol<S> {
    type Subspace = S;

    fn from_subspaces(subspaces: &[(S, usize)]) -> Self {
        Self {
            subspaces: subspaces
                .iter()
                .filter(|(_, mult)| *mult > 0)
                .cloned()
                .collect(),
        }
    }

    fn subspaces(&self) -> Vec<(&S, &usize)> {
        self.subspaces.iter().map(|(sym, mult)| (sym, mult)).collect()
    }
}

impl<S: LinearSpaceSymbol> fmt::Display for DecomposedSymbol<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.subspaces
                .iter()
                .map(|(sym, mult)| if *mult == 1 {
                    sym.label().to_string()
                } else {
                    format!("{mult}·{}", sym.label())
                })
                .join(" ⊕ ")
        )
    }
}

/// Writes a non-negative integer with Unicode subscript digits.
pub(crate) fn subscript(n: usize) -> String {
    n.to_string()
        .chars()
        .filter_map(|c| c.to_digit(10).map(|d| SUBSCRIPT_DIGITS[d as usize]))
        .collect()
}
