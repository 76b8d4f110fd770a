//! Errors and decomposition of band representations into irreducible co-representations.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod decomposition;


/// An enumerated type for the kinds of failure that can occur when classifying a band block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrrepErrorKind {
    /// Declared counts and array dimensions disagree.
    InputShape,

    /// The group table is malformed: missing identity, broken closure, or a little-group
    /// operation that does not fix the k-point.
    InvariantViolation,

    /// The image of a kept plane wave under an operation falls outside the plane-wave basis.
    IncompletePlaneWaveBasis,

    /// The band block boundaries cut through a degeneracy, or the block is not a degenerate set.
    DegeneracyAmbiguity,

    /// Orthogonality or indicator residuals exceed the character threshold.
    NumericalUnsoundness,

    /// Multiplicities are not integral or do not add up to the block dimension.
    DecompositionInconsistent,
}

impl fmt::Display for IrrepErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrrepErrorKind::InputShape => write!(f, "input shape"),
            IrrepErrorKind::InvariantViolation => write!(f, "invariant violation"),
            IrrepErrorKind::IncompletePlaneWaveBasis => write!(f, "incomplete plane-wave basis"),
            IrrepErrorKind::DegeneracyAmbiguity => write!(f, "degeneracy ambiguity"),
            IrrepErrorKind::NumericalUnsoundness => write!(f, "numerical unsoundness"),
            IrrepErrorKind::DecompositionInconsistent => write!(f, "decomposition inconsistent"),
        }
    }
}

/// A structure for errors raised while constructing little groups, character tables, band
/// characters, or decompositions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrepError {
    /// The kind of this error.
    pub kind: IrrepErrorKind,

    /// A description of the operation, band, or table entry involved.
    pub context: String,
}

impl IrrepError {
    /// Creates a new error of a given kind with some context.
    pub fn new<S: Into<String>>(kind: IrrepErrorKind, context: S) -> Self {
        Self {
            kind,
            context: context.into(),
        }
    }

    pub fn input_shape<S: Into<String>>(context: S) -> Self {
        Self::new(IrrepErrorKind::InputShape, context)
    }

    pub fn invariant_violation<S: Into<String>>(context: S) -> Self {
        Self::new(IrrepErrorKind::InvariantViolation, context)
    }

    pub fn incomplete_basis<S: Into<String>>(context: S) -> Self {
        Self::new(IrrepErrorKind::IncompletePlaneWaveBasis, context)
    }

    pub fn degeneracy_ambiguity<S: Into<String>>(context: S) -> Self {
        Self::new(IrrepErrorKind::DegeneracyAmbiguity, context)
    }

    pub fn numerical_unsoundness<S: Into<String>>(context: S) -> Self {
        Self::new(IrrepErrorKind::NumericalUnsoundness, context)
    }

    pub fn decomposition_inconsistent<S: Into<String>>(context: S) -> Self {
        Self::new(IrrepErrorKind::DecompositionInconsistent, context)
    }
}

impl fmt::Display for IrrepError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Irrep analysis error ({}): {}.", self.kind, self.context)
    }
}

impl Error for IrrepError {}
