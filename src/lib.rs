//! # IrSSG: Irreducible Representations of Bloch Bands in Space and Spin-Space Groups
//!
//! IrSSG classifies the bands of a plane-wave electronic-structure calculation by the
//! irreducible representations of the little group of their k-point, with the following
//! capabilities:
//! - construction of little groups of space and spin-space groups, including antiunitary
//!   operations that map $`\mathbf{k}`$ to $`-\mathbf{k}`$,
//! - numerical construction of the character tables of projective (Bloch) representations of the
//!   unitary half of a little group,
//! - construction of co-representation tables following the Dimmock classification into types
//!   (a), (b) and (c),
//! - evaluation of representation matrices and characters of degenerate band blocks from
//!   plane-wave coefficients, for scalar wavefunctions and two-component spinors, and
//! - decomposition of band characters into irreducible co-representations.
//!
//! ## Overview
//!
//! The analysis of one band block proceeds through the following steps:
//! 1. [`group::little_group::LittleGroupSolver`] filters a [`group::SpaceSpinGroup`] down to
//!    the little group of a [`symmetry::kpoint::KPoint`].
//! 2. [`chartab::chartab_group::CharacterProperties`] builds the irrep and co-representation
//!    tables of the little group for the Bloch factor system at that k-point.
//! 3. [`target::bloch::bloch_analysis::BandRepresentation`] evaluates the representation
//!    matrices of a [`target::bloch::BandBlock`].
//! 4. [`analysis::decomposition::IrrepDecomposer`] reduces the band characters.
//!
//! [`drivers::irrep_analysis::compute_irrep`] carries out all four steps for a single block,
//! and [`drivers::irrep_analysis::BandIrrepAnalysisDriver`] walks several k-points and splits
//! their bands into degenerate blocks automatically.
//!
//! ## Examples and usage
//!
//! For most items (structs, enums, functions, and traits), their usages are illustrated in test
//! functions. The `irssg` binary reads a YAML input file naming a group catalogue, a group
//! identifier and a band-data file; run `irssg --help` for its options.
//!
//! ## License
//!
//! GNU Lesser General Public License v3.0.

pub mod analysis;
pub mod chartab;
pub mod drivers;
pub mod group;
pub mod interfaces;
pub mod io;
pub mod symmetry;
pub mod target;
