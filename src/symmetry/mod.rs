//! Symmetry operations of crystals with spin and the k-points they act on.

pub mod kpoint;
pub mod space_spin_operation;
