//! Targets for symmetry analysis via representation and co-representation theories.

pub mod bloch;
