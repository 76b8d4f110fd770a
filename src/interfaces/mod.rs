//! Interfaces between IrSSG and its users: the command line, YAML inputs, and group catalogues.

use anyhow;

pub mod catalogue;
pub mod cli;
pub mod input;

/// Trait for handling a parsed input file.
pub trait InputHandle {
    /// Handles the input section and runs appropriate calculations.
    fn handle(&self) -> Result<(), anyhow::Error>;
}
