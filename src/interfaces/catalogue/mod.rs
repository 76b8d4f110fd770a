//! Catalogue of tabulated space and spin-space groups.
//!
//! A catalogue is a YAML list of entries, each naming a group by an identifier and listing its
//! operations as text lines in the format accepted by [`SpaceSpinOperation::from_str`]. Entries
//! may also carry little-group character tables keyed by the label of a k-point, which then
//! provide the order and the names of the co-representations at that k-point.
//!
//! ```yaml
//! - identifier: "2.4"
//!   operations:
//!     - "1 0 0 0 1 0 0 0 1  0 0 0  0"
//!     - "-1 0 0 0 -1 0 0 0 -1  0 0 0  0"
//!   irreps:
//!     "Γ":
//!       names: ["Ag", "Au"]
//!       characters: [[[1.0, 0.0], [1.0, 0.0]], [[1.0, 0.0], [-1.0, 0.0]]]
//! ```

use std::path::Path;
use std::str::FromStr;

use anyhow::{self, bail, format_err};
use indexmap::IndexMap;
use itertools::Itertools;
use ndarray::Array2;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::chartab::provided::ProvidedCharacterTable;
use crate::group::SpaceSpinGroup;
use crate::io::read_irssg_yaml;
use crate::symmetry::space_spin_operation::SpaceSpinOperation;

#[cfg(test)]
#[path = "catalogue_tests.rs"]
mod catalogue_tests;

type C128 = Complex<f64>;

/// A character table as stored in a catalogue entry. Each row lists the characters of one
/// co-representation over all little-group operations, in little-group order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogueCharacterTable {
    /// The names of the co-representations.
    pub names: Vec<String>,

    /// The character rows.
    pub characters: Vec<Vec<C128>>,
}

impl CatalogueCharacterTable {
    /// Converts this table into a [`ProvidedCharacterTable`].
    pub fn to_provided(&self) -> Result<ProvidedCharacterTable, anyhow::Error> {
        let ncols = self.characters.first().map(|row| row.len()).unwrap_or(0);
        if let Some(row) = self.characters.iter().position(|row| row.len() != ncols) {
            bail!(
                "Character row {row} has {} entries but row 0 has {ncols}.",
                self.characters[row].len()
            );
        }
        let characters = Array2::from_shape_vec(
            (self.characters.len(), ncols),
            self.characters.iter().flatten().copied().collect_vec(),
        )
        .map_err(|err| format_err!(err))?;
        Ok(ProvidedCharacterTable::new(self.names.clone(), characters)?)
    }
}

/// A single catalogue entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogueEntry {
    /// The identifier of the group.
    pub identifier: String,

    /// The operation lines, identity first.
    pub operations: Vec<String>,

    /// Optional character tables keyed by k-point label.
    #[serde(default)]
    pub irreps: IndexMap<String, CatalogueCharacterTable>,
}

/// A read-only catalogue of groups.
#[derive(Clone, Debug)]
pub struct GroupCatalogue {
    entries: IndexMap<String, CatalogueEntry>,
    threshold: f64,
}

impl GroupCatalogue {
    /// Constructs a catalogue from a list of entries.
    ///
    /// # Arguments
    ///
    /// * `entries` - The entries. Identifiers must be unique.
    /// * `thresh` - The threshold for comparing operations when groups are constructed.
    pub fn from_entries(entries: Vec<CatalogueEntry>, thresh: f64) -> Result<Self, anyhow::Error> {
        let mut map = IndexMap::new();
        for entry in entries {
            if map.contains_key(&entry.identifier) {
                bail!("Duplicate group identifier `{}` in catalogue.", entry.identifier);
            }
            map.insert(entry.identifier.clone(), entry);
        }
        log::debug!("Group catalogue holds {} entries.", map.len());
        Ok(Self {
            entries: map,
            threshold: thresh,
        })
    }

    /// Parses a catalogue from a YAML string.
    pub fn from_yaml_str(yaml: &str, thresh: f64) -> Result<Self, anyhow::Error> {
        let entries: Vec<CatalogueEntry> =
            serde_yaml::from_str(yaml).map_err(|err| format_err!(err))?;
        Self::from_entries(entries, thresh)
    }

    /// Reads a catalogue from a YAML file.
    pub fn read<P: AsRef<Path>>(path: P, thresh: f64) -> Result<Self, anyhow::Error> {
        let entries: Vec<CatalogueEntry> = read_irssg_yaml(path)?;
        Self::from_entries(entries, thresh)
    }

    /// Iterates over the identifiers in catalogue order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|id| id.as_str())
    }

    /// Looks up and constructs the group with identifier `identifier`.
    ///
    /// # Errors
    ///
    /// Errors if no such entry exists, if an operation line cannot be parsed, or if the
    /// operations do not form a group with the identity first.
    pub fn lookup_group(&self, identifier: &str) -> Result<SpaceSpinGroup, anyhow::Error> {
        let entry = self.entry(identifier)?;
        let operations = entry
            .operations
            .iter()
            .enumerate()
            .map(|(i, line)| {
                SpaceSpinOperation::from_str(line).map_err(|err| {
                    format_err!("Operation {} of group `{identifier}`: {err}", i + 1)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SpaceSpinGroup::new(identifier, operations, self.threshold)?)
    }

    /// Returns the character tables of the entry `identifier`, keyed by k-point label.
    pub fn character_tables(
        &self,
        identifier: &str,
    ) -> Result<IndexMap<String, ProvidedCharacterTable>, anyhow::Error> {
        self.entry(identifier)?
            .irreps
            .iter()
            .map(|(label, table)| {
                table
                    .to_provided()
                    .map(|provided| (label.clone(), provided))
                    .map_err(|err| format_err!("Character table at `{label}`: {err}"))
            })
            .collect()
    }

    fn entry(&self, identifier: &str) -> Result<&CatalogueEntry, anyhow::Error> {
        self.entries
            .get(identifier)
            .ok_or_else(|| format_err!("Group `{identifier}` not found in the catalogue."))
    }
}
