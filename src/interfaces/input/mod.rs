//! YAML input files for IrSSG.

use std::ops::Range;
use std::path::PathBuf;

use anyhow::{self, bail, format_err};
use serde::{Deserialize, Serialize};

use crate::drivers::irrep_analysis::{BandIrrepAnalysisDriver, IrrepAnalysisParams};
use crate::drivers::IrssgDriver;
use crate::interfaces::catalogue::GroupCatalogue;
use crate::interfaces::InputHandle;
use crate::io::format::{irssg_output, log_subtitle};
use crate::io::{read_irssg_binary, read_irssg_yaml, write_irssg_yaml, IrssgFileType};
use crate::target::bloch::BlochStates;

#[cfg(test)]
#[path = "input_tests.rs"]
mod input_tests;

/// An enumerated type for the sources of band data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BandDataSource {
    /// A YAML file holding a list of Bloch states, one entry per k-point.
    Yaml(PathBuf),

    /// A binary file of type [`IrssgFileType::Bands`]. The associated string gives the name of
    /// the file without its `.irssg.bands` extension.
    Binary(String),
}

impl BandDataSource {
    /// Reads the Bloch states and checks their shapes.
    pub fn load(&self) -> Result<Vec<BlochStates>, anyhow::Error> {
        let states: Vec<BlochStates> = match self {
            BandDataSource::Yaml(path) => read_irssg_yaml(path)?,
            BandDataSource::Binary(name) => read_irssg_binary(name, IrssgFileType::Bands)?,
        };
        for (i, kstates) in states.iter().enumerate() {
            kstates
                .check()
                .map_err(|err| format_err!("Band data at k-point {}: {err}", i + 1))?;
        }
        Ok(states)
    }
}

/// A structure containing `IrSSG` input parameters which can be serialised into and deserialised
/// from a YAML input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Input {
    /// Path to the YAML group catalogue.
    pub catalogue: PathBuf,

    /// The identifier of the group in the catalogue.
    pub group: String,

    /// The source of the band data.
    pub bands: BandDataSource,

    /// The first and last k-points to analyse (one-based, inclusive). If not specified, all
    /// k-points are analysed.
    #[serde(default)]
    pub kpoints: Option<(usize, usize)>,

    /// The first and last bands to analyse (one-based, inclusive). If not specified, all bands
    /// are analysed.
    #[serde(default)]
    pub band_range: Option<(usize, usize)>,

    /// Parameters for irrep analysis.
    #[serde(default)]
    pub parameters: IrrepAnalysisParams,

    /// Optional name of a YAML file (without extension) to which the results are written.
    #[serde(default)]
    pub result_yaml: Option<String>,
}

impl Input {
    /// Converts the one-based inclusive k-point selection into a zero-based range.
    fn kpoint_selection(&self, nkpoints: usize) -> Result<Range<usize>, anyhow::Error> {
        one_based_range(self.kpoints, nkpoints, "k-point")
    }

    /// Converts the one-based inclusive band selection into a zero-based range.
    fn band_selection(&self, nbands: usize) -> Result<Option<Range<usize>>, anyhow::Error> {
        self.band_range
            .map(|_| one_based_range(self.band_range, nbands, "band"))
            .transpose()
    }

    /// Reads the catalogue and the band data, and checks that the selections are valid.
    ///
    /// # Returns
    ///
    /// The catalogue, the selected Bloch states and the zero-based band range.
    pub fn prepare(
        &self,
    ) -> Result<(GroupCatalogue, Vec<BlochStates>, Option<Range<usize>>), anyhow::Error> {
        let catalogue = GroupCatalogue::read(&self.catalogue, self.parameters.k_threshold)?;
        catalogue.lookup_group(&self.group)?;
        let states = self.bands.load()?;
        let kselection = self.kpoint_selection(states.len())?;
        let selected = states[kselection].to_vec();
        let nbands = selected
            .iter()
            .map(|s| s.band_number())
            .min()
            .ok_or_else(|| format_err!("No k-points selected."))?;
        let band_range = self.band_selection(nbands)?;
        Ok((catalogue, selected, band_range))
    }

    /// Reads all inputs and checks them without running the analysis.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let (_, states, band_range) = self.prepare()?;
        irssg_output!(
            "Input is valid: {} k-point(s) in group `{}`, bands {}.",
            states.len(),
            self.group,
            band_range
                .map(|r| format!("{}-{}", r.start + 1, r.end))
                .unwrap_or_else(|| "all".to_string())
        );
        Ok(())
    }
}

fn one_based_range(
    selection: Option<(usize, usize)>,
    count: usize,
    what: &str,
) -> Result<Range<usize>, anyhow::Error> {
    match selection {
        None => Ok(0..count),
        Some((first, last)) => {
            if first == 0 || first > last || last > count {
                bail!("Invalid {what} selection {first}-{last} out of {count}.");
            }
            Ok((first - 1)..last)
        }
    }
}

impl InputHandle for Input {
    /// Handles the main input structure.
    fn handle(&self) -> Result<(), anyhow::Error> {
        let (catalogue, states, band_range) = self.prepare()?;
        let group = catalogue.lookup_group(&self.group)?;
        let tables = catalogue.character_tables(&self.group)?;
        irssg_output!("{group}");
        irssg_output!("");

        let mut driver = BandIrrepAnalysisDriver::builder()
            .parameters(&self.parameters)
            .group(&group)
            .states(&states)
            .band_range(band_range)
            .character_tables(if tables.is_empty() { None } else { Some(&tables) })
            .build()?;
        driver.run()?;
        let result = driver.result()?;

        if let Some(name) = self.result_yaml.as_ref() {
            write_irssg_yaml(name, result)?;
            log_subtitle("Results");
            irssg_output!("Irrep analysis results written to {name}.yml.");
            irssg_output!("");
        }

        let nfailures = result.failure_count();
        if nfailures > 0 {
            bail!("Irrep analysis failed for {nfailures} band block(s) or k-point(s).");
        }
        Ok(())
    }
}
