//! Driver for the irrep classification of Bloch bands.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use anyhow::{self, format_err};
use derive_builder::Builder;
use indexmap::IndexMap;
use itertools::Itertools;
use log;
use ndarray::Array1;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::analysis::decomposition::{Decomposition, IrrepDecomposer};
use crate::analysis::{IrrepError, IrrepErrorKind};
use crate::chartab::chartab_group::CharacterProperties;
use crate::chartab::provided::ProvidedCharacterTable;
use crate::chartab::CorepCharacterTable;
use crate::drivers::IrssgDriver;
use crate::group::little_group::{FactorSystem, LittleGroup, LittleGroupSolver};
use crate::group::SpaceSpinGroup;
use crate::io::format::{
    irssg_error, irssg_output, irssg_warn, log_kpoint_begin, log_kpoint_end, log_subtitle,
    log_title, nice_bool, IrssgOutput,
};
use crate::io::{write_irssg_binary, IrssgFileType};
use crate::symmetry::kpoint::KPoint;
use crate::target::bloch::bloch_analysis::BandRepresentation;
use crate::target::bloch::bloch_transformation::{PlaneWaveActions, SuppliedPlaneWaveTables};
use crate::target::bloch::{BandBlock, BlochStates, PlaneWaveBasis};


type C128 = Complex<f64>;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// An enumerated type indicating how the spin degrees of freedom of the Bloch states are treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinChannelMode {
    /// Two-component spinors. Spin rotations act on the components, and the double-group factor
    /// system applies.
    Spinor,

    /// One channel of a collinear spin-polarised calculation, analysed as scalar states under
    /// the operations that preserve the spin channels. The associated index selects the channel
    /// (`0` for spin up, `1` for spin down) when two-component data are given.
    CollinearChannel(usize),

    /// Scalar wavefunctions of a calculation without spin.
    Scalar,
}

impl Default for SpinChannelMode {
    fn default() -> Self {
        SpinChannelMode::Spinor
    }
}

impl fmt::Display for SpinChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinChannelMode::Spinor => write!(f, "spinor"),
            SpinChannelMode::CollinearChannel(0) => write!(f, "collinear, spin-up channel"),
            SpinChannelMode::CollinearChannel(1) => write!(f, "collinear, spin-down channel"),
            SpinChannelMode::CollinearChannel(ch) => write!(f, "collinear, channel {ch}"),
            SpinChannelMode::Scalar => write!(f, "scalar"),
        }
    }
}

/// A structure containing control parameters for irrep analysis of Bloch bands.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct IrrepAnalysisParams {
    /// Threshold for deciding if a vector in fractional reciprocal coordinates is integral.
    #[builder(default = "1e-5")]
    #[serde(default = "default_k_threshold")]
    pub k_threshold: f64,

    /// Largest energy spread, in the units of the band energies, of bands in one degenerate block.
    #[builder(default = "1e-4")]
    #[serde(default = "default_degeneracy_threshold")]
    pub degeneracy_threshold: f64,

    /// Threshold on character equality, orthogonality residuals and indicator values.
    #[builder(default = "1e-4")]
    #[serde(default = "default_character_threshold")]
    pub character_threshold: f64,

    /// Largest allowed distance of a multiplicity from an integer.
    #[builder(default = "0.05")]
    #[serde(default = "default_multiplicity_threshold")]
    pub multiplicity_threshold: f64,

    /// Boolean indicating if a character table failing its residual checks is to be rebuilt once
    /// with a doubled threshold. Results obtained this way are marked as approximate.
    #[builder(default = "false")]
    #[serde(default)]
    pub relaxed_tolerance: bool,

    /// Boolean indicating if supplied plane-wave tables are to be checked against recomputed
    /// ones before use.
    #[builder(default = "false")]
    #[serde(default)]
    pub verify_inputs: bool,

    /// Boolean indicating if the character tables of the little groups are to be written to the
    /// output.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub write_character_table: bool,

    /// The treatment of the spin degrees of freedom.
    #[builder(default)]
    #[serde(default)]
    pub spin_channel: SpinChannelMode,

    /// Optional name for saving the result as a binary file of type [`IrssgFileType::Res`]. If
    /// `None`, the result will not be saved.
    #[builder(default = "None")]
    #[serde(default)]
    pub result_save_name: Option<String>,
}

fn default_k_threshold() -> f64 {
    1e-5
}

fn default_degeneracy_threshold() -> f64 {
    1e-4
}

fn default_character_threshold() -> f64 {
    1e-4
}

fn default_multiplicity_threshold() -> f64 {
    0.05
}

fn default_true() -> bool {
    true
}

impl IrrepAnalysisParams {
    /// Returns a builder to construct a [`IrrepAnalysisParams`] structure.
    pub fn builder() -> IrrepAnalysisParamsBuilder {
        IrrepAnalysisParamsBuilder::default()
    }

    fn relaxed(&self) -> Self {
        let mut relaxed = self.clone();
        relaxed.character_threshold *= 2.0;
        relaxed
    }
}

impl Default for IrrepAnalysisParams {
    fn default() -> Self {
        Self::builder()
            .build()
            .expect("Unable to construct a default `IrrepAnalysisParams`.")
    }
}

impl fmt::Display for IrrepAnalysisParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "k-point integrality threshold: {:.3e}", self.k_threshold)?;
        writeln!(f, "Band degeneracy threshold: {:.3e}", self.degeneracy_threshold)?;
        writeln!(f, "Character threshold: {:.3e}", self.character_threshold)?;
        writeln!(
            f,
            "Multiplicity threshold: {:.3e}",
            self.multiplicity_threshold
        )?;
        writeln!(f, "Spin treatment: {}", self.spin_channel)?;
        writeln!(f)?;
        writeln!(
            f,
            "Retry with relaxed tolerance: {}",
            nice_bool(self.relaxed_tolerance)
        )?;
        writeln!(
            f,
            "Verify supplied plane-wave tables: {}",
            nice_bool(self.verify_inputs)
        )?;
        writeln!(
            f,
            "Write character tables: {}",
            nice_bool(self.write_character_table)
        )?;
        writeln!(
            f,
            "Save irrep analysis results to file: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                format!("{name}.{}", IrssgFileType::Res.ext())
            } else {
                nice_bool(false)
            }
        )?;
        writeln!(f)?;
        Ok(())
    }
}

// -------
// Results
// -------

/// A structure for the classification of one band block.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockIrreps {
    /// The zero-based band range of the block.
    pub bands: Range<usize>,

    /// The mean energy of the block.
    pub energy: f64,

    /// The band characters over all little-group operations. Antiunitary entries are
    /// informational only.
    pub band_characters: Array1<C128>,

    /// The decomposition into irreducible co-representations.
    pub decomposition: Decomposition,

    /// Boolean indicating if the character table had to be built with a relaxed tolerance.
    pub approximate: bool,
}

impl BlockIrreps {
    /// The multiplicities of the co-representations in table order.
    pub fn multiplicities(&self) -> &[usize] {
        self.decomposition.multiplicities()
    }
}

impl fmt::Display for BlockIrreps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decomposition)?;
        if self.approximate {
            write!(f, " (approximate)")?;
        }
        Ok(())
    }
}

/// An enumerated type for the outcome of classifying one band block.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BlockOutcome {
    /// The block has been classified.
    Classified(BlockIrreps),

    /// The block could not be classified.
    Failed {
        /// The zero-based band range of the block.
        bands: Range<usize>,

        /// The reason.
        error: IrrepError,
    },
}

impl BlockOutcome {
    pub fn bands(&self) -> &Range<usize> {
        match self {
            BlockOutcome::Classified(irreps) => &irreps.bands,
            BlockOutcome::Failed { bands, .. } => bands,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, BlockOutcome::Classified(_))
    }
}

/// A structure for the irrep analysis of the bands at one k-point.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KPointIrreps {
    /// The k-point.
    pub kpoint: KPoint,

    /// The co-representation table used, or the error that prevented its construction.
    pub character_table: Result<CorepCharacterTable, IrrepError>,

    /// The outcomes of all analysed band blocks in energy order.
    pub blocks: Vec<BlockOutcome>,
}

impl KPointIrreps {
    /// The number of blocks, or of k-points without a usable little group, that failed.
    pub fn failure_count(&self) -> usize {
        if self.character_table.is_err() {
            1
        } else {
            self.blocks.iter().filter(|b| !b.is_classified()).count()
        }
    }
}

/// A structure to contain irrep analysis results.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct IrrepAnalysisResult {
    /// The control parameters used to obtain this set of results.
    pub parameters: IrrepAnalysisParams,

    /// The name of the group analysed.
    pub group_name: String,

    /// The results at each analysed k-point.
    pub kpoints: Vec<KPointIrreps>,
}

impl IrrepAnalysisResult {
    /// Returns a builder to construct a [`IrrepAnalysisResult`] structure.
    fn builder() -> IrrepAnalysisResultBuilder {
        IrrepAnalysisResultBuilder::default()
    }

    /// The total number of failures over all k-points.
    pub fn failure_count(&self) -> usize {
        self.kpoints.iter().map(|k| k.failure_count()).sum()
    }
}

impl fmt::Display for IrrepAnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Group: {}", self.group_name)?;
        let width = self
            .kpoints
            .iter()
            .map(|k| k.kpoint.label(self.parameters.k_threshold).chars().count())
            .max()
            .unwrap_or(1)
            .max(7);
        writeln!(f, "{}", "┈".repeat(width + 42))?;
        writeln!(f, "{:<width$} {:>12} {:>12} {:>14}", "k-point", "Blocks", "Classified", "Failed")?;
        writeln!(f, "{}", "┈".repeat(width + 42))?;
        for kirreps in self.kpoints.iter() {
            let nblocks = kirreps.blocks.len();
            let nclassified = kirreps.blocks.iter().filter(|b| b.is_classified()).count();
            writeln!(
                f,
                "{:<width$} {:>12} {:>12} {:>14}",
                kirreps.kpoint.label(self.parameters.k_threshold),
                nblocks,
                nclassified,
                kirreps.failure_count()
            )?;
        }
        writeln!(f, "{}", "┈".repeat(width + 42))?;
        Ok(())
    }
}

// -----------------------
// Little-group analysers
// -----------------------

/// A structure holding everything needed to classify band blocks at one k-point: the little
/// group, its co-representation table and the plane-wave actions of its operations.
#[derive(Clone, Debug)]
pub struct LittleGroupAnalysis {
    little_group: LittleGroup,
    factor_system: FactorSystem,
    table: CorepCharacterTable,
    actions: PlaneWaveActions,
    approximate: bool,
}

impl LittleGroupAnalysis {
    /// Prepares the analysis of spinor or scalar states in `basis`.
    ///
    /// # Arguments
    ///
    /// * `little_group` - The little group.
    /// * `basis` - The plane-wave basis of the states.
    /// * `spinor` - Boolean indicating if the states are two-component spinors.
    /// * `character_table` - An optional supplied character table providing the order and the
    /// names of the co-representations.
    /// * `plane_wave_tables` - Optional supplied plane-wave permutations and phases.
    /// * `params` - The control parameters.
    pub fn new(
        little_group: LittleGroup,
        basis: &PlaneWaveBasis,
        spinor: bool,
        character_table: Option<&ProvidedCharacterTable>,
        plane_wave_tables: Option<&SuppliedPlaneWaveTables>,
        params: &IrrepAnalysisParams,
    ) -> Result<Self, IrrepError> {
        let factor_system = little_group.factor_system(spinor);
        let (mut table, approximate) = with_relaxed_retry(params, |thresh| {
            construct_tables(&little_group, &factor_system, thresh)
        })?;
        if let Some(provided) = character_table {
            provided.adopt_into(&mut table, params.character_threshold)?;
        }

        let actions = match plane_wave_tables {
            Some(supplied) if params.verify_inputs => {
                let actions = PlaneWaveActions::new(&little_group, basis)?;
                actions.verify_supplied(supplied, &little_group, params.character_threshold)?;
                actions
            }
            Some(supplied) => PlaneWaveActions::from_supplied(supplied, &little_group, basis)?,
            None => PlaneWaveActions::new(&little_group, basis)?,
        };

        Ok(Self {
            little_group,
            factor_system,
            table,
            actions,
            approximate,
        })
    }

    pub fn little_group(&self) -> &LittleGroup {
        &self.little_group
    }

    pub fn factor_system(&self) -> &FactorSystem {
        &self.factor_system
    }

    pub fn character_table(&self) -> &CorepCharacterTable {
        &self.table
    }

    /// Boolean indicating if the character table was built with a relaxed tolerance.
    pub fn is_approximate(&self) -> bool {
        self.approximate
    }

    /// Classifies one band block.
    pub fn classify(
        &self,
        block: &BandBlock,
        params: &IrrepAnalysisParams,
    ) -> Result<BlockIrreps, IrrepError> {
        if block.states().is_spinor() != self.factor_system.is_spinor() {
            return Err(IrrepError::input_shape(format!(
                "{}-component states cannot be analysed with a {} factor system",
                block.states().component_number(),
                if self.factor_system.is_spinor() {
                    "spinor"
                } else {
                    "scalar"
                }
            )));
        }
        let rep = BandRepresentation::compute(
            block,
            &self.little_group,
            &self.actions,
            params.character_threshold,
        )?;
        let decomposition = IrrepDecomposer::builder()
            .table(&self.table)
            .multiplicity_threshold(params.multiplicity_threshold)
            .build()
            .map_err(|err| IrrepError::input_shape(err.to_string()))?
            .decompose(rep.characters(), block.dimension())?;
        Ok(BlockIrreps {
            bands: block.bands(),
            energy: block.energy(),
            band_characters: rep.characters().clone(),
            decomposition,
            approximate: self.approximate,
        })
    }
}

/// Runs `build` with the character threshold of `params`. If this fails with
/// [`IrrepErrorKind::NumericalUnsoundness`] and relaxed tolerance is enabled, `build` is run once
/// more with the threshold doubled, and the outcome is flagged as approximate.
fn with_relaxed_retry<T, F>(params: &IrrepAnalysisParams, build: F) -> Result<(T, bool), IrrepError>
where
    F: Fn(f64) -> Result<T, IrrepError>,
{
    match build(params.character_threshold) {
        Ok(value) => Ok((value, false)),
        Err(err) if err.kind == IrrepErrorKind::NumericalUnsoundness && params.relaxed_tolerance => {
            let relaxed = params.relaxed();
            log::warn!(
                "{err} Retrying with the relaxed character threshold {:.3e}.",
                relaxed.character_threshold
            );
            build(relaxed.character_threshold).map(|value| (value, true))
        }
        Err(err) => Err(err),
    }
}

fn construct_tables(
    little_group: &LittleGroup,
    factor_system: &FactorSystem,
    thresh: f64,
) -> Result<CorepCharacterTable, IrrepError> {
    let unitary = little_group.construct_irrep_character_table(factor_system, thresh)?;
    little_group.construct_corep_character_table(factor_system, unitary, thresh)
}

/// Adapts a little group and a set of states to a spin treatment.
fn apply_spin_mode<'s>(
    little_group: LittleGroup,
    states: &'s BlochStates,
    mode: SpinChannelMode,
) -> Result<(LittleGroup, Cow<'s, BlochStates>), IrrepError> {
    match mode {
        SpinChannelMode::Spinor => {
            if !states.is_spinor() {
                return Err(IrrepError::input_shape(format!(
                    "spinor analysis requested for {states}"
                )));
            }
            Ok((little_group, Cow::Borrowed(states)))
        }
        SpinChannelMode::Scalar => {
            if states.is_spinor() {
                return Err(IrrepError::input_shape(format!(
                    "scalar analysis requested for {states}"
                )));
            }
            Ok((little_group, Cow::Borrowed(states)))
        }
        SpinChannelMode::CollinearChannel(channel) => {
            let subgroup = little_group.spin_preserving_subgroup()?;
            let channel_states = if states.is_spinor() {
                Cow::Owned(states.spin_channel(channel)?)
            } else {
                Cow::Borrowed(states)
            };
            Ok((subgroup, channel_states))
        }
    }
}

/// Classifies the band block `bands` (zero-based, exclusive) of `states` under `little_group`.
///
/// This is the single-block entry point. The little group may come from
/// [`LittleGroupSolver`] or from a caller-supplied operation list via
/// [`LittleGroup::from_operations`]. A supplied character table fixes the order and names of the
/// co-representations. Supplied plane-wave tables are used as they are, or, if
/// [`IrrepAnalysisParams::verify_inputs`] is set, are checked against recomputed ones on a
/// sample of plane waves.
///
/// # Errors
///
/// Any [`IrrepError`] raised while preparing the little group, building the character table,
/// evaluating the band representation or decomposing it.
pub fn compute_irrep(
    little_group: &LittleGroup,
    states: &BlochStates,
    bands: Range<usize>,
    character_table: Option<&ProvidedCharacterTable>,
    plane_wave_tables: Option<&SuppliedPlaneWaveTables>,
    params: &IrrepAnalysisParams,
) -> Result<BlockIrreps, IrrepError> {
    let (little_group, states) =
        apply_spin_mode(little_group.clone(), states, params.spin_channel)?;
    let block = states.block(bands.start, bands.end, params.degeneracy_threshold)?;
    let analysis = LittleGroupAnalysis::new(
        little_group,
        states.basis(),
        states.is_spinor(),
        character_table,
        plane_wave_tables,
        params,
    )?;
    analysis.classify(&block, params)
}

// ------
// Driver
// ------

/// A driver for the irrep analysis of Bloch bands at a set of k-points.
///
/// At each k-point, the little group is solved from the full group, its co-representation table
/// is built, and the selected band range is split into degenerate blocks that are classified one
/// by one. Failures are recorded per block and do not stop the analysis of other blocks.
#[derive(Clone, Builder)]
pub struct BandIrrepAnalysisDriver<'a> {
    /// The control parameters for irrep analysis.
    parameters: &'a IrrepAnalysisParams,

    /// The full space or spin-space group.
    group: &'a SpaceSpinGroup,

    /// The Bloch states at each k-point to be analysed.
    states: &'a [BlochStates],

    /// The zero-based range of bands to analyse. If `None`, all bands are analysed.
    #[builder(default = "None")]
    band_range: Option<Range<usize>>,

    /// Supplied character tables keyed by k-point label.
    #[builder(default = "None")]
    character_tables: Option<&'a IndexMap<String, ProvidedCharacterTable>>,

    /// The result of the irrep analysis.
    #[builder(setter(skip), default = "None")]
    result: Option<IrrepAnalysisResult>,
}

impl<'a> BandIrrepAnalysisDriver<'a> {
    /// Returns a builder to construct a [`BandIrrepAnalysisDriver`] structure.
    pub fn builder() -> BandIrrepAnalysisDriverBuilder<'a> {
        BandIrrepAnalysisDriverBuilder::default()
    }

    fn analyse_kpoint(&self, states: &BlochStates) -> KPointIrreps {
        let params = self.parameters;
        let label = states.kpoint().label(params.k_threshold);
        log_kpoint_begin(&format!("k-point {label}"));
        irssg_output!("{states}");
        irssg_output!("");

        let prepared = LittleGroupSolver::builder()
            .group(self.group)
            .kpoint(states.kpoint())
            .k_threshold(params.k_threshold)
            .build()
            .map_err(|err| IrrepError::input_shape(err.to_string()))
            .and_then(|solver| solver.solve())
            .and_then(|lg| apply_spin_mode(lg, states, params.spin_channel))
            .and_then(|(lg, states)| {
                let provided = self
                    .character_tables
                    .and_then(|tables| tables.get(&label));
                if provided.is_some() {
                    log::debug!("Using the supplied character table for {label}.");
                }
                LittleGroupAnalysis::new(
                    lg,
                    states.basis(),
                    states.is_spinor(),
                    provided,
                    None,
                    params,
                )
                .map(|analysis| (analysis, states))
            });

        let (analysis, states) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                irssg_error!("{err}");
                log_kpoint_end(&format!("k-point {label}"));
                irssg_output!("");
                return KPointIrreps {
                    kpoint: states.kpoint().clone(),
                    character_table: Err(err),
                    blocks: vec![],
                };
            }
        };

        irssg_output!("{}", analysis.little_group());
        if analysis.is_approximate() {
            irssg_warn!("The character table of {label} was built with a relaxed tolerance.");
        }
        if params.write_character_table {
            analysis.character_table().log_output_display();
            irssg_output!("");
        }

        let range = self
            .band_range
            .clone()
            .unwrap_or(0..states.band_number());
        let blocks = states
            .degenerate_ranges(range, params.degeneracy_threshold)
            .into_iter()
            .map(|bands| {
                match states
                    .block(bands.start, bands.end, params.degeneracy_threshold)
                    .and_then(|block| analysis.classify(&block, params))
                {
                    Ok(irreps) => BlockOutcome::Classified(irreps),
                    Err(error) => BlockOutcome::Failed { bands, error },
                }
            })
            .collect_vec();
        log_block_table(&blocks, &states);
        log_kpoint_end(&format!("k-point {label}"));
        irssg_output!("");

        KPointIrreps {
            kpoint: states.kpoint().clone(),
            character_table: Ok(analysis.character_table().clone()),
            blocks,
        }
    }

    /// Executes the irrep analysis.
    fn analyse_bands(&mut self) -> Result<(), anyhow::Error> {
        log_title(&format!("Irrep Analysis in {}", self.group.name()));
        irssg_output!("");
        let params = self.parameters;
        params.log_output_display();

        if let Some(range) = self.band_range.as_ref() {
            if range.start >= range.end {
                return Err(format_err!(
                    "Empty band range {}..{} requested.",
                    range.start + 1,
                    range.end
                ));
            }
        }

        let kpoints = self
            .states
            .iter()
            .map(|states| self.analyse_kpoint(states))
            .collect_vec();
        let result = IrrepAnalysisResult::builder()
            .parameters(params.clone())
            .group_name(self.group.name().to_string())
            .kpoints(kpoints)
            .build()?;

        log_subtitle("Summary");
        irssg_output!("");
        result.log_output_display();
        irssg_output!("");

        if let Some(name) = params.result_save_name.as_ref() {
            write_irssg_binary(name, IrssgFileType::Res, &result)?;
            irssg_output!(
                "Irrep analysis results saved as {name}.{}.",
                IrssgFileType::Res.ext()
            );
            irssg_output!("");
        }

        self.result = Some(result);
        Ok(())
    }
}

fn log_block_table(blocks: &[BlockOutcome], states: &BlochStates) {
    let rule = "┈".repeat(64);
    irssg_output!("{rule}");
    irssg_output!("{:>12} {:>14} {:>4}  {}", "Bands", "Energy", "Dim", "Irreps");
    irssg_output!("{rule}");
    for outcome in blocks.iter() {
        let bands = outcome.bands();
        let band_label = if bands.len() == 1 {
            format!("{}", bands.start + 1)
        } else {
            format!("{}-{}", bands.start + 1, bands.end)
        };
        match outcome {
            BlockOutcome::Classified(irreps) => {
                irssg_output!(
                    "{band_label:>12} {:>+14.6} {:>4}  {irreps}",
                    irreps.energy,
                    bands.len()
                );
            }
            BlockOutcome::Failed { error, .. } => {
                let energy = states.energies()[bands.start];
                irssg_output!(
                    "{band_label:>12} {energy:>+14.6} {:>4}  ✗ {}",
                    bands.len(),
                    error.kind
                );
                irssg_warn!("Bands {band_label}: {error}");
            }
        }
    }
    irssg_output!("{rule}");
}

impl<'a> IrssgDriver for BandIrrepAnalysisDriver<'a> {
    type Params = IrrepAnalysisParams;

    type Outcome = IrrepAnalysisResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No irrep analysis results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.analyse_bands()
    }
}
