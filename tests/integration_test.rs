use nalgebra::{Matrix3, Vector3};
use ndarray::{array, Array1, Array2, Axis};
use num_complex::Complex;

use irssg::analysis::IrrepErrorKind;
use irssg::chartab::chartab_symbols::{LinearSpaceSymbol, ReducibleLinearSpaceSymbol};
use irssg::chartab::provided::ProvidedCharacterTable;
use irssg::drivers::irrep_analysis::{
    compute_irrep, BlockIrreps, IrrepAnalysisParams, LittleGroupAnalysis, SpinChannelMode,
};
use irssg::group::little_group::{LittleGroup, LittleGroupSolver};
use irssg::group::SpaceSpinGroup;
use irssg::symmetry::kpoint::KPoint;
use irssg::symmetry::space_spin_operation::{lift_so3_to_su2, SpaceSpinOperation};
use irssg::target::bloch::{BlochStates, PlaneWaveBasis};

type C128 = Complex<f64>;

fn c(re: f64) -> C128 {
    C128::new(re, 0.0)
}

fn operation(rotation: Matrix3<i32>, lattice: &Matrix3<f64>) -> SpaceSpinOperation {
    let lattice_inv = lattice.try_inverse().unwrap();
    let cart = lattice * rotation.map(f64::from) * lattice_inv;
    let so3 = cart * cart.determinant().signum();
    SpaceSpinOperation::builder()
        .rotation(rotation)
        .so3(so3)
        .su2(lift_so3_to_su2(&so3))
        .build()
        .unwrap()
}

fn pm3m() -> SpaceSpinGroup {
    let cubic = Matrix3::identity();
    SpaceSpinGroup::generate(
        "Pm-3m",
        &[
            operation(Matrix3::new(0, -1, 0, 1, 0, 0, 0, 0, 1), &cubic),
            operation(Matrix3::new(0, 0, 1, 1, 0, 0, 0, 1, 0), &cubic),
            operation(-Matrix3::identity(), &cubic),
        ],
        1e-6,
    )
    .unwrap()
}

fn p6mmm() -> SpaceSpinGroup {
    let hex = Matrix3::new(1.0, -0.5, 0.0, 0.0, 3.0f64.sqrt() / 2.0, 0.0, 0.0, 0.0, 1.6);
    SpaceSpinGroup::generate(
        "P6/mmm",
        &[
            operation(Matrix3::new(1, -1, 0, 1, 0, 0, 0, 0, 1), &hex),
            operation(Matrix3::new(1, -1, 0, 0, -1, 0, 0, 0, -1), &hex),
            operation(-Matrix3::identity(), &hex),
        ],
        1e-6,
    )
    .unwrap()
}

fn grey_p_1() -> SpaceSpinGroup {
    SpaceSpinGroup::generate("P-1", &[operation(-Matrix3::identity(), &Matrix3::identity())], 1e-6)
        .unwrap()
        .with_time_reversal(true)
        .unwrap()
}

fn little_group(group: &SpaceSpinGroup, kpoint: &KPoint) -> LittleGroup {
    LittleGroupSolver::builder()
        .group(group)
        .kpoint(kpoint)
        .build()
        .unwrap()
        .solve()
        .unwrap()
}

fn scalar_params() -> IrrepAnalysisParams {
    IrrepAnalysisParams::builder()
        .spin_channel(SpinChannelMode::Scalar)
        .build()
        .unwrap()
}

/// Names the rows of the computed co-representation table that occur in `reference`, in the
/// given order, by their characters.
fn name_rows(
    lg: &LittleGroup,
    states: &BlochStates,
    reference: &BlockIrreps,
    names: &[(&str, Box<dyn Fn(&Array1<C128>) -> bool>)],
    params: &IrrepAnalysisParams,
) -> ProvidedCharacterTable {
    let analysis =
        LittleGroupAnalysis::new(lg.clone(), states.basis(), states.is_spinor(), None, None, params)
            .unwrap();
    let table = analysis.character_table();
    let occurring = reference
        .multiplicities()
        .iter()
        .enumerate()
        .filter(|(_, &m)| m > 0)
        .map(|(row, _)| row)
        .collect::<Vec<_>>();
    let rows = names
        .iter()
        .map(|(_, selects)| {
            *occurring
                .iter()
                .find(|&&row| selects(&table.characters().row(row).to_owned()))
                .unwrap()
        })
        .collect::<Vec<_>>();
    ProvidedCharacterTable::new(
        names.iter().map(|(name, _)| name.to_string()).collect(),
        table.characters().select(Axis(0), &rows),
    )
    .unwrap()
}

/// Checks that the multiplicities weighted by the dimensions of the rows they count add up to the
/// block size. The table is rebuilt with the same supplied names so that its rows are in the
/// order the multiplicities refer to.
fn assert_dimension_sum(
    lg: &LittleGroup,
    states: &BlochStates,
    provided: Option<&ProvidedCharacterTable>,
    irreps: &BlockIrreps,
    m: usize,
) {
    let params = if states.is_spinor() {
        IrrepAnalysisParams::default()
    } else {
        scalar_params()
    };
    let analysis = LittleGroupAnalysis::new(
        lg.clone(),
        states.basis(),
        states.is_spinor(),
        provided,
        None,
        &params,
    )
    .unwrap();
    let table = analysis.character_table();
    assert_eq!(table.rows().len(), irreps.multiplicities().len());
    let total = irreps
        .multiplicities()
        .iter()
        .zip(table.rows().iter())
        .map(|(mult, row)| mult * row.symbol.dimensionality())
        .sum::<usize>();
    assert_eq!(total, m);
    assert_eq!(irreps.decomposition.symbol().dimensionality(), m);
}

#[test]
fn test_oh_gamma_t1u() {
    let group = pm3m();
    let basis = PlaneWaveBasis::new(vec![
        Vector3::new(1, 0, 0),
        Vector3::new(-1, 0, 0),
        Vector3::new(0, 1, 0),
        Vector3::new(0, -1, 0),
        Vector3::new(0, 0, 1),
        Vector3::new(0, 0, -1),
    ])
    .unwrap();
    let s = 0.5f64.sqrt();
    let z = c(0.0);
    let states = BlochStates::scalar(
        KPoint::new(0.0, 0.0, 0.0),
        basis,
        Array1::from_elem(3, -2.5),
        array![
            [c(s), c(-s), z, z, z, z],
            [z, z, c(s), c(-s), z, z],
            [z, z, z, z, c(s), c(-s)],
        ],
    )
    .unwrap();
    let lg = little_group(&group, states.kpoint());
    assert_eq!(lg.order(), 48);
    let params = scalar_params();

    let inversion = lg
        .operations()
        .iter()
        .position(|op| op.rotation == -Matrix3::identity())
        .unwrap();
    let reference = compute_irrep(&lg, &states, 0..3, None, None, &params).unwrap();
    let provided = name_rows(
        &lg,
        &states,
        &reference,
        &[(
            "T1u",
            Box::new(move |chars: &Array1<C128>| (chars[inversion].re + 3.0).abs() < 1e-6),
        )],
        &params,
    );

    let irreps = compute_irrep(&lg, &states, 0..3, Some(&provided), None, &params).unwrap();
    assert_eq!(irreps.to_string(), "T1u");
    assert_eq!(irreps.multiplicities()[0], 1);
    assert_eq!(irreps.multiplicities().iter().sum::<usize>(), 1);
    approx::assert_relative_eq!(irreps.band_characters[0].re, 3.0, epsilon = 1e-10);
    approx::assert_relative_eq!(irreps.band_characters[inversion].re, -3.0, epsilon = 1e-10);
    assert_dimension_sum(&lg, &states, Some(&provided), &irreps, 3);

    // The named row comes first and is the three-dimensional one.
    let analysis =
        LittleGroupAnalysis::new(lg.clone(), states.basis(), false, Some(&provided), None, &params)
            .unwrap();
    assert_eq!(analysis.character_table().rows()[0].symbol.dimensionality(), 3);
}

#[test]
fn test_pm3m_x_accidental_degeneracy() {
    let group = pm3m();
    let basis = PlaneWaveBasis::new(vec![Vector3::new(0, 0, 0), Vector3::new(-1, 0, 0)]).unwrap();
    let s = 0.5f64.sqrt();
    // cos(πx) and sin(πx) up to normalisation.
    let states = BlochStates::scalar(
        KPoint::new(0.5, 0.0, 0.0),
        basis,
        array![1.25, 1.25],
        array![[c(s), c(s)], [c(s), c(-s)]],
    )
    .unwrap();
    let lg = little_group(&group, states.kpoint());
    assert_eq!(lg.order(), 16);
    let params = scalar_params();
    let inversion = lg
        .operations()
        .iter()
        .position(|op| op.rotation == -Matrix3::identity())
        .unwrap();

    let reference = compute_irrep(&lg, &states, 0..2, None, None, &params).unwrap();
    assert_eq!(reference.multiplicities().iter().sum::<usize>(), 2);
    let provided = name_rows(
        &lg,
        &states,
        &reference,
        &[
            (
                "X3",
                Box::new(move |chars: &Array1<C128>| chars[inversion].re > 0.5),
            ),
            (
                "X4",
                Box::new(move |chars: &Array1<C128>| chars[inversion].re < -0.5),
            ),
        ],
        &params,
    );

    let irreps = compute_irrep(&lg, &states, 0..2, Some(&provided), None, &params).unwrap();
    assert_eq!(irreps.to_string(), "X3 ⊕ X4");
    assert_eq!(&irreps.multiplicities()[0..2], &[1, 1]);
    assert_dimension_sum(&lg, &states, Some(&provided), &irreps, 2);
}

fn kramers_states(kpoint: KPoint, energies: Array1<f64>) -> BlochStates {
    let basis = PlaneWaveBasis::new(vec![Vector3::new(0, 0, 0)]).unwrap();
    // Spin-up rows first, then spin-down rows.
    let mut coefficients = Array2::<C128>::zeros((2 * energies.len(), 1));
    coefficients[(0, 0)] = c(1.0);
    if energies.len() > 1 {
        coefficients[(2 * energies.len() - 1, 0)] = c(-1.0);
    }
    BlochStates::from_spin_blocks(kpoint, basis, energies, &coefficients).unwrap()
}

#[test]
fn test_kramers_doubling_at_generic_k() {
    let group = grey_p_1();
    let kpoint = KPoint::new(0.137, 0.291, 0.433);
    let lg = little_group(&group, &kpoint);
    assert_eq!(lg.order(), 2);
    assert_eq!(lg.unitary_order(), 1);
    let params = IrrepAnalysisParams::default();

    let pair = kramers_states(kpoint.clone(), array![0.3, 0.3]);
    let irreps = compute_irrep(&lg, &pair, 0..2, None, None, &params).unwrap();
    assert_eq!(irreps.decomposition.symbol().dimensionality() % 2, 0);
    assert!(irreps.decomposition.has_torsion());
    assert_dimension_sum(&lg, &pair, None, &irreps, 2);

    let half = compute_irrep(&lg, &pair, 0..1, None, None, &params).unwrap_err();
    assert_eq!(half.kind, IrrepErrorKind::DegeneracyAmbiguity);

    let single = kramers_states(kpoint, array![0.3]);
    let err = compute_irrep(&lg, &single, 0..1, None, None, &params).unwrap_err();
    assert_eq!(err.kind, IrrepErrorKind::DegeneracyAmbiguity);
}

#[test]
fn test_graphene_k_e_prime() {
    let group = p6mmm();
    let kpoint = KPoint::new(1.0 / 3.0, 1.0 / 3.0, 0.0);
    let basis = PlaneWaveBasis::new(vec![
        Vector3::new(0, 0, 0),
        Vector3::new(0, -1, 0),
        Vector3::new(-1, 0, 0),
    ])
    .unwrap();
    let a = 0.5f64.sqrt();
    let b = (1.0f64 / 6.0).sqrt();
    let states = BlochStates::scalar(
        kpoint,
        basis,
        array![-0.8, 0.0, 0.0],
        array![
            [c(1.0 / 3.0f64.sqrt()), c(1.0 / 3.0f64.sqrt()), c(1.0 / 3.0f64.sqrt())],
            [c(a), c(-a), c(0.0)],
            [c(b), c(b), c(-2.0 * b)],
        ],
    )
    .unwrap();
    let lg = little_group(&group, states.kpoint());
    assert_eq!(lg.order(), 12);
    let params = scalar_params();

    let reference = compute_irrep(&lg, &states, 1..3, None, None, &params).unwrap();
    let provided = name_rows(
        &lg,
        &states,
        &reference,
        &[(
            "E'",
            Box::new(|chars: &Array1<C128>| (chars[0].re - 2.0).abs() < 1e-6),
        )],
        &params,
    );
    let irreps = compute_irrep(&lg, &states, 1..3, Some(&provided), None, &params).unwrap();
    assert_eq!(irreps.to_string(), "E'");
    assert_eq!(irreps.multiplicities()[0], 1);
    assert_dimension_sum(&lg, &states, Some(&provided), &irreps, 2);

    // The symmetric combination is a one-dimensional irrep on its own.
    let singlet = compute_irrep(&lg, &states, 0..1, None, None, &params).unwrap();
    assert_eq!(singlet.decomposition.symbol().dimensionality(), 1);
}

#[test]
fn test_group_without_identity() {
    let inversion = operation(-Matrix3::identity(), &Matrix3::identity());
    let err = SpaceSpinGroup::new(
        "broken",
        vec![inversion.clone(), SpaceSpinOperation::identity()],
        1e-6,
    )
    .unwrap_err();
    assert_eq!(err.kind, IrrepErrorKind::InvariantViolation);

    let err = LittleGroup::from_operations(
        vec![inversion, SpaceSpinOperation::identity()],
        2,
        &KPoint::new(0.0, 0.0, 0.0),
        1e-6,
    )
    .unwrap_err();
    assert_eq!(err.kind, IrrepErrorKind::InvariantViolation);
}

#[test]
fn test_split_block() {
    let group = grey_p_1();
    let kpoint = KPoint::new(0.137, 0.291, 0.433);
    let lg = little_group(&group, &kpoint);
    let split = kramers_states(kpoint, array![0.3, 0.8]);
    let err = compute_irrep(&lg, &split, 0..2, None, None, &IrrepAnalysisParams::default())
        .unwrap_err();
    assert_eq!(err.kind, IrrepErrorKind::DegeneracyAmbiguity);
}

#[test]
fn test_trivial_group_multiplicity() {
    let group = SpaceSpinGroup::new("P1", vec![SpaceSpinOperation::identity()], 1e-6).unwrap();
    let kpoint = KPoint::new(0.21, 0.05, 0.4);
    let lg = little_group(&group, &kpoint);
    let basis = PlaneWaveBasis::new(vec![
        Vector3::new(0, 0, 0),
        Vector3::new(1, 0, 0),
        Vector3::new(0, 1, 0),
        Vector3::new(0, 0, 1),
    ])
    .unwrap();
    let states = BlochStates::scalar(
        kpoint,
        basis,
        array![0.7, 0.7, 0.7],
        array![
            [c(1.0), c(0.0), c(0.0), c(0.0)],
            [c(0.0), c(0.6), c(0.8), c(0.0)],
            [c(0.0), c(0.0), c(0.0), C128::new(0.0, 1.0)],
        ],
    )
    .unwrap();
    let params = scalar_params();
    let irreps = compute_irrep(&lg, &states, 0..3, None, None, &params).unwrap();
    assert_eq!(irreps.to_string(), "3·Γ₁");
    assert_eq!(irreps.multiplicities(), &[3]);

    let again = compute_irrep(&lg, &states, 0..3, None, None, &params).unwrap();
    assert_eq!(irreps.to_string(), again.to_string());
}
