use ndarray::{array, Array1};
use num_complex::Complex;

use crate::analysis::decomposition::IrrepDecomposer;
use crate::analysis::IrrepErrorKind;
use crate::chartab::chartab_group::CharacterProperties;
use crate::chartab::chartab_symbols::LinearSpaceSymbol;
use crate::chartab::CorepCharacterTable;
use crate::group::little_group::{LittleGroup, LittleGroupSolver};
use crate::group::template_groups::{grey_p_1_group, oh_group, p21_group, trivial_group};
use crate::group::SpaceSpinGroup;
use crate::symmetry::kpoint::KPoint;

type C128 = Complex<f64>;

fn c(re: f64, im: f64) -> C128 {
    C128::new(re, im)
}

fn corep_table(group: &SpaceSpinGroup, kpoint: &KPoint, spinor: bool) -> (LittleGroup, CorepCharacterTable) {
    let lg = LittleGroupSolver::builder()
        .group(group)
        .kpoint(kpoint)
        .build()
        .unwrap()
        .solve()
        .unwrap();
    let fs = lg.factor_system(spinor);
    let unitary = lg.construct_irrep_character_table(&fs, 1e-6).unwrap();
    let table = lg
        .construct_corep_character_table(&fs, unitary, 1e-6)
        .unwrap();
    (lg, table)
}

#[test]
fn test_decomposition_trivial_group() {
    let (_, table) = corep_table(&trivial_group(), &KPoint::new(0.3, 0.1, 0.7), false);
    let decomposer = IrrepDecomposer::builder().table(&table).build().unwrap();

    let single = decomposer.decompose(&array![c(1.0, 0.0)], 1).unwrap();
    assert_eq!(single.to_string(), "Γ₁");
    let triple = decomposer.decompose(&array![c(3.0, 0.0)], 3).unwrap();
    assert_eq!(triple.to_string(), "3·Γ₁");
    assert_eq!(triple.multiplicities(), &[3]);
    assert!(!triple.has_torsion());

    assert_eq!(
        decomposer
            .decompose(&array![c(1.5, 0.0)], 1)
            .unwrap_err()
            .kind,
        IrrepErrorKind::DecompositionInconsistent
    );
    assert_eq!(
        decomposer
            .decompose(&array![c(2.0, 0.0)], 3)
            .unwrap_err()
            .kind,
        IrrepErrorKind::DecompositionInconsistent
    );
    assert_eq!(
        decomposer
            .decompose(&array![c(1.0, 0.0), c(1.0, 0.0)], 1)
            .unwrap_err()
            .kind,
        IrrepErrorKind::InputShape
    );
}

#[test]
fn test_decomposition_tolerates_small_noise() {
    let (_, table) = corep_table(&trivial_group(), &KPoint::new(0.0, 0.0, 0.0), false);
    let decomposer = IrrepDecomposer::builder()
        .table(&table)
        .multiplicity_threshold(0.05)
        .build()
        .unwrap();
    let result = decomposer.decompose(&array![c(2.03, -0.01)], 2).unwrap();
    assert_eq!(result.to_string(), "2·Γ₁");
}

#[test]
fn test_decomposition_t1u_like_block() {
    let (lg, table) = corep_table(&oh_group(), &KPoint::new(0.0, 0.0, 0.0), false);
    let band_characters: Array1<C128> = lg
        .operations()
        .iter()
        .map(|op| c(op.rotation.trace() as f64, 0.0))
        .collect();
    let decomposer = IrrepDecomposer::builder().table(&table).build().unwrap();
    let result = decomposer.decompose(&band_characters, 3).unwrap();
    assert_eq!(result.multiplicities().iter().sum::<usize>(), 1);
    let row = result
        .multiplicities()
        .iter()
        .position(|&m| m == 1)
        .unwrap();
    assert_eq!(table.rows()[row].symbol.dimensionality(), 3);
    assert_eq!(result.to_string(), table.rows()[row].symbol.label());
}

#[test]
fn test_decomposition_kramers_doubling() {
    let (_, table) = corep_table(&grey_p_1_group(), &KPoint::new(0.11, 0.23, 0.37), true);
    let decomposer = IrrepDecomposer::builder().table(&table).build().unwrap();

    let pair = decomposer
        .decompose(&array![c(2.0, 0.0), c(0.0, 0.0)], 2)
        .unwrap();
    assert_eq!(pair.to_string(), "Γ₁Γ₁");
    assert!(pair.has_torsion());
    assert_eq!(pair.unitary_multiplicities(), &[2]);

    let single = decomposer
        .decompose(&array![c(1.0, 0.0), c(0.0, 0.0)], 1)
        .unwrap_err();
    assert_eq!(single.kind, IrrepErrorKind::DegeneracyAmbiguity);
}

#[test]
fn test_decomposition_paired_irreps() {
    let grey = p21_group().with_time_reversal(false).unwrap();
    let (lg, table) = corep_table(&grey, &KPoint::new(0.0, 0.5, 0.0), false);
    let decomposer = IrrepDecomposer::builder().table(&table).build().unwrap();
    let unitary = lg.unitary_indices();
    let mut band_characters = Array1::<C128>::zeros(lg.order());

    band_characters[unitary[0]] = c(2.0, 0.0);
    let pair = decomposer.decompose(&band_characters, 2).unwrap();
    assert_eq!(pair.to_string(), "Γ₁Γ₂");

    // Only one of the two conjugate irreps.
    band_characters[unitary[0]] = c(1.0, 0.0);
    band_characters[unitary[1]] = c(0.0, 1.0);
    let err = decomposer.decompose(&band_characters, 1).unwrap_err();
    assert_eq!(err.kind, IrrepErrorKind::DegeneracyAmbiguity);
}
