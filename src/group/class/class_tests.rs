use approx;

use crate::group::class::ClassStructure;
use crate::group::little_group::{LittleGroup, LittleGroupSolver};
use crate::group::template_groups::{d6h_group, oh_group, p21_group};
use crate::group::SpaceSpinGroup;
use crate::symmetry::kpoint::KPoint;

fn little_group(group: &SpaceSpinGroup, kpoint: &KPoint) -> LittleGroup {
    LittleGroupSolver::builder()
        .group(group)
        .kpoint(kpoint)
        .build()
        .unwrap()
        .solve()
        .unwrap()
}

#[test]
fn test_class_structure_oh_single_and_double() {
    let lg = little_group(&oh_group(), &KPoint::new(0.0, 0.0, 0.0));

    let scalar_table = lg.unitary_twisted_table(&lg.factor_system(false));
    let classes = ClassStructure::new(&scalar_table, 1e-8);
    assert_eq!(classes.class_number(), 10);
    assert_eq!(classes.regular_class_number(), 10);
    assert_eq!(classes.conjugacy_classes()[0], vec![0]);
    let mut sizes = classes
        .conjugacy_classes()
        .iter()
        .map(|c| c.len())
        .collect::<Vec<_>>();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![1, 1, 3, 3, 6, 6, 6, 6, 8, 8]);
    for i in 0..classes.class_number() {
        // Every class of Oh is ambivalent.
        assert_eq!(classes.inverse_class(i), i);
    }
    for (i, class) in classes.conjugacy_classes().iter().enumerate() {
        assert!(class.iter().all(|&g| classes.class_of(g) == i));
    }
    assert_eq!(
        (0..scalar_table.order())
            .map(|g| classes.class_of(g))
            .max(),
        Some(classes.class_number() - 1)
    );

    let spinor_table = lg.unitary_twisted_table(&lg.factor_system(true));
    let spinor_classes = ClassStructure::new(&spinor_table, 1e-8);
    assert_eq!(spinor_classes.class_number(), 10);
    assert_eq!(spinor_classes.regular_class_number(), 6);
}

#[test]
fn test_class_structure_representative_phases() {
    let lg = little_group(&oh_group(), &KPoint::new(0.0, 0.0, 0.0));
    let table = lg.unitary_twisted_table(&lg.factor_system(false));
    let classes = ClassStructure::new(&table, 1e-8);
    for g in 0..table.order() {
        approx::assert_relative_eq!(classes.representative_phase(g).re, 1.0, epsilon = 1e-10);
    }
}

#[test]
fn test_class_structure_projective_abelian() {
    let lg = little_group(&p21_group(), &KPoint::new(0.0, 0.5, 0.0));
    let table = lg.unitary_twisted_table(&lg.factor_system(false));
    let classes = ClassStructure::new(&table, 1e-8);
    assert_eq!(classes.class_number(), 2);
    assert_eq!(classes.regular_class_number(), 2);
    assert_eq!(classes.class_label(1), "1|K2|");
}

#[test]
fn test_class_structure_d3h() {
    let lg = little_group(&d6h_group(), &KPoint::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
    let table = lg.unitary_twisted_table(&lg.factor_system(false));
    let classes = ClassStructure::new(&table, 1e-8);
    assert_eq!(classes.class_number(), 6);
    assert_eq!(classes.regular_class_number(), 6);
}
