use approx;

use crate::analysis::{IrrepError, IrrepErrorKind};
use crate::interfaces::catalogue::GroupCatalogue;

const CATALOGUE: &str = r#"
- identifier: "2.4"
  operations:
    - "1 0 0 0 1 0 0 0 1  0 0 0  0"
    - "-1 0 0 0 -1 0 0 0 -1  0 0 0  0"
    - "1 0 0 0 1 0 0 0 1  0 0 0  1"
    - "-1 0 0 0 -1 0 0 0 -1  0 0 0  1"
  irreps:
    "Γ":
      names: ["Ag", "Au"]
      characters:
        - [[1.0, 0.0], [1.0, 0.0], [1.0, 0.0], [1.0, 0.0]]
        - [[1.0, 0.0], [-1.0, 0.0], [1.0, 0.0], [-1.0, 0.0]]
- identifier: "4.7"
  operations:
    - "1 0 0 0 1 0 0 0 1  0 0 0  0"
    - "-1 0 0 0 1 0 0 0 -1  0 1/2 0  -1 0 0 0 1 0 0 0 -1  0"
- identifier: "broken"
  operations:
    - "-1 0 0 0 -1 0 0 0 -1  0 0 0  0"
    - "1 0 0 0 1 0 0 0 1  0 0 0  0"
"#;

#[test]
fn test_catalogue_lookup() {
    let catalogue = GroupCatalogue::from_yaml_str(CATALOGUE, 1e-6).unwrap();
    assert_eq!(
        catalogue.identifiers().collect::<Vec<_>>(),
        vec!["2.4", "4.7", "broken"]
    );

    let grey = catalogue.lookup_group("2.4").unwrap();
    assert_eq!(grey.order(), 4);
    assert_eq!(grey.name(), "2.4");
    assert_eq!(
        grey.operations().iter().filter(|op| op.antiunitary).count(),
        2
    );

    let screw = catalogue.lookup_group("4.7").unwrap();
    assert_eq!(screw.order(), 2);
    approx::assert_relative_eq!(screw.operations()[1].translation[1], 0.5);
    // The spin rotation of a two-fold rotation about b is lifted from its SO(3) part.
    approx::assert_relative_eq!(screw.operations()[1].su2[(0, 0)].norm(), 0.0, epsilon = 1e-12);

    let missing = catalogue.lookup_group("225.1").unwrap_err();
    assert!(missing.to_string().contains("225.1"));
}

#[test]
fn test_catalogue_malformed_group() {
    let catalogue = GroupCatalogue::from_yaml_str(CATALOGUE, 1e-6).unwrap();
    let err = catalogue.lookup_group("broken").unwrap_err();
    let irrep_err = err.downcast_ref::<IrrepError>().unwrap();
    assert_eq!(irrep_err.kind, IrrepErrorKind::InvariantViolation);
}

#[test]
fn test_catalogue_character_tables() {
    let catalogue = GroupCatalogue::from_yaml_str(CATALOGUE, 1e-6).unwrap();
    let tables = catalogue.character_tables("2.4").unwrap();
    assert_eq!(tables.len(), 1);
    let gamma = &tables["Γ"];
    assert_eq!(gamma.names(), &["Ag".to_string(), "Au".to_string()]);
    assert_eq!(gamma.characters().dim(), (2, 4));
    approx::assert_relative_eq!(gamma.characters()[(1, 1)].re, -1.0);

    assert!(catalogue.character_tables("4.7").unwrap().is_empty());
}

#[test]
fn test_catalogue_rejects_bad_input() {
    let duplicated = r#"
- identifier: "1.1"
  operations: ["1 0 0 0 1 0 0 0 1  0 0 0  0"]
- identifier: "1.1"
  operations: ["1 0 0 0 1 0 0 0 1  0 0 0  0"]
"#;
    assert!(GroupCatalogue::from_yaml_str(duplicated, 1e-6).is_err());

    let bad_line = r#"
- identifier: "1.1"
  operations: ["1 0 0 0 1 0 0 0 1  0 0  0"]
"#;
    let catalogue = GroupCatalogue::from_yaml_str(bad_line, 1e-6).unwrap();
    assert!(catalogue.lookup_group("1.1").is_err());

    let ragged = r#"
- identifier: "1.1"
  operations: ["1 0 0 0 1 0 0 0 1  0 0 0  0"]
  irreps:
    "Γ":
      names: ["A", "B"]
      characters: [[[1.0, 0.0]], [[1.0, 0.0], [1.0, 0.0]]]
"#;
    let catalogue = GroupCatalogue::from_yaml_str(ragged, 1e-6).unwrap();
    assert!(catalogue.character_tables("1.1").is_err());
}
