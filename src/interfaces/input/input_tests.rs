use std::fs;
use std::path::PathBuf;

use crate::drivers::irrep_analysis::SpinChannelMode;
use crate::interfaces::input::{one_based_range, BandDataSource, Input};
use crate::interfaces::InputHandle;
use crate::io::{write_irssg_binary, IrssgFileType};
use crate::target::bloch::template_states::kramers_pair_states;

const GREY_CATALOGUE: &str = r#"
- identifier: "1.2"
  operations:
    - "1 0 0 0 1 0 0 0 1  0 0 0  0"
    - "1 0 0 0 1 0 0 0 1  0 0 0  1 0 0 0 1 0 0 0 1  0 0 1 0 -1 0 0 0  1"
"#;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("irssg_input_{tag}_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn grey_input(dir: &PathBuf) -> Input {
    let catalogue = dir.join("catalogue.yml");
    fs::write(&catalogue, GREY_CATALOGUE).unwrap();
    let bands = dir.join("kramers");
    write_irssg_binary(&bands, IrssgFileType::Bands, &vec![kramers_pair_states()]).unwrap();
    Input {
        catalogue,
        group: "1.2".to_string(),
        bands: BandDataSource::Binary(bands.to_string_lossy().to_string()),
        kpoints: None,
        band_range: None,
        parameters: Default::default(),
        result_yaml: None,
    }
}

#[test]
fn test_input_yaml_defaults() {
    let yaml = r#"
catalogue: groups.yml
group: "221.1"
bands: !Binary wavefunctions
band_range: [5, 8]
parameters:
  degeneracy_threshold: 0.001
  spin_channel: !CollinearChannel 1
"#;
    let input: Input = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(input.group, "221.1");
    assert_eq!(input.bands, BandDataSource::Binary("wavefunctions".to_string()));
    assert_eq!(input.kpoints, None);
    assert_eq!(input.band_range, Some((5, 8)));
    assert_eq!(
        input.parameters.spin_channel,
        SpinChannelMode::CollinearChannel(1)
    );
    assert!(input.parameters.write_character_table);
    assert_eq!(input.result_yaml, None);
}

#[test]
fn test_input_one_based_ranges() {
    assert_eq!(one_based_range(None, 4, "band").unwrap(), 0..4);
    assert_eq!(one_based_range(Some((2, 3)), 4, "band").unwrap(), 1..3);
    assert_eq!(one_based_range(Some((4, 4)), 4, "band").unwrap(), 3..4);
    assert!(one_based_range(Some((0, 2)), 4, "band").is_err());
    assert!(one_based_range(Some((3, 2)), 4, "band").is_err());
    assert!(one_based_range(Some((1, 5)), 4, "band").is_err());
}

#[test]
fn test_input_handle_grey_group() {
    let dir = scratch_dir("grey");
    let mut input = grey_input(&dir);
    input.validate().unwrap();
    input.handle().unwrap();

    input.result_yaml = Some(dir.join("result").to_string_lossy().to_string());
    input.handle().unwrap();
    assert!(dir.join("result.yml").exists());

    // Half a Kramers pair cannot be classified.
    input.band_range = Some((1, 1));
    assert!(input.handle().is_err());

    input.band_range = Some((1, 3));
    assert!(input.validate().is_err());

    input.group = "2.4".to_string();
    assert!(input.validate().is_err());

    fs::remove_dir_all(&dir).unwrap();
}
