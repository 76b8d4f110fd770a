use std::fs;

use crate::drivers::irrep_analysis::IrrepAnalysisParams;
use crate::io::{
    read_irssg_binary, read_irssg_yaml, write_irssg_binary, write_irssg_yaml, IrssgFileType,
};
use crate::target::bloch::template_states::t1u_states;
use crate::target::bloch::BlochStates;

#[test]
fn test_io_file_extensions() {
    assert_eq!(IrssgFileType::Bands.ext(), "irssg.bands");
    assert_eq!(IrssgFileType::Res.ext(), "irssg.res");
}

#[test]
fn test_io_band_data_files() {
    let dir = std::env::temp_dir().join(format!("irssg_io_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let states = vec![t1u_states()];
    let name = dir.join("t1u");
    write_irssg_binary(&name, IrssgFileType::Bands, &states).unwrap();
    assert!(dir.join("t1u.irssg.bands").exists());
    let read: Vec<BlochStates> = read_irssg_binary(&name, IrssgFileType::Bands).unwrap();
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].coefficients(), states[0].coefficients());
    assert_eq!(read[0].basis().gvectors(), states[0].basis().gvectors());
    read[0].check().unwrap();

    let params = IrrepAnalysisParams::builder()
        .verify_inputs(true)
        .build()
        .unwrap();
    write_irssg_yaml(dir.join("params"), &params).unwrap();
    let read_params: IrrepAnalysisParams = read_irssg_yaml(dir.join("params.yml")).unwrap();
    assert!(read_params.verify_inputs);

    assert!(read_irssg_binary::<Vec<BlochStates>, _>(dir.join("absent"), IrssgFileType::Bands)
        .is_err());
    fs::remove_dir_all(&dir).unwrap();
}
