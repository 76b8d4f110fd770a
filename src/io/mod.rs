//! File input and output for IrSSG.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{self, format_err};
use bincode;
use serde::{de::DeserializeOwned, Serialize};
use serde_yaml;

pub(crate) mod format;

#[cfg(test)]
#[path = "io_tests.rs"]
mod io_tests;

/// Binary files written and read by IrSSG.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrssgFileType {
    /// Variant for binary files containing Bloch-state band data.
    Bands,

    /// Variant for binary files containing irrep-analysis results.
    Res,
}

impl IrssgFileType {
    pub fn ext(&self) -> String {
        match self {
            IrssgFileType::Bands => "irssg.bands".to_string(),
            IrssgFileType::Res => "irssg.res".to_string(),
        }
    }
}

/// Deserialises band data or results from `name` with the extension of `file_type` appended.
pub fn read_irssg_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: IrssgFileType,
) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension(file_type.ext());
    let mut reader = BufReader::new(
        File::open(&path).map_err(|err| format_err!("Unable to open {}: {err}", path.display()))?,
    );
    bincode::deserialize_from(&mut reader).map_err(|err| format_err!(err))
}

/// Serialises `value` with `bincode` into `name` with the extension of `file_type` appended.
pub fn write_irssg_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: IrssgFileType,
    value: &T,
) -> Result<(), anyhow::Error>
where
    T: Serialize,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension(file_type.ext());
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, value).map_err(|err| format_err!(err))
}

/// Reads an input or result YAML file. `name` must carry its `.yml` or `.yaml` extension.
pub fn read_irssg_yaml<T, P: AsRef<Path>>(name: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let path = name.as_ref();
    let mut reader = BufReader::new(
        File::open(path).map_err(|err| format_err!("Unable to open {}: {err}", path.display()))?,
    );
    serde_yaml::from_reader(&mut reader).map_err(|err| format_err!(err))
}

/// Writes `value` as YAML to `name`, whose extension is replaced by `.yml`.
pub fn write_irssg_yaml<T, P: AsRef<Path>>(name: P, value: &T) -> Result<(), anyhow::Error>
where
    T: Serialize,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension("yml");
    let mut writer = BufWriter::new(File::create(path)?);
    serde_yaml::to_writer(&mut writer, value).map_err(|err| format_err!(err))
}
