use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LwyiError, Result};

use super::{Target, TargetData, TargetModel};

/// One target object from the build description. Exactly the seven known
/// array names are accepted; anything else fails the load with a message
/// naming the offending key. Paths are kept as written.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawTargetData {
    interface_headers: Vec<String>,
    interface_include_directories: Vec<String>,
    interface_include_prefixes: Vec<String>,
    interface_dependencies: Vec<String>,
    dependencies: Vec<String>,
    sources: Vec<String>,
    verify_interface_header_sets_sources: Vec<String>,
}

impl From<RawTargetData> for TargetData {
    fn from(raw: RawTargetData) -> Self {
        Self {
            interface_headers: raw.interface_headers.into_iter().map(PathBuf::from).collect(),
            interface_include_directories: raw
                .interface_include_directories
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            interface_include_prefixes: raw.interface_include_prefixes.into_iter().collect(),
            interface_dependencies: raw
                .interface_dependencies
                .into_iter()
                .map(Target::new)
                .collect(),
            dependencies: raw.dependencies.into_iter().map(Target::new).collect(),
            sources: raw.sources.into_iter().map(PathBuf::from).collect(),
            verify_interface_header_sets_sources: raw
                .verify_interface_header_sets_sources
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

/// Stateful loader for build-description files.
///
/// Successive `load_json` calls accumulate targets; `make_target_model`
/// consumes the accumulator and hands back the immutable model.
#[derive(Debug, Default)]
pub struct TargetModelLoader {
    entries: Vec<(Target, TargetData)>,
}

impl TargetModelLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_json(&mut self, path: &Path) -> Result<()> {
        let raw = fs::read_to_string(path).map_err(|source| LwyiError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let targets: BTreeMap<String, RawTargetData> =
            serde_json::from_str(&raw).map_err(|err| LwyiError::parse(path, &err))?;

        self.entries.extend(
            targets
                .into_iter()
                .map(|(name, raw)| (Target::new(name), TargetData::from(raw))),
        );
        Ok(())
    }

    pub fn make_target_model(&mut self) -> TargetModel {
        TargetModel::new(std::mem::take(&mut self.entries))
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
