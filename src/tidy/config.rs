use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LwyiError, Result};
use crate::model::Target;

/// Policy over the dependency DAG: which strongly connected clusters are
/// tolerated, and which edges must never exist.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TidyConfig {
    pub forbidden_dependencies: BTreeMap<Target, BTreeSet<Target>>,
    pub allowed_clusters: Vec<BTreeSet<Target>>,
}

pub fn load_config(path: &Path) -> Result<TidyConfig> {
    let raw = fs::read_to_string(path).map_err(|source| LwyiError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|err| LwyiError::parse(path, &err))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
