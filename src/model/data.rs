use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::path_utils::is_in_directory;

use super::Target;

/// Per-target facts drawn from the build description.
///
/// All paths are expected to be absolute; they are kept verbatim as loaded
/// and normalization happens on the query side (scanner and resolver).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TargetData {
    /// Explicit interface headers.
    pub interface_headers: BTreeSet<PathBuf>,
    /// Header search roots contributing interface headers.
    pub interface_include_directories: BTreeSet<PathBuf>,
    /// When non-empty, a directory D contributes a header only if the header
    /// lies under D/p for some prefix p.
    pub interface_include_prefixes: BTreeSet<String>,
    /// Link dependencies visible to consumers.
    pub interface_dependencies: BTreeSet<Target>,
    /// Link dependencies used by the target's private sources.
    pub dependencies: BTreeSet<Target>,
    /// Private translation units.
    pub sources: BTreeSet<PathBuf>,
    /// Extra translation units that verify interface headers parse standalone.
    /// Scanned exactly like `sources`.
    pub verify_interface_header_sets_sources: BTreeSet<PathBuf>,
}

impl TargetData {
    /// Whether `filename` belongs to this target's interface: an explicit
    /// interface header, or a file under one of the interface include
    /// directories (restricted to the declared prefixes when there are any).
    #[must_use]
    pub fn is_interface_header(&self, filename: &Path) -> bool {
        if self.interface_headers.contains(filename) {
            return true;
        }

        for directory in &self.interface_include_directories {
            if self.interface_include_prefixes.is_empty() {
                if is_in_directory(directory, filename) {
                    return true;
                }
            } else {
                for prefix in &self.interface_include_prefixes {
                    if is_in_directory(&directory.join(prefix), filename) {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Whether `filename` is one of this target's private translation units.
    /// Verify-interface sources are deliberately not considered here.
    #[must_use]
    pub fn is_private_source(&self, filename: &Path) -> bool {
        self.sources.contains(filename)
    }
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
