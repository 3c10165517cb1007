use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::path_utils::is_in_directory;

use super::{Target, TargetData};

/// Immutable, queryable aggregate of (target -> target data) entries.
///
/// Entries are stored sorted by target name; the derived indexes hold stable
/// indices into that list rather than references. All queries are read-only,
/// so a frozen model is safe to share across scanner workers.
#[derive(Debug, Clone, Default)]
pub struct TargetModel {
    entries: Vec<(Target, TargetData)>,
    header_to_target: HashMap<PathBuf, usize>,
    directory_to_target: Vec<(PathBuf, usize)>,
}

impl TargetModel {
    #[must_use]
    pub fn new(mut entries: Vec<(Target, TargetData)>) -> Self {
        entries.sort_by(|lhs, rhs| lhs.0.cmp(&rhs.0));

        let mut header_to_target = HashMap::new();
        let mut directory_to_target = Vec::new();
        for (index, (_, data)) in entries.iter().enumerate() {
            for header in &data.interface_headers {
                header_to_target.insert(header.clone(), index);
            }
            for directory in &data.interface_include_directories {
                directory_to_target.push((directory.clone(), index));
            }
        }

        Self {
            entries,
            header_to_target,
            directory_to_target,
        }
    }

    /// Reject ambiguous models: duplicate target names, and include
    /// directories of two targets where one contains the other without
    /// prefixes disambiguating them.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(window) = self.entries.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(format!("Target {} is repeated.", window[0].0));
        }

        for (directory, index) in &self.directory_to_target {
            let (target, data) = &self.entries[*index];
            for (other_directory, other_index) in &self.directory_to_target {
                let (other_target, other_data) = &self.entries[*other_index];
                if target == other_target || !is_in_directory(directory, other_directory) {
                    continue;
                }

                if data.interface_include_prefixes.is_empty() {
                    return Err(format!(
                        "{target} and {other_target} have a conflicting include directory \
                         ({}) and {target} does not have an include prefix to disambiguate.",
                        directory.display()
                    ));
                }
                if other_data.interface_include_prefixes.is_empty() {
                    return Err(format!(
                        "{target} and {other_target} have a conflicting include directory \
                         ({}) and {other_target} does not have an include prefix to \
                         disambiguate.",
                        other_directory.display()
                    ));
                }
                if let Some(prefix) = data
                    .interface_include_prefixes
                    .intersection(&other_data.interface_include_prefixes)
                    .next()
                {
                    return Err(format!(
                        "{target} and {other_target} have conflicting include directories \
                         and share {prefix} as an include prefix."
                    ));
                }
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn get_target_data(&self, target: &Target) -> Option<&TargetData> {
        self.entries
            .binary_search_by(|(candidate, _)| candidate.cmp(target))
            .ok()
            .map(|index| &self.entries[index].1)
    }

    /// Attribute an included file path to the target owning it, if any.
    ///
    /// Explicit interface headers are checked first, then the include
    /// directories in stored order (with prefix disambiguation). The first
    /// match wins; `validate` guarantees matches are unique.
    #[must_use]
    pub fn map_header_to_target(&self, header: &Path) -> Option<&Target> {
        if let Some(index) = self.header_to_target.get(header) {
            return Some(&self.entries[*index].0);
        }

        for (directory, index) in &self.directory_to_target {
            let (target, data) = &self.entries[*index];
            if data.interface_include_prefixes.is_empty() {
                if is_in_directory(directory, header) {
                    return Some(target);
                }
            } else {
                for prefix in &data.interface_include_prefixes {
                    if is_in_directory(&directory.join(prefix), header) {
                        return Some(target);
                    }
                }
            }
        }

        None
    }

    /// Entries in sorted-by-name order.
    pub fn targets(&self) -> impl Iterator<Item = (&Target, &TargetData)> {
        self.entries.iter().map(|(target, data)| (target, data))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// New model restricted to the transitive closure of `seeds` over the
    /// `dependencies` edge. Interface dependencies do not propagate here;
    /// graph emission relies on that. Unknown seeds are skipped.
    #[must_use]
    pub fn create_pruned(&self, seeds: &[Target]) -> Self {
        let mut pruned: BTreeMap<Target, TargetData> = BTreeMap::new();

        let mut stack: Vec<Target> = seeds.to_vec();
        while let Some(target) = stack.pop() {
            if pruned.contains_key(&target) {
                continue;
            }
            if let Some(data) = self.get_target_data(&target) {
                stack.extend(data.dependencies.iter().cloned());
                pruned.insert(target, data.clone());
            }
        }

        Self::new(pruned.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
