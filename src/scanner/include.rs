use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::PathBuf;

/// One `#include` directive site.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLine {
    pub source: PathBuf,
    pub line: u32,
}

/// A resolved included file together with the chain of includes that first
/// caused it to be entered, outermost first. The chain is diagnostic payload
/// only: equality and ordering are by `path`.
#[derive(Debug, Clone)]
pub struct Include {
    pub path: PathBuf,
    pub include_chain: Vec<SourceLine>,
}

impl PartialEq for Include {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Include {}

impl PartialOrd for Include {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Include {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

/// Set of includes ordered by path. When two include chains lead to the same
/// resolved path, the first observed chain is retained.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IncludeSet {
    entries: BTreeMap<PathBuf, Include>,
}

impl IncludeSet {
    /// Insert unless an include with the same path is already present.
    /// Returns whether the include was inserted.
    pub fn insert(&mut self, include: Include) -> bool {
        match self.entries.entry(include.path.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(include);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn merge_from(&mut self, other: &Self) {
        for include in other.iter() {
            self.insert(include.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Include> {
        self.entries.values()
    }

    #[must_use]
    pub fn contains(&self, path: &std::path::Path) -> bool {
        self.entries.contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Include> {
        self.entries.into_values().collect()
    }
}

impl FromIterator<Include> for IncludeSet {
    fn from_iter<I: IntoIterator<Item = Include>>(iter: I) -> Self {
        let mut set = Self::default();
        for include in iter {
            set.insert(include);
        }
        set
    }
}

/// Includes recorded while preprocessing one translation unit.
#[derive(Debug, Default, Clone)]
pub struct IncludeData {
    /// Includes attributed to the private context of the TU.
    pub includes: IncludeSet,
    /// Per interface header, the includes reached while that header was on
    /// the compilation stack.
    pub interface_header_includes: BTreeMap<PathBuf, IncludeSet>,
}

/// Per-target merge of all translation units: the headers reached from the
/// target's own files without crossing another first-party target.
#[derive(Debug, Default, Clone)]
pub struct IntransitiveIncludes {
    pub interface_includes: Vec<Include>,
    pub includes: Vec<Include>,
}
