use std::collections::BTreeMap;

use crate::model::{Target, TargetData, TargetModel};
use crate::scanner::{Include, IntransitiveIncludes};

use super::Visibility;

/// A dependency whose declared link visibility disagrees with the visibility
/// observed through `#include` directives.
#[derive(Debug, Clone)]
pub struct LinkageMismatch {
    pub target: Target,
    pub linked: Visibility,
    pub included: Visibility,
    pub sample_includes: Vec<Include>,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    linked: Visibility,
    included: Visibility,
}

impl Default for Edge {
    fn default() -> Self {
        Self {
            linked: Visibility::NONE,
            included: Visibility::NONE,
        }
    }
}

fn collect_include_deps<'m>(
    model: &'m TargetModel,
    includes: &[Include],
) -> BTreeMap<&'m Target, Vec<Include>> {
    let mut deps: BTreeMap<&Target, Vec<Include>> = BTreeMap::new();
    for include in includes {
        if let Some(dep) = model.map_header_to_target(&include.path) {
            deps.entry(dep).or_default().push(include.clone());
        }
    }
    deps
}

/// Reconcile a target's declared link edges against its scanned intransitive
/// includes. One mismatch is emitted per dependency whose two visibilities
/// differ, in target order.
#[must_use]
pub fn check_target(
    model: &TargetModel,
    target_data: &TargetData,
    target_includes: &IntransitiveIncludes,
) -> Vec<LinkageMismatch> {
    let mut edges: BTreeMap<&Target, Edge> = BTreeMap::new();

    // link edges to targets absent from the model are third-party or
    // system libraries and are dropped here
    for dep in &target_data.interface_dependencies {
        if model.get_target_data(dep).is_some() {
            edges.entry(dep).or_default().linked |= Visibility::INTERFACE;
        }
    }
    for dep in &target_data.dependencies {
        if model.get_target_data(dep).is_some() {
            edges.entry(dep).or_default().linked |= Visibility::PRIVATE;
        }
    }

    let included_interface_deps =
        collect_include_deps(model, &target_includes.interface_includes);
    let included_deps = collect_include_deps(model, &target_includes.includes);

    for dep in included_interface_deps.keys() {
        edges.entry(*dep).or_default().included |= Visibility::INTERFACE;
    }
    for dep in included_deps.keys() {
        edges.entry(*dep).or_default().included |= Visibility::PRIVATE;
    }

    let mut mismatches = Vec::new();
    for (dep, edge) in edges {
        if edge.linked == edge.included {
            continue;
        }

        let mut sample_includes = Vec::new();
        if edge.included.contains(Visibility::INTERFACE) {
            sample_includes.extend(included_interface_deps[dep].iter().cloned());
        }
        if edge.included.contains(Visibility::PRIVATE) {
            sample_includes.extend(included_deps[dep].iter().cloned());
        }

        mismatches.push(LinkageMismatch {
            target: dep.clone(),
            linked: edge.linked,
            included: edge.included,
            sample_includes,
        });
    }

    mismatches
}

#[cfg(test)]
#[path = "linkage_tests.rs"]
mod tests;
