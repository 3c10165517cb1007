mod cluster_diff;
mod config;

pub use cluster_diff::{ClusterDiff, cluster_diff};
pub use config::{TidyConfig, load_config};

use crate::checker::strongly_connected_dependencies;
use crate::model::{Target, TargetModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DagDiagnosticKind {
    AddedToCluster,
    RemovedFromCluster,
    NewCluster,
    ForbiddenDependency,
}

/// One policy violation over the dependency DAG.
#[derive(Debug, Clone)]
pub struct DagDiagnostic {
    pub kind: DagDiagnosticKind,
    pub targets: Vec<Target>,
}

/// Check the dependency graph against the policy: observed strongly connected
/// components must match the allowed clusters, and no forbidden edge may be
/// present.
#[must_use]
pub fn tidy(config: &TidyConfig, model: &TargetModel) -> Vec<DagDiagnostic> {
    let mut diagnostics = Vec::new();

    let components = strongly_connected_dependencies(model);
    let diffs = cluster_diff(&config.allowed_clusters, &components);

    for (slot, diff) in diffs.iter().enumerate() {
        if slot < config.allowed_clusters.len() {
            if !diff.left_only.is_empty() {
                diagnostics.push(DagDiagnostic {
                    kind: DagDiagnosticKind::RemovedFromCluster,
                    targets: diff.left_only.clone(),
                });
            }
            if !diff.right_only.is_empty() {
                diagnostics.push(DagDiagnostic {
                    kind: DagDiagnosticKind::AddedToCluster,
                    targets: diff.right_only.clone(),
                });
            }
        } else {
            diagnostics.push(DagDiagnostic {
                kind: DagDiagnosticKind::NewCluster,
                targets: diff.right_only.clone(),
            });
        }
    }

    for (target, forbidden_dependencies) in &config.forbidden_dependencies {
        let Some(data) = model.get_target_data(target) else {
            continue;
        };
        for forbidden in forbidden_dependencies {
            if data.dependencies.contains(forbidden) {
                diagnostics.push(DagDiagnostic {
                    kind: DagDiagnosticKind::ForbiddenDependency,
                    targets: vec![target.clone(), forbidden.clone()],
                });
            }
        }
    }

    diagnostics
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
