use std::path::Path;
use std::sync::Arc;

use crate::checker::{LinkageMismatch, Visibility, check_target};
use crate::model::{Target, TargetData, TargetModel};
use crate::output;
use crate::scanner::{ClangPreprocessor, Scanner};
use crate::{EXIT_FAILURE, EXIT_SUCCESS};

/// Run the linkage check over the selected targets, or over every target in
/// the model when none are selected. Returns the process exit code.
#[must_use]
pub fn run_check(
    model: &TargetModel,
    binary_dir: &Path,
    selected_targets: &[Target],
    thread_count: usize,
) -> i32 {
    println!("Scanning with {thread_count} threads");
    let scanner = Scanner::new(thread_count, Arc::new(ClangPreprocessor::new()));

    let mut success = true;
    if selected_targets.is_empty() {
        for (target, target_data) in model.targets() {
            println!("# Checking that {target} links what it includes");
            success &= check_one_target(model, &scanner, binary_dir, target, target_data);
        }
    } else {
        for target in selected_targets {
            println!("# Checking that {target} links what it includes");
            let Some(target_data) = model.get_target_data(target) else {
                output::print_error(&format!("No target named {target} found"));
                success = false;
                break;
            };
            success &= check_one_target(model, &scanner, binary_dir, target, target_data);
        }
    }

    if success { EXIT_SUCCESS } else { EXIT_FAILURE }
}

fn check_one_target(
    model: &TargetModel,
    scanner: &Scanner,
    binary_dir: &Path,
    target: &Target,
    target_data: &TargetData,
) -> bool {
    if target_data.sources.is_empty()
        && target_data.verify_interface_header_sets_sources.is_empty()
    {
        println!("No sources. Skipping.");
        return true;
    }

    let includes = match scanner.scan(binary_dir, target_data) {
        Ok(includes) => includes,
        Err(errors) => {
            output::print_error(&format!(
                "Failed to scan the direct includes of target {target}"
            ));
            for error in errors {
                output::print_error(&error.to_string());
            }
            return false;
        }
    };

    let mismatches = check_target(model, target_data, &includes);
    if mismatches.is_empty() {
        return true;
    }

    for mismatch in &mismatches {
        print_mismatch(target, mismatch);
    }
    false
}

fn print_mismatch(target: &Target, mismatch: &LinkageMismatch) {
    output::print_error(&format!(
        "{target} {} but it is {}.",
        linked_phrase(mismatch.linked, &mismatch.target),
        included_phrase(mismatch.included)
    ));

    for include in &mismatch.sample_includes {
        output::print_note(&include.path.display().to_string());
        // nearest include first, then the chain upward toward the TU
        for source_line in include.include_chain.iter().rev() {
            println!("  included from {}:{}", source_line.source.display(), source_line.line);
        }
    }
}

fn scope_name(visibility: Visibility) -> &'static str {
    if visibility == Visibility::PUBLIC {
        "PUBLIC"
    } else if visibility == Visibility::INTERFACE {
        "INTERFACE"
    } else {
        "PRIVATE"
    }
}

fn linked_phrase(linked: Visibility, dep: &Target) -> String {
    if linked.is_empty() {
        format!("does not link to {dep}")
    } else {
        format!("links to {dep} with {} scope", scope_name(linked))
    }
}

fn included_phrase(included: Visibility) -> String {
    if included.is_empty() {
        "not included".to_string()
    } else {
        format!("included with {} scope", scope_name(included))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linked_phrases_cover_the_lattice() {
        let dep = Target::new("libx");
        assert_eq!(linked_phrase(Visibility::NONE, &dep), "does not link to libx");
        assert_eq!(
            linked_phrase(Visibility::PRIVATE, &dep),
            "links to libx with PRIVATE scope"
        );
        assert_eq!(
            linked_phrase(Visibility::INTERFACE, &dep),
            "links to libx with INTERFACE scope"
        );
        assert_eq!(
            linked_phrase(Visibility::PUBLIC, &dep),
            "links to libx with PUBLIC scope"
        );
    }

    #[test]
    fn included_phrases_cover_the_lattice() {
        assert_eq!(included_phrase(Visibility::NONE), "not included");
        assert_eq!(included_phrase(Visibility::PRIVATE), "included with PRIVATE scope");
        assert_eq!(included_phrase(Visibility::INTERFACE), "included with INTERFACE scope");
        assert_eq!(included_phrase(Visibility::PUBLIC), "included with PUBLIC scope");
    }
}
