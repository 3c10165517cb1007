use std::path::{Path, PathBuf};

use super::{Target, TargetData, TargetModel};

fn entry(name: &str, data: TargetData) -> (Target, TargetData) {
    (Target::new(name), data)
}

fn library(name: &str) -> (Target, TargetData) {
    entry(
        name,
        TargetData {
            interface_headers: [
                PathBuf::from(format!("/{name}/include/one.h")),
                PathBuf::from(format!("/{name}/include/two.h")),
            ]
            .into(),
            ..TargetData::default()
        },
    )
}

#[test]
fn get_target_data_uses_sorted_lookup() {
    let model = TargetModel::new(vec![library("libc"), library("liba"), library("libb")]);
    assert!(model.get_target_data(&Target::new("liba")).is_some());
    assert!(model.get_target_data(&Target::new("libc")).is_some());
    assert!(model.get_target_data(&Target::new("libx")).is_none());
}

#[test]
fn targets_iterate_in_name_order() {
    let model = TargetModel::new(vec![library("libc"), library("liba"), library("libb")]);
    let names: Vec<_> = model.targets().map(|(t, _)| t.name.clone()).collect();
    assert_eq!(names, ["liba", "libb", "libc"]);
}

#[test]
fn explicit_header_maps_to_owner() {
    let model = TargetModel::new(vec![library("liba"), library("libb")]);
    assert_eq!(
        model.map_header_to_target(Path::new("/liba/include/one.h")),
        Some(&Target::new("liba"))
    );
    assert_eq!(
        model.map_header_to_target(Path::new("/libb/include/two.h")),
        Some(&Target::new("libb"))
    );
    assert_eq!(model.map_header_to_target(Path::new("/libz/include/one.h")), None);
}

#[test]
fn directory_maps_headers_without_explicit_listing() {
    let model = TargetModel::new(vec![entry(
        "liba",
        TargetData {
            interface_include_directories: [PathBuf::from("/liba/include")].into(),
            ..TargetData::default()
        },
    )]);
    assert_eq!(
        model.map_header_to_target(Path::new("/liba/include/anything.h")),
        Some(&Target::new("liba"))
    );
}

#[test]
fn prefixed_directories_disambiguate_shared_roots() {
    let model = TargetModel::new(vec![
        entry(
            "liba",
            TargetData {
                interface_include_directories: [PathBuf::from("/common/include")].into(),
                interface_include_prefixes: ["liba".to_string()].into(),
                ..TargetData::default()
            },
        ),
        entry(
            "libb",
            TargetData {
                interface_include_directories: [PathBuf::from("/common/include")].into(),
                interface_include_prefixes: ["libb".to_string()].into(),
                ..TargetData::default()
            },
        ),
    ]);
    assert!(model.validate().is_ok());
    assert_eq!(
        model.map_header_to_target(Path::new("/common/include/liba/one.h")),
        Some(&Target::new("liba"))
    );
    assert_eq!(
        model.map_header_to_target(Path::new("/common/include/libb/one.h")),
        Some(&Target::new("libb"))
    );
    assert_eq!(model.map_header_to_target(Path::new("/common/include/one.h")), None);
}

#[test]
fn validate_rejects_duplicate_targets() {
    let model = TargetModel::new(vec![library("liba"), library("liba")]);
    let message = model.validate().unwrap_err();
    assert!(message.contains("liba is repeated"), "unexpected: {message}");
}

#[test]
fn validate_rejects_nested_directories_without_prefixes() {
    let model = TargetModel::new(vec![
        entry(
            "outer",
            TargetData {
                interface_include_directories: [PathBuf::from("/include")].into(),
                ..TargetData::default()
            },
        ),
        entry(
            "inner",
            TargetData {
                interface_include_directories: [PathBuf::from("/include/inner")].into(),
                ..TargetData::default()
            },
        ),
    ]);
    let message = model.validate().unwrap_err();
    assert!(message.contains("conflicting include directory"), "unexpected: {message}");
    assert!(message.contains("outer") && message.contains("inner"));
}

#[test]
fn validate_rejects_prefixed_directory_containing_unprefixed_one() {
    let model = TargetModel::new(vec![
        entry(
            "outer",
            TargetData {
                interface_include_directories: [PathBuf::from("/include")].into(),
                interface_include_prefixes: ["outer".to_string()].into(),
                ..TargetData::default()
            },
        ),
        entry(
            "inner",
            TargetData {
                interface_include_directories: [PathBuf::from("/include/sub")].into(),
                ..TargetData::default()
            },
        ),
    ]);
    let message = model.validate().unwrap_err();
    assert!(message.contains("inner does not have an include prefix"), "unexpected: {message}");
}

#[test]
fn validate_rejects_shared_prefixes_on_nested_directories() {
    let model = TargetModel::new(vec![
        entry(
            "outer",
            TargetData {
                interface_include_directories: [PathBuf::from("/include")].into(),
                interface_include_prefixes: ["shared".to_string()].into(),
                ..TargetData::default()
            },
        ),
        entry(
            "inner",
            TargetData {
                interface_include_directories: [PathBuf::from("/include/sub")].into(),
                interface_include_prefixes: ["shared".to_string()].into(),
                ..TargetData::default()
            },
        ),
    ]);
    let message = model.validate().unwrap_err();
    assert!(message.contains("share shared as an include prefix"), "unexpected: {message}");
}

#[test]
fn resolution_is_unique_on_validated_models() {
    // every header reachable through any target's declarations resolves to
    // exactly one target once validate() passes
    let model = TargetModel::new(vec![library("liba"), library("libb"), library("libc")]);
    assert!(model.validate().is_ok());
    for (target, data) in model.targets() {
        for header in &data.interface_headers {
            assert_eq!(model.map_header_to_target(header), Some(target));
        }
    }
}

fn with_deps(name: &str, deps: &[&str]) -> (Target, TargetData) {
    entry(
        name,
        TargetData {
            dependencies: deps.iter().map(|d| Target::new(*d)).collect(),
            interface_dependencies: [Target::new("ignored_interface_dep")].into(),
            ..TargetData::default()
        },
    )
}

#[test]
fn pruning_follows_private_dependencies_only() {
    let model = TargetModel::new(vec![
        with_deps("app", &["libb"]),
        with_deps("libb", &["libc"]),
        with_deps("libc", &[]),
        with_deps("ignored_interface_dep", &[]),
        with_deps("unrelated", &[]),
    ]);

    let pruned = model.create_pruned(&[Target::new("app")]);
    let names: Vec<_> = pruned.targets().map(|(t, _)| t.name.clone()).collect();
    assert_eq!(names, ["app", "libb", "libc"]);
}

#[test]
fn pruning_skips_unknown_seeds() {
    let model = TargetModel::new(vec![with_deps("liba", &[])]);
    let pruned = model.create_pruned(&[Target::new("nope"), Target::new("liba")]);
    assert_eq!(pruned.len(), 1);
}

#[test]
fn pruning_preserves_target_data() {
    let model = TargetModel::new(vec![library("liba")]);
    let pruned = model.create_pruned(&[Target::new("liba")]);
    assert_eq!(
        pruned.get_target_data(&Target::new("liba")),
        model.get_target_data(&Target::new("liba"))
    );
}
