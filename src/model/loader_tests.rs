use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::error::LwyiError;
use crate::model::Target;

use super::TargetModelLoader;

fn write_info(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn loads_all_seven_arrays() {
    let dir = TempDir::new().unwrap();
    let path = write_info(
        &dir,
        "info.json",
        r#"{
            "libq": {
                "interface_headers": ["/libq/include/q.h"],
                "interface_include_directories": ["/libq/include"],
                "interface_include_prefixes": ["libq"],
                "interface_dependencies": ["liba"],
                "dependencies": ["liba", "libb"],
                "sources": ["/libq/src/q.cpp"],
                "verify_interface_header_sets_sources": ["/libq/verify/q.cpp"]
            }
        }"#,
    );

    let mut loader = TargetModelLoader::new();
    loader.load_json(&path).unwrap();
    let model = loader.make_target_model();

    let data = model.get_target_data(&Target::new("libq")).unwrap();
    assert!(data.interface_headers.contains(&PathBuf::from("/libq/include/q.h")));
    assert!(data.interface_include_prefixes.contains("libq"));
    assert_eq!(data.interface_dependencies.len(), 1);
    assert_eq!(data.dependencies.len(), 2);
    assert!(data.sources.contains(&PathBuf::from("/libq/src/q.cpp")));
    assert!(
        data.verify_interface_header_sets_sources
            .contains(&PathBuf::from("/libq/verify/q.cpp"))
    );
}

#[test]
fn omitted_arrays_default_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = write_info(&dir, "info.json", r#"{ "liba": {} }"#);

    let mut loader = TargetModelLoader::new();
    loader.load_json(&path).unwrap();
    let model = loader.make_target_model();

    let data = model.get_target_data(&Target::new("liba")).unwrap();
    assert!(data.interface_headers.is_empty());
    assert!(data.dependencies.is_empty());
}

#[test]
fn unknown_array_name_fails_with_the_key() {
    let dir = TempDir::new().unwrap();
    let path = write_info(&dir, "info.json", r#"{ "liba": { "header_files": [] } }"#);

    let mut loader = TargetModelLoader::new();
    let err = loader.load_json(&path).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("header_files"), "unexpected: {message}");
    assert!(message.contains("line 1"), "missing location: {message}");
}

#[test]
fn non_array_value_fails_with_location() {
    let dir = TempDir::new().unwrap();
    let path = write_info(&dir, "info.json", "{\n  \"liba\": { \"sources\": \"x.cpp\" }\n}");

    let mut loader = TargetModelLoader::new();
    let err = loader.load_json(&path).unwrap_err();
    match err {
        LwyiError::Parse { message, .. } => {
            assert!(message.contains("line 2"), "unexpected: {message}");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_a_read_error() {
    let mut loader = TargetModelLoader::new();
    let err = loader.load_json(&PathBuf::from("/no/such/info.json")).unwrap_err();
    assert!(matches!(err, LwyiError::FileRead { .. }));
}

#[test]
fn successive_loads_accumulate_targets() {
    let dir = TempDir::new().unwrap();
    let first = write_info(&dir, "first.json", r#"{ "liba": {} }"#);
    let second = write_info(&dir, "second.json", r#"{ "libb": {} }"#);

    let mut loader = TargetModelLoader::new();
    loader.load_json(&first).unwrap();
    loader.load_json(&second).unwrap();
    let model = loader.make_target_model();

    assert_eq!(model.len(), 2);
    assert!(model.get_target_data(&Target::new("liba")).is_some());
    assert!(model.get_target_data(&Target::new("libb")).is_some());
}

#[test]
fn make_target_model_drains_the_accumulator() {
    let dir = TempDir::new().unwrap();
    let path = write_info(&dir, "info.json", r#"{ "liba": {} }"#);

    let mut loader = TargetModelLoader::new();
    loader.load_json(&path).unwrap();
    let _ = loader.make_target_model();
    assert!(loader.make_target_model().is_empty());
}
