use std::path::PathBuf;

use super::LwyiError;

#[test]
fn parse_error_keeps_serde_location() {
    let err = serde_json::from_str::<serde_json::Value>("{\n  \"a\": }")
        .expect_err("invalid json");
    let wrapped = LwyiError::parse("/build/info.json", &err);
    let text = wrapped.to_string();
    assert!(text.contains("/build/info.json"));
    assert!(text.contains("line 2"), "missing location in: {text}");
    assert!(text.contains("column"), "missing location in: {text}");
}

#[test]
fn scan_error_names_the_source() {
    let err = LwyiError::scan("/src/a.cpp", "compiler exited with status 1");
    assert_eq!(
        err.to_string(),
        "error while processing /src/a.cpp: compiler exited with status 1"
    );
}

#[test]
fn file_read_error_names_the_path() {
    let err = LwyiError::FileRead {
        path: PathBuf::from("/missing.json"),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    assert!(err.to_string().contains("/missing.json"));
}
