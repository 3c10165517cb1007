#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the lwyi binary.
#[macro_export]
macro_rules! lwyi {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("lwyi"))
    };
}

/// Temporary binary directory holding the input files the tool expects.
pub struct BinaryDir {
    pub dir: TempDir,
}

impl BinaryDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `link_what_you_include_info.json` with the given JSON body.
    pub fn write_build_info(&self, json: &str) {
        self.write_file("link_what_you_include_info.json", json);
    }

    /// Writes an empty `compile_commands.json`.
    pub fn write_empty_compile_commands(&self) {
        self.write_file("compile_commands.json", "[]");
    }

    pub fn write_file(&self, name: &str, content: &str) {
        fs::write(self.path().join(name), content).expect("failed to write input file");
    }
}
